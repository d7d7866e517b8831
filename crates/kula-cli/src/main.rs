use std::sync::Arc;

use clap::{Parser, Subcommand};

use kula_agent::ReplyGenerator;
use kula_core::config::Config;
use kula_providers::ChatProvider;
use kula_providers::gemini::GeminiProvider;
use kula_server::AppState;
use kula_tts::{ElevenLabsClient, SpeechSynthesizer};

#[derive(Parser)]
#[command(
    name = "kula",
    about = "Kula — voice and chat companion hotline for new mothers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (default: 3000)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show service status
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    // Load config
    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(Config::default_path);

    let config = Config::load(&config_path)?;

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or_else(|| config.port());

            // Refuse to serve without credentials and a playback base URL.
            if let Err(e) = config.validate_for_serving() {
                tracing::error!("FATAL: {e}");
                std::process::exit(1);
            }

            let state = build_state(&config)?;

            tracing::info!("Starting Kula server on port {port}");
            kula_server::start_server(state, port).await?;
        }
        Commands::Status => {
            println!("Kula v{}", env!("CARGO_PKG_VERSION"));
            println!("Config: {}", config_path.display());
            println!("Port: {}", config.port());
            println!("Public dir: {}", config.public_dir().display());
            match config.public_base_url() {
                Some(url) => println!("Public base URL: {url}"),
                None => println!("Public base URL: (not configured)"),
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let json = serde_json::to_string_pretty(&config)?;
                println!("{json}");
            }
        },
    }

    Ok(())
}

/// Construct the process-wide clients once and wire them into shared state.
fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let gemini_key = config
        .gemini_api_key()
        .ok_or_else(|| anyhow::anyhow!("Gemini API key missing"))?;
    let elevenlabs_key = config
        .elevenlabs_api_key()
        .ok_or_else(|| anyhow::anyhow!("ElevenLabs API key missing"))?;

    let gemini_base_url = config
        .gemini
        .as_ref()
        .and_then(|g| g.base_url.clone());
    let provider: Arc<dyn ChatProvider> =
        Arc::new(GeminiProvider::new(gemini_key, gemini_base_url.as_deref()));

    let replies = ReplyGenerator::new(
        provider,
        config.gemini_model(),
        config.gemini_max_output_tokens(),
    );

    let elevenlabs = config.elevenlabs.clone().unwrap_or_default();
    let synth: Arc<dyn SpeechSynthesizer> = Arc::new(ElevenLabsClient::new(
        elevenlabs_key,
        elevenlabs.voice_id.as_deref(),
        elevenlabs.model_id.as_deref(),
    ));

    let state = AppState::new(Arc::new(config.clone()), replies, synth)?;
    Ok(Arc::new(state))
}
