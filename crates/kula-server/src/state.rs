//! Server shared state.

use std::path::PathBuf;
use std::sync::Arc;

use kula_agent::ReplyGenerator;
use kula_core::config::Config;
use kula_tts::SpeechSynthesizer;

/// Shared state accessible from all handlers.
///
/// Clients are constructed once at startup and injected here; handlers
/// never build their own.
pub struct AppState {
    pub config: Arc<Config>,
    pub replies: ReplyGenerator,
    pub synth: Arc<dyn SpeechSynthesizer>,
    pub public_dir: PathBuf,
    pub public_base_url: String,
}

impl AppState {
    /// Resolve the playback settings from config; fails without a base URL
    /// since playback links could not be built.
    pub fn new(
        config: Arc<Config>,
        replies: ReplyGenerator,
        synth: Arc<dyn SpeechSynthesizer>,
    ) -> anyhow::Result<Self> {
        let public_base_url = config
            .public_base_url()
            .ok_or_else(|| anyhow::anyhow!("server.public_base_url is not configured"))?;
        let public_dir = config.public_dir();

        Ok(Self {
            config,
            replies,
            synth,
            public_dir,
            public_base_url,
        })
    }
}
