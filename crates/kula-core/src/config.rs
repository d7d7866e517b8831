//! Configuration loading and startup validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level Kula configuration.
///
/// Every section is optional; defaults reproduce the stock deployment.
/// Secrets can be given inline, via `*_env` indirection, or as
/// `${ENV_VAR}` references in the config file itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevenlabs: Option<ElevenLabsConfig>,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Externally reachable base URL used to build playback links for
    /// synthesized audio. There is no sane default: the value depends on
    /// the tunnel or ingress in front of the service, so startup refuses
    /// to serve without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,

    /// Directory served at the site root; synthesized audio lands here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_dir: Option<String>,
}

/// Gemini text-generation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GeminiConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_secret_field(
            &self.api_key,
            &self
                .api_key_env
                .clone()
                .or_else(|| Some("GEMINI_API_KEY".into())),
        )
    }
}

/// ElevenLabs speech-synthesis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElevenLabsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

impl ElevenLabsConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_secret_field(
            &self.api_key,
            &self
                .api_key_env
                .clone()
                .or_else(|| Some("ELEVENLABS_API_KEY".into())),
        )
    }
}

/// Resolve a secret: inline field first, then the named environment variable.
pub fn resolve_secret_field(direct: &Option<String>, env_var: &Option<String>) -> Option<String> {
    if let Some(val) = direct {
        if !val.is_empty() {
            return Some(val.clone());
        }
    }
    if let Some(env) = env_var {
        if let Ok(val) = std::env::var(env) {
            if !val.is_empty() {
                return Some(val);
            }
        }
    }
    None
}

/// Substitute `${ENV_VAR}` patterns in a string with their environment variable values.
fn substitute_env_vars(input: &str) -> String {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_default()
    })
    .into_owned()
}

impl Config {
    /// Load config from a JSON5 file, substituting `${ENV_VAR}` references.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(crate::error::KulaError::Io)?;

        // Substitute ${ENV_VAR} references before parsing
        let substituted = substitute_env_vars(&raw);

        let config: Config = json5::from_str(&substituted)
            .map_err(|e| crate::error::KulaError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Default config file location.
    pub fn default_path() -> PathBuf {
        PathBuf::from("kula.json")
    }

    pub fn bind_addr(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind.clone())
            .unwrap_or_else(|| "0.0.0.0".to_string())
    }

    pub fn port(&self) -> u16 {
        self.server.as_ref().and_then(|s| s.port).unwrap_or(3000)
    }

    pub fn public_dir(&self) -> PathBuf {
        self.server
            .as_ref()
            .and_then(|s| s.public_dir.clone())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("public"))
    }

    /// Playback base URL, with any trailing slash removed.
    pub fn public_base_url(&self) -> Option<String> {
        self.server
            .as_ref()
            .and_then(|s| s.public_base_url.as_deref())
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
    }

    pub fn gemini_model(&self) -> String {
        self.gemini
            .as_ref()
            .and_then(|g| g.model.clone())
            .unwrap_or_else(|| "gemini-1.5-flash-latest".to_string())
    }

    pub fn gemini_max_output_tokens(&self) -> u32 {
        self.gemini
            .as_ref()
            .and_then(|g| g.max_output_tokens)
            .unwrap_or(500)
    }

    pub fn gemini_api_key(&self) -> Option<String> {
        self.gemini
            .clone()
            .unwrap_or_default()
            .resolve_api_key()
    }

    pub fn elevenlabs_api_key(&self) -> Option<String> {
        self.elevenlabs
            .clone()
            .unwrap_or_default()
            .resolve_api_key()
    }

    /// Validate everything the server needs before it binds a socket.
    ///
    /// Both upstream credentials and the playback base URL are required;
    /// a process without them would only ever produce error responses.
    pub fn validate_for_serving(&self) -> crate::error::Result<()> {
        if self.gemini_api_key().is_none() {
            return Err(crate::error::KulaError::Config(
                "Gemini API key missing: set gemini.api_key or GEMINI_API_KEY".into(),
            ));
        }
        if self.elevenlabs_api_key().is_none() {
            return Err(crate::error::KulaError::Config(
                "ElevenLabs API key missing: set elevenlabs.api_key or ELEVENLABS_API_KEY".into(),
            ));
        }
        if self.public_base_url().is_none() {
            return Err(crate::error::KulaError::Config(
                "server.public_base_url missing: playback links cannot be built without it".into(),
            ));
        }
        Ok(())
    }
}
