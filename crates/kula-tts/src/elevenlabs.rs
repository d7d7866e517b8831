//! Text-to-speech via the ElevenLabs API.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use tracing::{debug, info};

use crate::SpeechSynthesizer;

// Kula's voice: multilingual so Yoruba/Igbo/Hausa replies come out natural.
const DEFAULT_VOICE_ID: &str = "eOHsvebhdtt0XFeHVMQY";
const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

pub struct ElevenLabsClient {
    api_key: String,
    voice_id: String,
    model_id: String,
    client: reqwest::Client,
}

impl ElevenLabsClient {
    pub fn new(
        api_key: impl Into<String>,
        voice_id: Option<&str>,
        model_id: Option<&str>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            voice_id: voice_id.unwrap_or(DEFAULT_VOICE_ID).to_string(),
            model_id: model_id.unwrap_or(DEFAULT_MODEL_ID).to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn request_url(&self) -> String {
        format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}/stream",
            self.voice_id
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    fn id(&self) -> &str {
        "elevenlabs"
    }

    async fn synthesize(&self, text: &str) -> anyhow::Result<Bytes> {
        let url = self.request_url();

        debug!(voice = %self.voice_id, model = %self.model_id, text_len = text.len(), "Starting TTS request");

        let resp = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "text": text,
                "model_id": self.model_id,
                "voice_settings": {
                    "stability": 0.5,
                    "similarity_boost": 0.75
                }
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("ElevenLabs API error {status}: {body}");
        }

        // Buffer the whole stream; playback needs a complete file on disk.
        let mut audio = BytesMut::new();
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            audio.extend_from_slice(&chunk?);
        }

        info!(size_kb = audio.len() / 1024, voice = %self.voice_id, "TTS audio generated");

        Ok(audio.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_contains_voice() {
        let client = ElevenLabsClient::new("key", Some("Rachel"), None);
        let url = client.request_url();
        assert!(url.contains("Rachel"));
        assert!(url.contains("stream"));
        assert!(url.starts_with("https://api.elevenlabs.io"));
    }

    #[test]
    fn test_defaults() {
        let client = ElevenLabsClient::new("key", None, None);
        assert_eq!(client.id(), "elevenlabs");
        assert_eq!(client.voice_id, DEFAULT_VOICE_ID);
        assert_eq!(client.model_id, DEFAULT_MODEL_ID);
    }
}
