//! Speech synthesis and audio artifact storage.

use async_trait::async_trait;
use bytes::Bytes;

pub mod artifact;
pub mod elevenlabs;

pub use elevenlabs::ElevenLabsClient;

/// A provider that turns reply text into playable audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Provider identifier (e.g., "elevenlabs").
    fn id(&self) -> &str;

    /// Synthesize the full audio for `text`, buffered in memory.
    async fn synthesize(&self, text: &str) -> anyhow::Result<Bytes>;
}
