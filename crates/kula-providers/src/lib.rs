//! LLM provider abstraction.
//!
//! Each provider implements the [`ChatProvider`] trait to produce a single
//! chat completion for a primed conversation. Providers are constructed
//! once at startup and shared across requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod gemini;

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// A request for one chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub turns: Vec<ChatTurn>,
    pub max_output_tokens: u32,
}

/// The core chat provider trait.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider identifier (e.g., "gemini").
    fn id(&self) -> &str;

    /// Produce the full completion text for the given conversation.
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String>;
}
