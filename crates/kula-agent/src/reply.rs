//! Reply generation: prime a fresh chat session and send one message.

use std::sync::Arc;

use tracing::debug;

use kula_providers::{ChatProvider, ChatTurn, CompletionRequest};

use crate::prompt::{KULA_SYSTEM_PROMPT, PRIMING_ACKNOWLEDGMENT};

/// Produces one Kula reply per call.
///
/// Every call is an independent session: the fixed two-turn priming history
/// plus the user input, nothing carried over between requests.
pub struct ReplyGenerator {
    provider: Arc<dyn ChatProvider>,
    model: String,
    max_output_tokens: u32,
}

impl ReplyGenerator {
    pub fn new(provider: Arc<dyn ChatProvider>, model: impl Into<String>, max_output_tokens: u32) -> Self {
        Self {
            provider,
            model: model.into(),
            max_output_tokens,
        }
    }

    /// Generate a reply for a non-empty user input.
    ///
    /// Provider errors propagate unchanged; the HTTP handlers own the
    /// user-visible fallback.
    pub async fn reply(&self, input: &str) -> anyhow::Result<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            turns: primed_conversation(input),
            max_output_tokens: self.max_output_tokens,
        };

        debug!(provider = self.provider.id(), model = %self.model, "Generating reply");
        self.provider.complete(&request).await
    }
}

/// The fixed priming exchange followed by the real user turn.
fn primed_conversation(input: &str) -> Vec<ChatTurn> {
    vec![
        ChatTurn::user(KULA_SYSTEM_PROMPT),
        ChatTurn::model(PRIMING_ACKNOWLEDGMENT),
        ChatTurn::user(input),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use kula_providers::ChatRole;

    /// Records the request it was handed and returns a fixed reply.
    struct RecordingProvider {
        seen: Mutex<Option<CompletionRequest>>,
    }

    #[async_trait]
    impl ChatProvider for RecordingProvider {
        fn id(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
            *self.seen.lock().unwrap() = Some(request.clone());
            Ok("Hello, Mama.".into())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl ChatProvider for FailingProvider {
        fn id(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: &CompletionRequest) -> anyhow::Result<String> {
            anyhow::bail!("upstream unavailable")
        }
    }

    #[test]
    fn test_primed_conversation_shape() {
        let turns = primed_conversation("My baby will not sleep.");
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, ChatRole::User);
        assert!(turns[0].text.contains("You are Kula"));
        assert_eq!(turns[1].role, ChatRole::Model);
        assert_eq!(turns[1].text, PRIMING_ACKNOWLEDGMENT);
        assert_eq!(turns[2].role, ChatRole::User);
        assert_eq!(turns[2].text, "My baby will not sleep.");
    }

    #[tokio::test]
    async fn test_reply_submits_primed_request() {
        let provider = Arc::new(RecordingProvider {
            seen: Mutex::new(None),
        });
        let generator = ReplyGenerator::new(provider.clone(), "gemini-1.5-flash-latest", 500);

        let reply = generator.reply("Good morning").await.unwrap();
        assert_eq!(reply, "Hello, Mama.");

        let seen = provider.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.model, "gemini-1.5-flash-latest");
        assert_eq!(seen.max_output_tokens, 500);
        assert_eq!(seen.turns.len(), 3);
        assert_eq!(seen.turns[2].text, "Good morning");
    }

    #[tokio::test]
    async fn test_reply_propagates_provider_error() {
        let generator = ReplyGenerator::new(Arc::new(FailingProvider), "m", 500);
        let err = generator.reply("hello").await.unwrap_err();
        assert!(err.to_string().contains("upstream unavailable"));
    }
}
