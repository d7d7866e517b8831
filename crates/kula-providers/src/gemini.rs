//! Google Generative AI (Gemini) provider.
//!
//! Uses the non-streaming `generateContent` endpoint; the service needs the
//! whole reply before it can answer a webhook anyway. Auth is via API key
//! in query parameter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::{ChatProvider, ChatRole, ChatTurn, CompletionRequest};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>) -> Self {
        Self {
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// --- Gemini request/response types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

/// Map chat turns onto Gemini's `contents` array.
fn format_contents(turns: &[ChatTurn]) -> Vec<serde_json::Value> {
    turns
        .iter()
        .map(|turn| {
            let role = match turn.role {
                ChatRole::User => "user",
                ChatRole::Model => "model", // Gemini uses "model", not "assistant"
            };
            json!({ "role": role, "parts": [{ "text": turn.text }] })
        })
        .collect()
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn id(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
        let body = GeminiRequest {
            contents: format_contents(&request.turns),
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(request.max_output_tokens),
            }),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, request.model, self.api_key
        );

        debug!(model = %request.model, turns = request.turns.len(), "Calling Gemini API");

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error {status}: {body}");
        }

        let parsed: GeminiResponse = response.json().await?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Gemini returned no candidates"))?;

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason != "STOP" && reason != "MAX_TOKENS" {
                anyhow::bail!("Gemini stopped generation: {reason}");
            }
        }

        let text: String = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .concat()
            })
            .unwrap_or_default();

        if text.is_empty() {
            anyhow::bail!("Gemini returned an empty completion");
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new("test-key", None);
        assert_eq!(provider.id(), "gemini");
        assert_eq!(provider.base_url(), DEFAULT_BASE_URL);

        let custom = GeminiProvider::new("test-key", Some("https://proxy.example/"));
        assert_eq!(custom.base_url(), "https://proxy.example");
    }

    #[test]
    fn test_format_contents_roles() {
        let turns = vec![
            ChatTurn::user("Hello"),
            ChatTurn::model("Hi there"),
            ChatTurn::user("How are you?"),
        ];
        let contents = format_contents(&turns);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "Hello");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "How are you?");
    }

    #[test]
    fn test_request_serialization_camel_case() {
        let body = GeminiRequest {
            contents: format_contents(&[ChatTurn::user("hi")]),
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(500),
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 500);
        assert!(json["contents"].is_array());
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Pele, "},{"text":"Mama."}]},"finishReason":"STOP"}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(json).unwrap();
        let candidate = &parsed.candidates[0];
        assert_eq!(candidate.finish_reason.as_deref(), Some("STOP"));
        let parts = &candidate.content.as_ref().unwrap().parts;
        assert_eq!(parts[0].text.as_deref(), Some("Pele, "));
        assert_eq!(parts[1].text.as_deref(), Some("Mama."));
    }

    #[test]
    fn test_response_without_candidates() {
        let parsed: GeminiResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
