//! HTTP handlers: liveness, text interaction, and the Twilio voice webhooks.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use kula_twiml::{GatherOptions, VoiceResponse};

use crate::state::AppState;

const SAY_VOICE: &str = "Polly.Salli";
const GREETING: &str = "Welcome to Kula. Please tell me how I can help you after the beep.";
const NO_INPUT_CLOSING: &str = "I did not hear anything. Goodbye.";
const RETRY_APOLOGY: &str = "I had trouble processing your request. Please call again.";
const GATHER_TIMEOUT_SECS: u32 = 3;

pub async fn liveness() -> &'static str {
    "Kula Server is alive and running!"
}

// --- Text interaction ---

#[derive(Debug, Deserialize)]
pub struct InteractRequest {
    #[serde(default)]
    message: Option<String>,
}

pub async fn interact(
    State(state): State<Arc<AppState>>,
    Json(body): Json<InteractRequest>,
) -> Response {
    let Some(message) = body.message.filter(|m| !m.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Message is required." })),
        )
            .into_response();
    };

    info!(message = %message, "Text interaction received");

    match state.replies.reply(&message).await {
        Ok(reply) => {
            info!(reply_len = reply.len(), "Text interaction replied");
            (StatusCode::OK, Json(json!({ "reply": reply }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Text interaction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to get AI response." })),
            )
                .into_response()
        }
    }
}

// --- Voice webhooks ---

/// Call-start webhook: greet and gather speech. Request fields are ignored.
pub async fn voice_entry() -> Response {
    let mut vr = VoiceResponse::new();
    vr.say(SAY_VOICE, GREETING);
    vr.gather_speech(GatherOptions {
        timeout_secs: GATHER_TIMEOUT_SECS,
        action: "/handle-voice".into(),
    });

    twiml(&vr)
}

/// Twilio's transcription callback. The field is absent when the caller
/// said nothing before the gather timeout.
#[derive(Debug, Deserialize)]
pub struct SpeechCallback {
    #[serde(rename = "SpeechResult", default)]
    speech_result: Option<String>,
}

pub async fn handle_voice(
    State(state): State<Arc<AppState>>,
    Form(callback): Form<SpeechCallback>,
) -> Response {
    let mut vr = VoiceResponse::new();

    match callback.speech_result.filter(|s| !s.is_empty()) {
        None => {
            info!("Voice call ended with no speech input");
            vr.say(SAY_VOICE, NO_INPUT_CLOSING);
        }
        Some(speech) => {
            info!(speech = %speech, "Voice call transcription received");
            match run_voice_pipeline(&state, &speech).await {
                Ok(url) => {
                    info!(url = %url, "Playing synthesized reply");
                    vr.play(&url);
                }
                Err(e) => {
                    error!(error = %e, "Voice pipeline failed");
                    vr.say(SAY_VOICE, RETRY_APOLOGY);
                }
            }
        }
    }

    vr.hangup();
    twiml(&vr)
}

/// Reply, synthesize, persist, and return the playback URL.
async fn run_voice_pipeline(state: &AppState, speech: &str) -> anyhow::Result<String> {
    let reply = state.replies.reply(speech).await?;
    let audio = state.synth.synthesize(&reply).await?;
    let filename = kula_tts::artifact::write_artifact(&state.public_dir, &audio).await?;

    Ok(format!("{}/{}", state.public_base_url, filename))
}

fn twiml(vr: &VoiceResponse) -> Response {
    (
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        vr.to_xml(),
    )
        .into_response()
}
