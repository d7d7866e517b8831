//! Kula HTTP gateway.
//!
//! Hosts the liveness route, the JSON text-interaction endpoint, the Twilio
//! voice webhooks, and static playback of synthesized audio. All handlers
//! are request-scoped; the only cross-request state is [`AppState`].

pub mod routes;
pub mod server;
pub mod state;

pub use server::{router, start_server};
pub use state::AppState;
