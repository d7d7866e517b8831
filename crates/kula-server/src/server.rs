//! Axum server assembly and lifecycle.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

/// Build the application router.
///
/// API routes are registered first so they take priority over the static
/// catch-all serving synthesized audio from the public directory.
pub fn router(state: Arc<AppState>) -> Router {
    let public_dir = state.public_dir.clone();

    Router::new()
        .route("/", get(routes::liveness))
        .route("/interact", post(routes::interact))
        .route("/voice", post(routes::voice_entry))
        .route("/handle-voice", post(routes::handle_voice))
        .fallback_service(ServeDir::new(public_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and block until shutdown.
pub async fn start_server(state: Arc<AppState>, port: u16) -> anyhow::Result<()> {
    let bind_addr = state.config.bind_addr();
    let addr = format!("{bind_addr}:{port}");

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Kula server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
