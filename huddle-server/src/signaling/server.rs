use crate::config::RelayConfig;
use crate::signaling::{SignalingRelay, ws_handler, ws_join_handler};
use anyhow::Context;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::{error, info};

pub fn router(relay: SignalingRelay) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/ws/{participant_id}", get(ws_join_handler))
        .route("/health", get(health))
        .with_state(relay)
}

async fn health(State(relay): State<SignalingRelay>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "online": relay.directory().len(),
        "rooms": relay.rooms().len(),
    }))
}

/// Binds the listener and serves until Ctrl-C.
pub async fn serve(config: RelayConfig) -> anyhow::Result<()> {
    let relay = SignalingRelay::new(&config);
    let app = router(relay);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!(
        "Signaling relay listening on ws://{}/ws",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Relay server failed")?;

    info!("Signaling relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
