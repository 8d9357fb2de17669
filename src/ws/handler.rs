//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// The bus receiver is taken before the upgrade completes, so no event
/// published after the handshake response is missed.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let event_rx = state.event_bus.subscribe();
    let pool_service = Arc::clone(&state.pool_service);
    tracing::debug!(receivers = state.event_bus.receiver_count(), "ws upgrade");

    ws.on_upgrade(move |socket| run_connection(socket, event_rx, pool_service))
}
