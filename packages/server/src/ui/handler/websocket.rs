//! WebSocket upgrade endpoint.

use std::sync::Arc;

use axum::{
    extract::{State, ws::WebSocketUpgrade},
    response::IntoResponse,
};

use crate::{hub::session, ui::state::AppState};

/// Upgrade the request and hand the socket to the hub.
///
/// Authentication happens in front of this endpoint; every upgrade that
/// reaches it becomes a hub connection.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::debug!("WebSocket upgrade requested");

    ws.on_upgrade(move |socket| {
        session::serve(
            socket,
            state.hub.clone(),
            state.outbound_buffer,
            state.inbound.clone(),
        )
    })
}
