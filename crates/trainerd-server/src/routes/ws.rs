//! WebSocket route handlers.

use crate::device_ws::handle_device_websocket;
use crate::events_ws::handle_events_websocket;
use crate::state::AppState;
use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
};
use std::sync::Arc;

pub async fn device_upgrade(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = handle_device_websocket(socket, state).await {
            tracing::error!(target: "trainerd::ws", "Device WebSocket error: {}", e);
        }
    })
}

pub async fn events_upgrade(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = handle_events_websocket(socket, state).await {
            tracing::error!(target: "trainerd::ws", "Presentation WebSocket error: {}", e);
        }
    })
}
