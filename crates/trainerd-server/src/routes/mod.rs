//! HTTP route handlers.

pub mod catalogs;
pub mod commands;
pub mod sessions;
pub mod ws;

use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use trainerd_core::ConsoleError;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub devices: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        devices: state.transport.peer_count(),
    })
}

/// Operator API and socket routes, without middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/sessions", get(sessions::list))
        .route("/sessions/{slot}", get(sessions::get))
        .route("/sessions/{slot}/select", post(sessions::select))
        .route("/selection/clear", post(sessions::clear_selection))
        .route("/commands", post(commands::execute))
        .route("/catalogs", get(catalogs::get))
        .route("/health", get(health));

    let ws_routes = Router::new()
        .route("/device", get(ws::device_upgrade))
        .route("/events", get(ws::events_upgrade));

    Router::new()
        .nest("/api", api_routes)
        .nest("/ws", ws_routes)
        .with_state(state)
}

/// Map a console error onto an HTTP status.
pub fn error_response(e: ConsoleError) -> (StatusCode, String) {
    let status = match &e {
        ConsoleError::SessionNotFound(_) | ConsoleError::SlotNotFound(_) => StatusCode::NOT_FOUND,
        ConsoleError::AlreadySelected(_) | ConsoleError::SessionAlreadyExists(_) => {
            StatusCode::CONFLICT
        }
        ConsoleError::InvalidOperatorInput { .. }
        | ConsoleError::HintCategoryOutOfRange(_)
        | ConsoleError::Protocol(_) => StatusCode::BAD_REQUEST,
        ConsoleError::Transport(_) => StatusCode::BAD_GATEWAY,
        ConsoleError::ChannelSendError => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, e.to_string())
}
