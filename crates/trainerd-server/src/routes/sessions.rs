//! Session listing and detail-view selection.

use super::error_response;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use trainerd_core::{SessionSummary, SessionView};
use trainerd_types::SlotId;

#[derive(Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
    pub attention_count: usize,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionListResponse>, (StatusCode, String)> {
    let sessions = state.console.list_sessions().await.map_err(error_response)?;
    let attention_count = sessions.iter().filter(|s| s.attention_requested).count();

    Ok(Json(SessionListResponse {
        sessions,
        attention_count,
    }))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(slot): Path<u32>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    let view = state
        .console
        .session(SlotId(slot))
        .await
        .map_err(error_response)?;
    Ok(Json(view))
}

/// Open the detail view for a slot.
pub async fn select(
    State(state): State<Arc<AppState>>,
    Path(slot): Path<u32>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    let view = state
        .console
        .select(SlotId(slot))
        .await
        .map_err(error_response)?;
    info!(target: "trainerd::api", "Operator opened {}", view.summary.slot);
    Ok(Json(view))
}

pub async fn clear_selection(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.console.deselect().await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
