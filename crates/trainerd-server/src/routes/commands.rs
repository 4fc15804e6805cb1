//! Operator command endpoint.

use super::error_response;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use trainerd_types::{OperatorCommand, Target};

#[derive(Deserialize)]
pub struct CommandRequest {
    pub target: Target,
    pub command: OperatorCommand,
}

#[derive(Serialize)]
pub struct CommandResponse {
    pub sent: usize,
}

pub async fn execute(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, (StatusCode, String)> {
    let summary = format!("{:?} -> {:?}", req.command, req.target);
    let report = state
        .console
        .execute(req.target, req.command)
        .await
        .map_err(error_response)?;

    info!(target: "trainerd::api", "{} ({} sent)", summary, report.sent);
    Ok(Json(CommandResponse { sent: report.sent }))
}
