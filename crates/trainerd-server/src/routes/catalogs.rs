//! Catalogs advertised by devices.

use super::error_response;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use trainerd_core::Catalogs;

pub async fn get(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Catalogs>, (StatusCode, String)> {
    let catalogs = state.console.catalogs().await.map_err(error_response)?;
    Ok(Json(catalogs))
}
