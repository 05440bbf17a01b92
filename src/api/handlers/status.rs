//! Status and health check handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::ApiState;

/// Health response.
#[derive(Serialize)]
pub struct StatusResponse {
    /// Service status.
    pub status: String,

    /// Number of published episodes.
    pub episodes: usize,

    /// External id of the featured episode, if any.
    pub latest_id: Option<String>,
}

/// Health check endpoint. Stays up even when the store is unreachable.
pub async fn status(State(state): State<Arc<ApiState>>) -> Json<StatusResponse> {
    let episodes = state.episodes.list_all().await.unwrap_or_default();
    let latest_id = episodes.iter().find(|e| e.is_latest).map(|e| e.id.clone());

    Json(StatusResponse {
        status: "ok".to_string(),
        episodes: episodes.len(),
        latest_id,
    })
}
