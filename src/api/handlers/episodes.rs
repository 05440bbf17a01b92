//! Episode CRUD handlers.
//!
//! Reads are public; writes require a valid bearer token (the
//! `AdminIdentity` extractor) and sanitize the submitted sections
//! before anything reaches the repository.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::error::ApiError;
use crate::api::{AdminIdentity, ApiState};
use crate::model::{Episode, EpisodeDraft};

#[derive(Deserialize, Default)]
pub struct ListQuery {
    /// `?latest=true` selects the featured episode instead of the list.
    pub latest: Option<String>,
}

/// GET /episodes - the full collection, newest first. With
/// `?latest=true`, the featured episode (null when there is none).
pub async fn list_episodes(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    if query.latest.as_deref() == Some("true") {
        let episode = state.episodes.get_latest().await?;
        return Ok(Json(episode).into_response());
    }

    let episodes = state.episodes.list_all().await?;
    Ok(Json(episodes).into_response())
}

/// GET /episodes/:id
pub async fn get_episode(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Episode>, ApiError> {
    let episode = state
        .episodes
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("Episode not found"))?;

    Ok(Json(episode))
}

/// POST /episodes (admin only). The server assigns the external id and
/// the new episode always becomes the featured one.
pub async fn create_episode(
    State(state): State<Arc<ApiState>>,
    _admin: AdminIdentity,
    Json(mut draft): Json<EpisodeDraft>,
) -> Result<(StatusCode, Json<Episode>), ApiError> {
    draft.sanitize();

    let episode = state.episodes.create(draft).await?;

    Ok((StatusCode::CREATED, Json(episode)))
}

/// PUT /episodes/:id (admin only) - full-document replacement.
pub async fn update_episode(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    _admin: AdminIdentity,
    Json(mut draft): Json<EpisodeDraft>,
) -> Result<Json<Episode>, ApiError> {
    draft.sanitize();

    let episode = state
        .episodes
        .replace(&id, draft)
        .await?
        .ok_or(ApiError::NotFound("Episode not found"))?;

    Ok(Json(episode))
}

/// DELETE /episodes/:id (admin only).
pub async fn delete_episode(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    _admin: AdminIdentity,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.episodes.delete(&id).await? {
        return Err(ApiError::NotFound("Episode not found"));
    }

    Ok(Json(json!({ "message": "Episode deleted successfully" })))
}
