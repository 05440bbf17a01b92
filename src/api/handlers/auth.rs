//! Admin login handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::ApiState;
use crate::auth;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent write requests.
    pub token: String,

    pub user: UserInfo,
}

#[derive(Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Exchange admin credentials for a bearer token.
///
/// Unknown usernames and wrong passwords produce the same 401, so the
/// endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let admin = state
        .admins
        .find_by_username(&request.username)
        .await?
        .ok_or_else(ApiError::bad_credentials)?;

    if !auth::verify_password(&request.password, &admin.password_hash) {
        return Err(ApiError::bad_credentials());
    }

    let token = state.tokens.issue(&admin.id, &admin.username, &admin.email)?;

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: admin.id,
            username: admin.username,
            email: admin.email,
        },
    }))
}
