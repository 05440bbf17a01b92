//! HTTP error mapping.
//!
//! The repository and token service never produce HTTP semantics; this
//! type is the single place where their sentinel results and failures
//! become status codes. All error bodies are `{"error": <message>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input, e.g. missing login fields.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or a missing/invalid/expired token. The message
    /// never distinguishes a wrong password from an unknown username.
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    /// Storage failure. The response body stays generic; detail is
    /// logged server-side only.
    #[error("Internal server error")]
    Internal(#[from] StoreError),

    /// Token issuance failure.
    #[error("Internal server error")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    /// 401 for write endpoints: no token, or an invalid one.
    pub fn unauthenticated() -> Self {
        Self::Unauthorized("Unauthorized")
    }

    /// 401 for login, identical for unknown usernames and wrong
    /// passwords.
    pub fn bad_credentials() -> Self {
        Self::Unauthorized("Invalid credentials")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(source) => {
                tracing::error!(error = %source, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Token(source) => {
                tracing::error!(error = %source, "token issuance failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
