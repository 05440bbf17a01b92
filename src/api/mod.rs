//! REST API for the Sourcecast daemon.
//!
//! Provides HTTP endpoints for:
//! - Public episode reads (full list, by id, featured)
//! - Admin login
//! - Token-gated episode writes (create, replace, delete)

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{self, TokenClaims, TokenService};
use crate::repo::EpisodeRepository;
use crate::store::AdminStore;
use error::ApiError;

/// Shared state for API handlers.
pub struct ApiState {
    /// Episode repository over the storage backend.
    pub episodes: EpisodeRepository,

    /// Administrator lookups for login.
    pub admins: Arc<dyn AdminStore>,

    /// Bearer token issue/validate.
    pub tokens: TokenService,
}

impl ApiState {
    pub fn new(
        episodes: EpisodeRepository,
        admins: Arc<dyn AdminStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            episodes,
            admins,
            tokens,
        }
    }
}

/// Admin identity proven by a bearer token.
///
/// Write handlers take this extractor, so unauthenticated requests are
/// rejected before the body is read and the repository is never
/// invoked. A missing header and an invalid token reject identically.
pub struct AdminIdentity(pub TokenClaims);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = auth::bearer_token(&parts.headers).ok_or_else(ApiError::unauthenticated)?;
        let claims = state
            .tokens
            .validate(token)
            .ok_or_else(ApiError::unauthenticated)?;

        Ok(Self(claims))
    }
}

/// Build the API router with all routes.
pub fn router(state: Arc<ApiState>) -> Router {
    // CORS configuration - allow requests from any origin for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status/health
        .route("/status", get(handlers::status::status))
        // Admin login
        .route("/auth/login", post(handlers::auth::login))
        // Episodes
        .route(
            "/episodes",
            get(handlers::episodes::list_episodes).post(handlers::episodes::create_episode),
        )
        .route(
            "/episodes/:id",
            get(handlers::episodes::get_episode)
                .put(handlers::episodes::update_episode)
                .delete(handlers::episodes::delete_episode),
        )
        // Middleware
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                // Only log requests/responses that are NOT successful
                .on_request(())
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        let status = response.status();
                        if !status.is_success() {
                            tracing::warn!(
                                status = %status,
                                latency_ms = latency.as_millis(),
                                "request failed"
                            );
                        }
                    },
                ),
        )
        .with_state(state)
}

/// Start the API server.
pub async fn serve(state: Arc<ApiState>, bind_addr: &str) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    tracing::info!("Sourcecast API listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
