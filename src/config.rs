//! Daemon configuration.

/// Fallback signing secret used when `JWT_SECRET` is unset.
///
/// Known weakness, kept for compatibility with existing deployments:
/// production must treat an unset secret as a configuration error.
const DEFAULT_JWT_SECRET: &str = "your-secret-key";

/// Configuration for the Sourcecast daemon.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the API server binds.
    pub bind: String,

    /// MongoDB connection string.
    pub mongodb_uri: String,

    /// Database name.
    pub db_name: String,

    /// Secret for signing bearer tokens, if configured.
    pub jwt_secret: Option<String>,
}

impl ServerConfig {
    /// Resolve the token-signing secret, warning loudly when the
    /// insecure fallback is in play.
    pub fn jwt_secret(&self) -> String {
        match &self.jwt_secret {
            Some(secret) => secret.clone(),
            None => {
                tracing::warn!(
                    "JWT_SECRET is not set; using the built-in development secret. \
                     Do not run a production deployment this way."
                );
                DEFAULT_JWT_SECRET.to_string()
            }
        }
    }
}
