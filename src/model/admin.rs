//! Administrator records.

use serde::{Deserialize, Serialize};

/// An administrator account.
///
/// Provisioned out of band (the `create-admin` subcommand); never
/// created or mutated through the HTTP surface. The password is hashed
/// before it reaches the store and the plaintext is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    /// Storage identity, carried into issued tokens as `userId`.
    #[serde(rename = "_id")]
    pub id: String,

    /// Unique login name.
    pub username: String,

    /// bcrypt hash of the password.
    pub password_hash: String,

    /// Unique contact address.
    pub email: String,

    /// Unix milliseconds.
    pub created_at: i64,

    /// Unix milliseconds.
    pub updated_at: i64,
}
