//! Storage backends for admins and episodes.
//!
//! The traits here are the seam between the repository and the storage
//! engine: production uses MongoDB, tests substitute the in-memory
//! store. Absence is not a failure - lookups return `Option` and
//! mutations report whether they matched - so callers can tell
//! "not found" apart from a storage error.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Admin, Episode};

/// Errors from the storage engine.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Episode collection operations.
#[async_trait]
pub trait EpisodeStore: Send + Sync {
    /// All episodes, newest first. No pagination.
    async fn list(&self) -> StoreResult<Vec<Episode>>;

    /// The episode carrying the latest flag, if any. When the flag is
    /// duplicated by a partial failure this returns an arbitrary match.
    async fn find_latest(&self) -> StoreResult<Option<Episode>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Episode>>;

    async fn insert(&self, episode: &Episode) -> StoreResult<()>;

    /// Replace the document with the same external id. `false` when no
    /// document matched.
    async fn replace(&self, episode: &Episode) -> StoreResult<bool>;

    /// `false` when no document had the id.
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    /// Clear the latest flag on every episode except `id`. Returns the
    /// number of documents modified.
    async fn clear_latest_except(&self, id: &str) -> StoreResult<u64>;
}

/// Administrator collection operations. Lookup only, plus the upsert
/// used by out-of-band provisioning.
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Admin>>;

    /// Insert the record, or replace the existing record with the same
    /// username.
    async fn upsert(&self, admin: &Admin) -> StoreResult<()>;
}
