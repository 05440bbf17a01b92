//! Document types for Sourcecast.
//!
//! Two persisted collections: administrators and episodes. Sections and
//! sources are embedded in their episode and have no independent
//! identity or lifecycle.

pub mod admin;
pub mod episode;

pub use admin::Admin;
pub use episode::{Episode, EpisodeDraft, Section, Source};

/// Current unix time in milliseconds, the timestamp unit used on all
/// persisted documents.
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
