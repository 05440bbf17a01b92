//! Episode documents.
//!
//! An episode carries an ordered list of sections, each with its own
//! ordered list of reference sources. Field names are camelCase on the
//! wire and in storage (`audioUrl`, `isLatest`, `createdAt`).

use serde::{Deserialize, Serialize};

/// A reference link inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// A timestamped chapter of an episode and its sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,

    /// Free-form range string, e.g. "00:00:00 - 00:15:00".
    pub timestamp: String,

    #[serde(default)]
    pub sources: Vec<Source>,
}

/// A published episode.
///
/// `id` is the externally-facing identifier, assigned by the server at
/// creation time. The storage engine's own document id stays internal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,

    pub title: String,

    /// Calendar date as entered by the admin, e.g. "2024-03-01".
    pub date: String,

    pub description: String,

    /// URL of the external embeddable player.
    pub audio_url: String,

    #[serde(default)]
    pub sections: Vec<Section>,

    /// At most one episode in the collection carries this flag.
    #[serde(default)]
    pub is_latest: bool,

    /// Unix milliseconds.
    pub created_at: i64,

    /// Unix milliseconds.
    pub updated_at: i64,
}

/// The mutable fields of an episode, as submitted by the admin forms.
///
/// Writes are full-document replacements: editing one field still
/// resubmits the whole sections/sources array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDraft {
    pub title: String,
    pub date: String,
    pub description: String,
    pub audio_url: String,

    #[serde(default)]
    pub sections: Vec<Section>,

    #[serde(default)]
    pub is_latest: bool,
}

impl EpisodeDraft {
    /// Silently drop malformed sections instead of rejecting the write.
    ///
    /// A section survives only when its title and timestamp are both
    /// non-empty after trimming and at least one of its sources has a
    /// non-empty title and url. Sources inside a surviving section are
    /// kept as submitted.
    pub fn sanitize(&mut self) {
        self.sections.retain(|section| {
            !section.title.trim().is_empty()
                && !section.timestamp.trim().is_empty()
                && section
                    .sources
                    .iter()
                    .any(|source| !source.title.trim().is_empty() && !source.url.trim().is_empty())
        });
    }
}
