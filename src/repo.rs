//! Episode repository: write invariants over the raw store.
//!
//! The one real invariant of the system is that at most one episode
//! carries the latest flag. It is maintained as an explicit two-step
//! write - the primary write first, then clearing the flag on every
//! other document - rather than a hidden persistence hook. The storage
//! engine offers no cross-document transaction, so under concurrent
//! admin writes a transient window with zero or two latest episodes is
//! accepted; the next flag-setting write corrects it.

use std::sync::Arc;

use rand::Rng;

use crate::model::{now_millis, Episode, EpisodeDraft};
use crate::store::{EpisodeStore, StoreResult};

/// Repository over the episode collection.
#[derive(Clone)]
pub struct EpisodeRepository {
    store: Arc<dyn EpisodeStore>,
}

impl EpisodeRepository {
    pub fn new(store: Arc<dyn EpisodeStore>) -> Self {
        Self { store }
    }

    /// All episodes, newest first.
    pub async fn list_all(&self) -> StoreResult<Vec<Episode>> {
        self.store.list().await
    }

    /// The featured episode. At most one result by invariant; if the
    /// invariant was broken by a partial failure this degrades to the
    /// store's arbitrary match rather than an error.
    pub async fn get_latest(&self) -> StoreResult<Option<Episode>> {
        self.store.find_latest().await
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Episode>> {
        self.store.find_by_id(id).await
    }

    /// Create an episode with a server-assigned id. New episodes always
    /// become the featured one, evicting the prior holder of the flag.
    pub async fn create(&self, draft: EpisodeDraft) -> StoreResult<Episode> {
        let now = now_millis();
        let episode = Episode {
            id: new_episode_id(now),
            title: draft.title,
            date: draft.date,
            description: draft.description,
            audio_url: draft.audio_url,
            sections: draft.sections,
            is_latest: true,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&episode).await?;
        self.store.clear_latest_except(&episode.id).await?;

        Ok(episode)
    }

    /// Full replacement of the mutable fields; partial updates are not
    /// supported. The external id and creation time are preserved.
    ///
    /// Clearing the flag here can leave the collection with zero latest
    /// episodes; that state is accepted and not auto-corrected.
    pub async fn replace(&self, id: &str, draft: EpisodeDraft) -> StoreResult<Option<Episode>> {
        let Some(existing) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };

        let episode = Episode {
            id: existing.id,
            title: draft.title,
            date: draft.date,
            description: draft.description,
            audio_url: draft.audio_url,
            sections: draft.sections,
            is_latest: draft.is_latest,
            created_at: existing.created_at,
            updated_at: now_millis(),
        };

        if !self.store.replace(&episode).await? {
            return Ok(None);
        }
        if episode.is_latest {
            self.store.clear_latest_except(&episode.id).await?;
        }

        Ok(Some(episode))
    }

    /// Delete by external id. Never promotes another episode, so
    /// deleting the featured episode leaves the collection with none.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        self.store.delete(id).await
    }
}

/// Server-assigned external id: creation time plus a random suffix, so
/// uniqueness needs no central sequence. Collision probability is
/// treated as negligible.
fn new_episode_id(now: i64) -> String {
    const SUFFIX_LEN: usize = 6;
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    format!("ep{now}{suffix}")
}
