//! In-memory stores for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{AdminStore, EpisodeStore, StoreResult};
use crate::model::{Admin, Episode};

/// Store backed by plain collections behind a mutex. Episodes keep
/// insertion order so ties on `created_at` still list newest first.
#[derive(Default)]
pub struct MemoryStore {
    episodes: Mutex<Vec<Episode>>,
    admins: Mutex<HashMap<String, Admin>>,
}

#[async_trait]
impl EpisodeStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Episode>> {
        let episodes = self.episodes.lock().await;
        // Reverse insertion order, then a stable sort on created_at.
        let mut out: Vec<Episode> = episodes.iter().rev().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn find_latest(&self) -> StoreResult<Option<Episode>> {
        let episodes = self.episodes.lock().await;
        Ok(episodes.iter().find(|e| e.is_latest).cloned())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Episode>> {
        let episodes = self.episodes.lock().await;
        Ok(episodes.iter().find(|e| e.id == id).cloned())
    }

    async fn insert(&self, episode: &Episode) -> StoreResult<()> {
        self.episodes.lock().await.push(episode.clone());
        Ok(())
    }

    async fn replace(&self, episode: &Episode) -> StoreResult<bool> {
        let mut episodes = self.episodes.lock().await;
        match episodes.iter_mut().find(|e| e.id == episode.id) {
            Some(slot) => {
                *slot = episode.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut episodes = self.episodes.lock().await;
        let before = episodes.len();
        episodes.retain(|e| e.id != id);
        Ok(episodes.len() < before)
    }

    async fn clear_latest_except(&self, id: &str) -> StoreResult<u64> {
        let mut episodes = self.episodes.lock().await;
        let mut cleared = 0;
        for episode in episodes.iter_mut() {
            if episode.id != id && episode.is_latest {
                episode.is_latest = false;
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Admin>> {
        Ok(self.admins.lock().await.get(username).cloned())
    }

    async fn upsert(&self, admin: &Admin) -> StoreResult<()> {
        self.admins
            .lock()
            .await
            .insert(admin.username.clone(), admin.clone());
        Ok(())
    }
}
