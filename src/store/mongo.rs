//! MongoDB-backed stores.
//!
//! The client is established lazily on first use and reused for the
//! lifetime of the process; the driver's pool handles reconnection, so
//! the handle is never explicitly torn down.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Client, Collection, Database};
use tokio::sync::OnceCell;

use super::{AdminStore, EpisodeStore, StoreError, StoreResult};
use crate::model::{Admin, Episode};

/// Store over two collections, `admins` and `episodes`.
pub struct MongoStore {
    uri: String,
    db_name: String,
    client: OnceCell<Client>,
}

impl MongoStore {
    pub fn new(uri: impl Into<String>, db_name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            db_name: db_name.into(),
            client: OnceCell::new(),
        }
    }

    /// Acquire the database handle, connecting on first use.
    async fn database(&self) -> StoreResult<Database> {
        let client = self
            .client
            .get_or_try_init(|| async {
                tracing::info!(db = %self.db_name, "connecting to MongoDB");
                Client::with_uri_str(&self.uri)
                    .await
                    .map_err(StoreError::from)
            })
            .await?;

        Ok(client.database(&self.db_name))
    }

    async fn episodes(&self) -> StoreResult<Collection<Episode>> {
        Ok(self.database().await?.collection("episodes"))
    }

    async fn admins(&self) -> StoreResult<Collection<Admin>> {
        Ok(self.database().await?.collection("admins"))
    }
}

#[async_trait]
impl EpisodeStore for MongoStore {
    async fn list(&self) -> StoreResult<Vec<Episode>> {
        let cursor = self
            .episodes()
            .await?
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_latest(&self) -> StoreResult<Option<Episode>> {
        Ok(self
            .episodes()
            .await?
            .find_one(doc! { "isLatest": true })
            .await?)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Episode>> {
        Ok(self.episodes().await?.find_one(doc! { "id": id }).await?)
    }

    async fn insert(&self, episode: &Episode) -> StoreResult<()> {
        self.episodes().await?.insert_one(episode).await?;
        Ok(())
    }

    async fn replace(&self, episode: &Episode) -> StoreResult<bool> {
        let result = self
            .episodes()
            .await?
            .replace_one(doc! { "id": &episode.id }, episode)
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = self.episodes().await?.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn clear_latest_except(&self, id: &str) -> StoreResult<u64> {
        let result = self
            .episodes()
            .await?
            .update_many(
                doc! { "id": { "$ne": id } },
                doc! { "$set": { "isLatest": false } },
            )
            .await?;

        Ok(result.modified_count)
    }
}

#[async_trait]
impl AdminStore for MongoStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Admin>> {
        Ok(self
            .admins()
            .await?
            .find_one(doc! { "username": username })
            .await?)
    }

    async fn upsert(&self, admin: &Admin) -> StoreResult<()> {
        self.admins()
            .await?
            .replace_one(doc! { "username": &admin.username }, admin)
            .upsert(true)
            .await?;

        Ok(())
    }
}
