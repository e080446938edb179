//! Document repository: JSON documents in one SQLite collection table.
//!
//! Wraps [`BaseRepository<SqliteStore>`] for the lifecycle and implements
//! [`DocumentCollection`] on top of the store's pool.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use repository_core::{
    BaseRepository, Document, DocumentCollection, LifecycleState, Repository, RepositoryError,
    Result,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::config::SqliteStoreConfig;
use crate::error::{from_config, from_json, from_sqlx};
use crate::store::SqliteStore;

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    body: String,
    created_at: String,
    updated_at: String,
}

impl DocumentRow {
    fn into_document<T: DeserializeOwned>(self) -> Result<Document<T>> {
        Ok(Document {
            body: serde_json::from_str(&self.body).map_err(from_json)?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            id: self.id,
        })
    }
}

// Fixed-width nanosecond RFC 3339 keeps lexical order equal to time order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Serialization(format!("bad timestamp '{}': {}", raw, e)))
}

fn pool_unavailable(state: LifecycleState) -> RepositoryError {
    match state {
        LifecycleState::Disposed => RepositoryError::Disposed,
        LifecycleState::Fresh | LifecycleState::Initialized => RepositoryError::NotInitialized,
    }
}

pub struct DocumentRepository<T> {
    inner: BaseRepository<SqliteStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> DocumentRepository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Creates a repository in the `Fresh` state. No I/O happens until `initialize`.
    pub fn new(config: SqliteStoreConfig) -> Result<Self> {
        config.validate().map_err(from_config)?;
        Ok(Self {
            inner: BaseRepository::new(SqliteStore::new(config)),
            _marker: PhantomData,
        })
    }

    /// Creates and initializes the repository, so it is ready for data operations.
    pub async fn open(config: SqliteStoreConfig) -> Result<Self> {
        let repo = Self::new(config)?;
        repo.initialize().await?;
        Ok(repo)
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.state()
    }

    pub fn collection(&self) -> &str {
        self.inner.hooks().collection()
    }

    /// Saves `body` under a freshly generated id and returns it.
    pub async fn insert(&self, body: &T) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.save(&id, body).await?;
        Ok(id)
    }

    fn ready_pool(&self) -> Result<SqlitePool> {
        self.inner.ensure_ready()?;
        // The pool can be released between the check and here.
        self.inner
            .hooks()
            .pool()
            .map_err(|_| pool_unavailable(self.inner.state()))
    }
}

#[async_trait]
impl<T> Repository for DocumentRepository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn initialize(&self) -> Result<()> {
        self.inner.initialize().await
    }

    fn dispose(&self) {
        self.inner.dispose()
    }

    async fn close(&self) {
        self.inner.close().await
    }

    fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

#[async_trait]
impl<T> DocumentCollection<T> for DocumentRepository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn save(&self, id: &str, body: &T) -> Result<()> {
        let pool = self.ready_pool()?;
        let json = serde_json::to_string(body).map_err(from_json)?;
        let now = format_timestamp(Utc::now());

        sqlx::query(&format!(
            r#"
            INSERT INTO "{}" (id, body, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at
            "#,
            self.collection()
        ))
        .bind(id)
        .bind(&json)
        .bind(&now)
        .bind(&now)
        .execute(&pool)
        .await
        .map_err(from_sqlx)?;

        info!("Saved document: collection={}, id={}", self.collection(), id);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document<T>>> {
        let pool = self.ready_pool()?;

        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"SELECT id, body, created_at, updated_at FROM "{}" WHERE id = ?"#,
            self.collection()
        ))
        .bind(id)
        .fetch_optional(&pool)
        .await
        .map_err(from_sqlx)?;

        row.map(DocumentRow::into_document).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Document<T>>> {
        let pool = self.ready_pool()?;

        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"SELECT id, body, created_at, updated_at FROM "{}" ORDER BY updated_at DESC, id ASC"#,
            self.collection()
        ))
        .fetch_all(&pool)
        .await
        .map_err(from_sqlx)?;

        info!("Retrieved {} documents from {}", rows.len(), self.collection());
        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let pool = self.ready_pool()?;

        let result = sqlx::query(&format!(
            r#"DELETE FROM "{}" WHERE id = ?"#,
            self.collection()
        ))
        .bind(id)
        .execute(&pool)
        .await
        .map_err(from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let pool = self.ready_pool()?;

        let total: (i64,) = sqlx::query_as(&format!(
            r#"SELECT COUNT(*) FROM "{}""#,
            self.collection()
        ))
        .fetch_one(&pool)
        .await
        .map_err(from_sqlx)?;

        Ok(total.0)
    }
}
