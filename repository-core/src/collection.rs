//! Data operations a concrete repository offers once initialized.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A stored document with its bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    pub id: String,
    pub body: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// CRUD over one collection of documents of type `T`.
///
/// Implementations return [`RepositoryError::NotInitialized`](crate::RepositoryError::NotInitialized)
/// before `initialize` has completed and [`RepositoryError::Disposed`](crate::RepositoryError::Disposed)
/// after `dispose`.
#[async_trait]
pub trait DocumentCollection<T>: Send + Sync
where
    T: Send + Sync,
{
    /// Inserts the document, or replaces the body of an existing one with the same id.
    async fn save(&self, id: &str, body: &T) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Document<T>>>;

    /// All documents, most recently updated first.
    async fn find_all(&self) -> Result<Vec<Document<T>>>;

    /// Returns whether a document was removed.
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn count(&self) -> Result<i64>;
}
