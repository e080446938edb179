//! Extension points a concrete store overrides to plug into [`BaseRepository`](crate::BaseRepository).
//!
//! Every hook defaults to a no-op, so a store only implements what its backend needs.
//! A document database that creates collections on first write, for example, can leave
//! [`StoreHooks::create_collection_if_not_exists`] alone.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait StoreHooks: Send + Sync {
    /// Creates the backing database if it does not exist yet. Runs first during initialization.
    async fn create_database_if_not_exists(&self) -> Result<()> {
        Ok(())
    }

    /// Creates the collection (table) if it does not exist yet. Runs after the database step succeeded.
    async fn create_collection_if_not_exists(&self) -> Result<()> {
        Ok(())
    }

    /// Awaits teardown that cannot finish inside a synchronous dispose, such as closing a pool.
    /// Runs from [`Repository::close`](crate::Repository::close) before the dispose hooks.
    async fn shutdown(&self) {}

    /// Releases resources owned by the store, such as open connections. Runs once, on first dispose.
    fn dispose_managed(&self) {}

    /// Releases anything left after [`StoreHooks::dispose_managed`]. Runs once, right after it.
    fn dispose_unmanaged(&self) {}
}

/// Hooks that do nothing; useful for a repository with no backing store of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl StoreHooks for NoopHooks {}
