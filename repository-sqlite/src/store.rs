//! SQLite implementation of the repository store hooks.
//!
//! - create database → open the pool, creating the file if missing
//! - create collection → `CREATE TABLE IF NOT EXISTS` for the configured collection
//! - shutdown → close the pool and await it
//! - dispose managed → close the pool without awaiting

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use repository_core::{RepositoryError, Result, StoreHooks};
use sqlx::SqlitePool;
use tokio::runtime::RuntimeFlavor;
use tracing::{debug, info};

use crate::config::SqliteStoreConfig;
use crate::error::from_sqlx;
use crate::sqlite_pool::SqlitePoolManager;

pub struct SqliteStore {
    config: SqliteStoreConfig,
    pool: Mutex<Option<SqlitePoolManager>>,
}

impl SqliteStore {
    pub fn new(config: SqliteStoreConfig) -> Self {
        Self {
            config,
            pool: Mutex::new(None),
        }
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    /// The open pool; `NotInitialized` until the database hook has run.
    pub fn pool(&self) -> Result<SqlitePool> {
        self.slot()
            .as_ref()
            .map(|manager| manager.pool().clone())
            .ok_or(RepositoryError::NotInitialized)
    }

    pub fn is_connected(&self) -> bool {
        self.slot().is_some()
    }

    fn slot(&self) -> MutexGuard<'_, Option<SqlitePoolManager>> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StoreHooks for SqliteStore {
    async fn create_database_if_not_exists(&self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }

        let manager = SqlitePoolManager::connect(&self.config)
            .await
            .map_err(from_sqlx)?;
        *self.slot() = Some(manager);
        Ok(())
    }

    async fn create_collection_if_not_exists(&self) -> Result<()> {
        info!(
            "Creating collection table if not exist: {}",
            self.config.collection
        );

        let pool = self.pool().map_err(|_| {
            RepositoryError::Collection(format!(
                "no database open for collection {}",
                self.config.collection
            ))
        })?;
        let collection = &self.config.collection;

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{collection}" (
                id TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#
        ))
        .execute(&pool)
        .await
        .map_err(|e| RepositoryError::Collection(e.to_string()))?;

        sqlx::query(&format!(
            r#"CREATE INDEX IF NOT EXISTS "idx_{collection}_updated_at" ON "{collection}"(updated_at)"#
        ))
        .execute(&pool)
        .await
        .map_err(|e| RepositoryError::Collection(e.to_string()))?;

        info!("Collection table ready: {}", collection);
        Ok(())
    }

    async fn shutdown(&self) {
        let Some(manager) = self.slot().take() else {
            return;
        };
        manager.into_pool().close().await;
        info!("Closed SQLite pool: {}", self.config.database_url);
    }

    fn dispose_managed(&self) {
        let Some(manager) = self.slot().take() else {
            return;
        };
        let pool = manager.into_pool();

        // close() is async: block on it where the runtime allows, otherwise spawn it.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(pool.close()));
            }
            Ok(handle) => {
                handle.spawn(async move { pool.close().await });
            }
            Err(_) => drop(pool),
        }
        debug!("Released SQLite pool: {}", self.config.database_url);
    }
}
