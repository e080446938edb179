//! SQLite connection pool wrapper for the store.

use std::str::FromStr;

use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::SqliteStoreConfig;

/// Manages a single SQLite pool; creates the DB file if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Opens a pool for the configured URL (file path or in-memory).
    ///
    /// An in-memory database lives only as long as its connection, so it gets exactly one
    /// connection that is never reaped.
    pub async fn connect(config: &SqliteStoreConfig) -> Result<Self, sqlx::Error> {
        info!("Initializing SQLite pool: {}", config.database_url);

        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn into_pool(self) -> SqlitePool {
        self.pool
    }
}
