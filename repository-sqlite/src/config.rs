//! Store configuration: database URL, collection name, pool size.
//! Loaded from DATABASE_URL, DOCSTORE_COLLECTION and DOCSTORE_MAX_CONNECTIONS.

use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:docstore.db";
pub const DEFAULT_COLLECTION: &str = "documents";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Where and how the SQLite store keeps its documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteStoreConfig {
    pub database_url: String,
    pub collection: String,
    pub max_connections: u32,
}

impl SqliteStoreConfig {
    pub fn new(database_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            collection: collection.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// In-memory database with the default collection.
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:", DEFAULT_COLLECTION)
    }

    /// Loads from env; every variable is optional and falls back to its default.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let collection =
            env::var("DOCSTORE_COLLECTION").unwrap_or_else(|_| DEFAULT_COLLECTION.to_string());
        let max_connections = match env::var("DOCSTORE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DOCSTORE_MAX_CONNECTIONS is not a number: {}", raw))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let config = Self {
            database_url,
            collection,
            max_connections,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would otherwise fail late, inside SQL.
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            anyhow::bail!("database URL is empty");
        }
        if self.max_connections == 0 {
            anyhow::bail!("max_connections must be at least 1");
        }
        if !is_valid_identifier(&self.collection) {
            anyhow::bail!(
                "invalid collection name '{}': use letters, digits and '_', not starting with a digit",
                self.collection
            );
        }
        Ok(())
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

impl Default for SqliteStoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL, DEFAULT_COLLECTION)
    }
}

// The collection name is interpolated into DDL, so only plain identifiers pass.
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
