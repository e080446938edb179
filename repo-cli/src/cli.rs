//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use repository_sqlite::SqliteStoreConfig;

#[derive(Parser)]
#[command(name = "docstore")]
#[command(about = "SQLite document store CLI: init, put, get, list, delete", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Overrides DATABASE_URL.
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Overrides DOCSTORE_COLLECTION.
    #[arg(short, long, global = true)]
    pub collection: Option<String>,

    /// Also append logs to this file (LOG_FILE when unset).
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create the database and collection if they do not exist.
    Init,
    /// Store a JSON document under an id (replaces an existing one).
    Put { id: String, json: String },
    /// Print the document with this id.
    Get { id: String },
    /// Print all documents, most recently updated first.
    List,
    /// Remove the document with this id.
    Delete { id: String },
}

/// Loads SqliteStoreConfig from env, then applies CLI overrides.
pub fn load_config(database_url: Option<String>, collection: Option<String>) -> Result<SqliteStoreConfig> {
    let mut config = SqliteStoreConfig::from_env()?;
    if let Some(url) = database_url {
        config.database_url = url;
    }
    if let Some(collection) = collection {
        config.collection = collection;
    }
    config.validate()?;
    Ok(config)
}
