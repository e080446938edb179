//! SQLite-backed repository on top of `repository-core`.
//!
//! ## Modules
//!
//! - [`config`] – SqliteStoreConfig (env loading, validation)
//! - [`sqlite_pool`] – SqlitePoolManager
//! - [`store`] – SqliteStore, the StoreHooks implementation
//! - [`document_repo`] – DocumentRepository (JSON documents in one collection)

mod config;
mod document_repo;
mod error;
mod sqlite_pool;
mod store;

pub use config::{
    SqliteStoreConfig, DEFAULT_COLLECTION, DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS,
};
pub use document_repo::DocumentRepository;
pub use sqlite_pool::SqlitePoolManager;
pub use store::SqliteStore;
