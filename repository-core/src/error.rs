//! Repository error types.
//!
//! The lifecycle layer only produces [`RepositoryError::NotInitialized`] and
//! [`RepositoryError::Disposed`]; the other variants are for concrete stores.

use thiserror::Error;

/// Errors that can occur when initializing or using a repository.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Collection error: {0}")]
    Collection(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Repository not initialized")]
    NotInitialized,

    #[error("Repository already disposed")]
    Disposed,
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
