//! Mapping from sqlx and serde_json failures to [`RepositoryError`].

use repository_core::RepositoryError;

/// Pool and I/O failures become `Connection`; everything else is a `Database` error.
pub(crate) fn from_sqlx(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection(err.to_string())
        }
        other => RepositoryError::Database(other.to_string()),
    }
}

pub(crate) fn from_json(err: serde_json::Error) -> RepositoryError {
    RepositoryError::Serialization(err.to_string())
}

pub(crate) fn from_config(err: anyhow::Error) -> RepositoryError {
    RepositoryError::Config(err.to_string())
}
