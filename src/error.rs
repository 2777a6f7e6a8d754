//! Unified error types for the blog API.

use thiserror::Error;

/// Unified error type for the blog API.
#[derive(Error, Debug)]
pub enum BlogError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration is present but invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised by the storage accessor.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The database file could not be opened.
    #[error("failed to open database {path}: {reason}")]
    Open {
        /// Database path.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// A statement failed inside the driver.
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The connection worker went away.
    #[error("database connection error: {0}")]
    Connection(String),

    /// A stored value could not be mapped back to a record.
    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

impl From<tokio_rusqlite::Error> for StorageError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        match err {
            tokio_rusqlite::Error::Rusqlite(e) => StorageError::Sqlite(e),
            other => StorageError::Connection(other.to_string()),
        }
    }
}

/// Article operation errors.
#[derive(Error, Debug)]
pub enum ArticleError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// No article carries this id.
    #[error("article {0} not found")]
    NotFound(i64),

    /// Persistence layer failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, BlogError>;
