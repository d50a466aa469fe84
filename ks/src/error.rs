//! Key-value store errors

use thiserror::Error;

/// Errors from key-value store operations
#[derive(Debug, Error)]
pub enum KvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to lock store: {0}")]
    Lock(std::io::Error),

    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}

/// Result alias for key-value store operations
pub type KvResult<T> = Result<T, KvError>;
