use std::sync::Arc;

use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Opening the database failed. Every caller that waited on the same
    /// attempt receives the same underlying error.
    #[error("Could not open artifact store: {0}")]
    Open(Arc<StoreError>),

    /// A blocking database task panicked or was cancelled.
    #[error("Database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
