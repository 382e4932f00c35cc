//! Error types for opening and backing SQLite stores.

use thiserror::Error;

/// Errors that can occur while constructing a [`SqliteStore`](crate::SqliteStore).
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Filesystem failure while staging or reading the backing file.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// The supplied bytes are not a readable SQLite database image.
    #[error("invalid database image: {0}")]
    InvalidImage(String),
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
