//! Error types for the rename-reconciliation core.
//!
//! Every error here is terminal for the operation that raised it; the only
//! recovery path is re-invocation by the caller after addressing the cause.

use thiserror::Error;

use crate::engine::EngineError;

/// Errors that can occur while loading, planning, or exporting.
#[derive(Debug, Error)]
pub enum Error {
    /// Input file does not carry a supported SQLite extension.
    #[error("unsupported file '{0}': expected a .db, .sqlite, or .sqlite3 file")]
    UnsupportedFile(String),

    /// More than one input file supplied where exactly one is expected.
    #[error("expected exactly one database file, got {0}")]
    MultipleFiles(usize),

    /// Desired order is not a permutation of the current table names.
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// No collision-free sequential ordering of the renames exists.
    #[error("cyclic rename: {0}")]
    CyclicRename(String),

    /// Statement execution or serialization failed in the database engine.
    #[error("export failed: {0}")]
    ExportFailed(String),

    /// Operation requires a loaded database but none is loaded.
    #[error("no database loaded")]
    NotLoaded,
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        Error::ExportFailed(err.to_string())
    }
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
