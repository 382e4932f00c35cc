//! Database engine capability.
//!
//! The rename core never talks to a storage engine directly; it goes through
//! [`TableEngine`], which captures exactly the four collaborator operations
//! the system needs: enumerate user tables, execute a statement batch,
//! serialize the database to bytes, and release the handle.

use thiserror::Error;

/// Failure reported by a [`TableEngine`] implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EngineError(String);

impl EngineError {
    /// Creates an engine error from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        EngineError(message.into())
    }
}

/// Capability interface over a loaded database.
///
/// Implementations own the underlying handle exclusively; the reconciler
/// never holds two engines at once.
pub trait TableEngine {
    /// Returns the names of all user tables, sorted lexicographically.
    ///
    /// Engine-reserved tables (SQLite's `sqlite_` prefix) are excluded.
    /// Malformed schema rows are skipped rather than treated as fatal.
    fn list_tables(&self) -> Result<Vec<String>, EngineError>;

    /// Executes a batch of statements as a single transaction.
    fn execute_batch(&mut self, statements: &[String]) -> Result<(), EngineError>;

    /// Serializes the current database state to a complete file image.
    fn serialize(&mut self) -> Result<Vec<u8>, EngineError>;

    /// Releases the handle.
    fn close(self) -> Result<(), EngineError>
    where
        Self: Sized;
}
