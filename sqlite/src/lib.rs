//! SQLite table engine for the resequence rename core.
//!
//! Provides [`SqliteStore`], a rusqlite-backed implementation of
//! [`resequence_core::TableEngine`] that can open a database either from a
//! complete byte image ([`SqliteStore::open_bytes`]) or from a file on disk
//! ([`SqliteStore::open_path`]), and serialize it back to bytes after
//! renames have been applied.
//!
//! # Example
//!
//! ```no_run
//! use resequence_core::Reconciler;
//! use resequence_sqlite::SqliteStore;
//!
//! let image = std::fs::read("library.sqlite3").unwrap();
//! let store = SqliteStore::open_bytes(&image).unwrap();
//!
//! let mut session = Reconciler::new();
//! session.load(store).unwrap();
//! session.move_table(2, 0).unwrap();
//!
//! let renamed = session.export().unwrap();
//! std::fs::write("library.sqlite3", renamed).unwrap();
//! ```

mod error;
mod store;

pub use error::{Result, SqliteError};
pub use store::SqliteStore;
