//! rusqlite-backed implementation of the [`TableEngine`] capability.
//!
//! SQLite cannot open a database from a raw byte buffer, so
//! [`SqliteStore::open_bytes`] stages the image in a temporary file that
//! lives as long as the store. Serialization reads the backing file back
//! after the batch transaction has committed; the store forces rollback
//! journal mode at open so the main file is always complete at that point
//! (WAL mode persists inside a database image and would otherwise leave
//! committed pages in a side file).

use std::fmt::Display;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use resequence_core::{EngineError, TableEngine};
use rusqlite::{Connection, OpenFlags};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, SqliteError};

const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

#[derive(Debug)]
enum Backing {
    /// Staged copy of a byte image; deleted when the store is dropped.
    Temp(NamedTempFile),
    /// Caller-owned database file.
    File(PathBuf),
}

/// A loaded SQLite database exposing the table-engine operations.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    backing: Backing,
}

impl SqliteStore {
    /// Opens a database image from bytes by staging it in a temporary file.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidImage`] if the bytes are not a readable
    /// SQLite database, or [`SqliteError::IoError`] if staging fails.
    pub fn open_bytes(image: &[u8]) -> Result<Self> {
        let mut staged = NamedTempFile::new()?;
        staged.write_all(image)?;
        staged.flush()?;
        let conn = open_connection(staged.path())?;
        debug!(bytes = image.len(), "opened database from byte image");
        Ok(SqliteStore {
            conn,
            backing: Backing::Temp(staged),
        })
    }

    /// Opens a database file in place. Renames executed through the store
    /// modify this file directly.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidImage`] if the file is not a readable
    /// SQLite database.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_connection(&path)?;
        debug!(path = %path.display(), "opened database file");
        Ok(SqliteStore {
            conn,
            backing: Backing::File(path),
        })
    }

    fn path(&self) -> &Path {
        match &self.backing {
            Backing::Temp(staged) => staged.path(),
            Backing::File(path) => path,
        }
    }
}

fn open_connection(path: &Path) -> Result<Connection> {
    // No SQLITE_OPEN_CREATE: a missing file is an error, not a new database.
    let flags = OpenFlags::default().difference(OpenFlags::SQLITE_OPEN_CREATE);
    let conn = Connection::open_with_flags(path, flags)?;
    // Probing the schema forces the header read that surfaces corruption.
    conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })
    .map_err(|err| SqliteError::InvalidImage(err.to_string()))?;
    let _: String = conn.query_row("PRAGMA journal_mode = DELETE", [], |row| row.get(0))?;
    Ok(conn)
}

fn engine_err(err: impl Display) -> EngineError {
    EngineError::new(err.to_string())
}

impl TableEngine for SqliteStore {
    fn list_tables(&self) -> std::result::Result<Vec<String>, EngineError> {
        let mut stmt = self.conn.prepare(LIST_TABLES_SQL).map_err(engine_err)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(engine_err)?
            .filter_map(std::result::Result::ok)
            .collect();
        Ok(names)
    }

    fn execute_batch(&mut self, statements: &[String]) -> std::result::Result<(), EngineError> {
        let tx = self.conn.transaction().map_err(engine_err)?;
        for statement in statements {
            tx.execute_batch(statement).map_err(engine_err)?;
        }
        tx.commit().map_err(engine_err)
    }

    fn serialize(&mut self) -> std::result::Result<Vec<u8>, EngineError> {
        fs::read(self.path()).map_err(engine_err)
    }

    fn close(self) -> std::result::Result<(), EngineError> {
        let SqliteStore { conn, backing } = self;
        conn.close().map_err(|(_, err)| engine_err(err))?;
        drop(backing);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_tables(tables: &[&str]) -> SqliteStore {
        let mut store = SqliteStore::open_bytes(&empty_image()).unwrap();
        let creates: Vec<String> = tables
            .iter()
            .map(|name| format!("CREATE TABLE \"{}\" (id INTEGER PRIMARY KEY);", name))
            .collect();
        store.execute_batch(&creates).unwrap();
        store
    }

    /// A zero-length file is a valid empty SQLite database.
    fn empty_image() -> Vec<u8> {
        Vec::new()
    }

    #[test]
    fn test_open_bytes_rejects_garbage() {
        let err = SqliteStore::open_bytes(b"this is not a database image").unwrap_err();
        assert!(matches!(err, SqliteError::InvalidImage(_)));
    }

    #[test]
    fn test_list_tables_sorted_and_without_reserved_names() {
        let store = store_with_tables(&["Resistors", "Capacitors"]);
        assert_eq!(
            store.list_tables().unwrap(),
            vec!["Capacitors".to_string(), "Resistors".to_string()]
        );
    }

    #[test]
    fn test_execute_batch_renames_atomically() {
        let mut store = store_with_tables(&["A", "B"]);
        let statements = vec![
            "ALTER TABLE \"A\" RENAME TO \"001 - A\";".to_string(),
            "ALTER TABLE \"B\" RENAME TO \"002 - B\";".to_string(),
        ];
        store.execute_batch(&statements).unwrap();
        assert_eq!(
            store.list_tables().unwrap(),
            vec!["001 - A".to_string(), "002 - B".to_string()]
        );
    }

    #[test]
    fn test_execute_batch_rolls_back_on_failure() {
        let mut store = store_with_tables(&["A", "B"]);
        let statements = vec![
            "ALTER TABLE \"A\" RENAME TO \"001 - A\";".to_string(),
            "ALTER TABLE \"missing\" RENAME TO \"002 - X\";".to_string(),
        ];
        assert!(store.execute_batch(&statements).is_err());
        // First rename rolled back with the failed transaction.
        assert_eq!(
            store.list_tables().unwrap(),
            vec!["A".to_string(), "B".to_string()]
        );
    }

    #[test]
    fn test_serialize_round_trips_through_bytes() {
        let mut store = store_with_tables(&["Diodes"]);
        let image = store.serialize().unwrap();
        store.close().unwrap();

        let reopened = SqliteStore::open_bytes(&image).unwrap();
        assert_eq!(reopened.list_tables().unwrap(), vec!["Diodes".to_string()]);
    }

    #[test]
    fn test_quoted_identifiers_survive_rename() {
        let mut store = SqliteStore::open_bytes(&empty_image()).unwrap();
        store
            .execute_batch(&["CREATE TABLE \"Foo\"\"Bar\" (id INTEGER);".to_string()])
            .unwrap();
        store
            .execute_batch(&["ALTER TABLE \"Foo\"\"Bar\" RENAME TO \"001 - Foo\"\"Bar\";".to_string()])
            .unwrap();
        assert_eq!(
            store.list_tables().unwrap(),
            vec!["001 - Foo\"Bar".to_string()]
        );
    }
}
