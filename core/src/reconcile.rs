//! Reconciler session orchestration.
//!
//! A [`Reconciler`] owns one [`TableEngine`] at a time and walks the
//! `Unloaded -> Loaded -> Reordering -> Exporting -> Loaded` lifecycle:
//! load a database, let the caller permute the table list in memory, then
//! export by planning, executing, and serializing in one synchronous unit
//! with no suspension points.
//!
//! Export failures surface the engine error as-is; no rollback is attempted
//! beyond the engine's own batch transaction, and the in-memory ordering is
//! left untouched so the caller may retry.

use tracing::{debug, warn};

use crate::emit::emit;
use crate::engine::TableEngine;
use crate::error::{Error, Result};
use crate::plan::{order_for_execution, plan};

/// Lifecycle state of a reconciler session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No database handle held.
    Unloaded,
    /// Database loaded, table order untouched since the last read.
    Loaded,
    /// Table order permuted in memory, not yet exported.
    Reordering,
    /// Export in progress.
    Exporting,
}

/// Orchestrates table reordering and re-export against one database handle.
pub struct Reconciler<E: TableEngine> {
    engine: Option<E>,
    tables: Vec<String>,
    state: SessionState,
}

impl<E: TableEngine> Reconciler<E> {
    /// Creates an unloaded session.
    pub fn new() -> Self {
        Reconciler {
            engine: None,
            tables: Vec::new(),
            state: SessionState::Unloaded,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The ordered table name list; position encodes the desired order.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Loads a database handle, releasing any previously held one first.
    ///
    /// The table list is seeded from the schema read (the engine returns
    /// lexicographic order). An empty schema yields an empty list, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExportFailed`] if the schema cannot be read; the new
    /// handle is released before returning.
    pub fn load(&mut self, engine: E) -> Result<()> {
        if let Some(previous) = self.engine.take() {
            if let Err(err) = previous.close() {
                warn!(error = %err, "failed to close previous database handle");
            }
        }
        self.state = SessionState::Unloaded;
        self.tables.clear();

        let tables = match engine.list_tables() {
            Ok(tables) => tables,
            Err(err) => {
                let _ = engine.close();
                return Err(err.into());
            }
        };
        debug!(tables = tables.len(), "database loaded");
        self.engine = Some(engine);
        self.tables = tables;
        self.state = SessionState::Loaded;
        Ok(())
    }

    /// Moves the table at `from` to position `to`, shifting the rest.
    ///
    /// Pure in-memory reorder; no database access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoaded`] with no database, or
    /// [`Error::InvalidOrder`] for an out-of-range position.
    pub fn move_table(&mut self, from: usize, to: usize) -> Result<()> {
        if self.engine.is_none() {
            return Err(Error::NotLoaded);
        }
        let len = self.tables.len();
        if from >= len || to >= len {
            return Err(Error::InvalidOrder(format!(
                "position out of range: {from} -> {to} with {len} tables"
            )));
        }
        let table = self.tables.remove(from);
        self.tables.insert(to, table);
        self.state = SessionState::Reordering;
        Ok(())
    }

    /// Replaces the table order wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] if `desired` is not a permutation of
    /// the current list, or [`Error::NotLoaded`] with no database.
    pub fn set_order(&mut self, desired: Vec<String>) -> Result<()> {
        if self.engine.is_none() {
            return Err(Error::NotLoaded);
        }
        let mut current_sorted = self.tables.clone();
        let mut desired_sorted = desired.clone();
        current_sorted.sort();
        desired_sorted.sort();
        if current_sorted != desired_sorted {
            return Err(Error::InvalidOrder(
                "requested order is not a permutation of the loaded tables".to_string(),
            ));
        }
        self.tables = desired;
        self.state = SessionState::Reordering;
        Ok(())
    }

    /// Plans, executes, and serializes in one synchronous unit.
    ///
    /// On success the table list is refreshed from the renamed schema and
    /// the serialized image is returned. On failure the prior state and
    /// table order are retained so the caller may retry.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`], [`Error::InvalidOrder`],
    /// [`Error::CyclicRename`], or [`Error::ExportFailed`].
    pub fn export(&mut self) -> Result<Vec<u8>> {
        if self.engine.is_none() {
            return Err(Error::NotLoaded);
        }
        let prior = self.state;
        self.state = SessionState::Exporting;
        match self.run_export() {
            Ok(image) => {
                self.state = SessionState::Loaded;
                Ok(image)
            }
            Err(err) => {
                self.state = prior;
                Err(err)
            }
        }
    }

    fn run_export(&mut self) -> Result<Vec<u8>> {
        let engine = self.engine.as_mut().ok_or(Error::NotLoaded)?;
        let current = engine.list_tables()?;
        let planned = plan(&current, &self.tables)?;
        let ordered = order_for_execution(&planned)?;
        if !ordered.is_empty() {
            let statements = emit(&ordered);
            engine.execute_batch(&statements)?;
        }
        let image = engine.serialize()?;
        self.tables = engine.list_tables()?;
        debug!(
            renames = ordered.len(),
            tables = self.tables.len(),
            bytes = image.len(),
            "export complete"
        );
        Ok(image)
    }

    /// Releases the database handle and returns to [`SessionState::Unloaded`].
    pub fn unload(&mut self) -> Result<()> {
        if let Some(engine) = self.engine.take() {
            engine.close()?;
        }
        self.tables.clear();
        self.state = SessionState::Unloaded;
        Ok(())
    }
}

impl<E: TableEngine> Default for Reconciler<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;

    /// In-memory engine that applies rename statements to a name list.
    struct MockEngine {
        tables: Vec<String>,
        fail_execute: bool,
    }

    impl MockEngine {
        fn new(tables: &[&str]) -> Self {
            MockEngine {
                tables: tables.iter().map(|s| s.to_string()).collect(),
                fail_execute: false,
            }
        }
    }

    /// Extracts (from, to) out of an emitted rename statement. Test names
    /// contain no embedded quotes, so plain splitting is enough.
    fn parse_statement(statement: &str) -> (String, String) {
        let body = statement
            .strip_prefix("ALTER TABLE \"")
            .and_then(|rest| rest.strip_suffix("\";"))
            .expect("statement shape");
        let (from, to) = body.split_once("\" RENAME TO \"").expect("statement shape");
        (from.to_string(), to.to_string())
    }

    impl TableEngine for MockEngine {
        fn list_tables(&self) -> std::result::Result<Vec<String>, EngineError> {
            let mut sorted = self.tables.clone();
            sorted.sort();
            Ok(sorted)
        }

        fn execute_batch(&mut self, statements: &[String]) -> std::result::Result<(), EngineError> {
            if self.fail_execute {
                return Err(EngineError::new("forced failure"));
            }
            for statement in statements {
                let (from, to) = parse_statement(statement);
                if self.tables.iter().any(|t| *t == to) {
                    return Err(EngineError::new(format!("table {to} already exists")));
                }
                let slot = self
                    .tables
                    .iter_mut()
                    .find(|t| **t == from)
                    .ok_or_else(|| EngineError::new(format!("no such table {from}")))?;
                *slot = to;
            }
            Ok(())
        }

        fn serialize(&mut self) -> std::result::Result<Vec<u8>, EngineError> {
            let mut sorted = self.tables.clone();
            sorted.sort();
            Ok(sorted.join("\n").into_bytes())
        }

        fn close(self) -> std::result::Result<(), EngineError> {
            Ok(())
        }
    }

    #[test]
    fn test_load_seeds_sorted_table_list() {
        let mut session = Reconciler::new();
        session
            .load(MockEngine::new(&["Resistors", "Capacitors"]))
            .unwrap();
        assert_eq!(session.state(), SessionState::Loaded);
        assert_eq!(session.tables(), ["Capacitors", "Resistors"]);
    }

    #[test]
    fn test_load_empty_database_is_not_fatal() {
        let mut session = Reconciler::new();
        session.load(MockEngine::new(&[])).unwrap();
        assert_eq!(session.state(), SessionState::Loaded);
        assert!(session.tables().is_empty());
    }

    #[test]
    fn test_move_table_reorders_in_memory() {
        let mut session = Reconciler::new();
        session.load(MockEngine::new(&["A", "B", "C"])).unwrap();
        session.move_table(2, 0).unwrap();
        assert_eq!(session.state(), SessionState::Reordering);
        assert_eq!(session.tables(), ["C", "A", "B"]);
    }

    #[test]
    fn test_move_table_out_of_range() {
        let mut session = Reconciler::new();
        session.load(MockEngine::new(&["A", "B"])).unwrap();
        assert!(matches!(
            session.move_table(0, 5),
            Err(Error::InvalidOrder(_))
        ));
    }

    #[test]
    fn test_operations_require_loaded_database() {
        let mut session: Reconciler<MockEngine> = Reconciler::new();
        assert!(matches!(session.move_table(0, 1), Err(Error::NotLoaded)));
        assert!(matches!(
            session.set_order(vec!["A".to_string()]),
            Err(Error::NotLoaded)
        ));
        assert!(matches!(session.export(), Err(Error::NotLoaded)));
    }

    #[test]
    fn test_export_renames_and_refreshes() {
        let mut session = Reconciler::new();
        session
            .load(MockEngine::new(&["Resistors", "Capacitors"]))
            .unwrap();
        // Loaded order is [Capacitors, Resistors]; reverse it.
        session.move_table(1, 0).unwrap();
        let image = session.export().unwrap();
        assert_eq!(session.state(), SessionState::Loaded);
        assert_eq!(
            String::from_utf8(image).unwrap(),
            "001 - Resistors\n002 - Capacitors"
        );
        assert_eq!(session.tables(), ["001 - Resistors", "002 - Capacitors"]);
    }

    #[test]
    fn test_export_without_reorder_canonicalizes_prefixes() {
        let mut session = Reconciler::new();
        session.load(MockEngine::new(&["B", "A"])).unwrap();
        let image = session.export().unwrap();
        assert_eq!(String::from_utf8(image).unwrap(), "001 - A\n002 - B");
    }

    #[test]
    fn test_export_of_canonical_schema_is_a_no_op() {
        let mut session = Reconciler::new();
        session
            .load(MockEngine::new(&["001 - A", "002 - B"]))
            .unwrap();
        let image = session.export().unwrap();
        assert_eq!(String::from_utf8(image).unwrap(), "001 - A\n002 - B");
        assert_eq!(session.tables(), ["001 - A", "002 - B"]);
    }

    #[test]
    fn test_export_failure_retains_order_for_retry() {
        let mut engine = MockEngine::new(&["A", "B"]);
        engine.fail_execute = true;
        let mut session = Reconciler::new();
        session.load(engine).unwrap();
        session.move_table(1, 0).unwrap();
        let ordered_before = session.tables().to_vec();

        let err = session.export().unwrap_err();
        assert!(matches!(err, Error::ExportFailed(_)));
        assert_eq!(session.state(), SessionState::Reordering);
        assert_eq!(session.tables(), ordered_before.as_slice());
    }

    #[test]
    fn test_set_order_validates_permutation() {
        let mut session = Reconciler::new();
        session.load(MockEngine::new(&["A", "B"])).unwrap();
        assert!(matches!(
            session.set_order(vec!["A".to_string(), "C".to_string()]),
            Err(Error::InvalidOrder(_))
        ));
        session
            .set_order(vec!["B".to_string(), "A".to_string()])
            .unwrap();
        assert_eq!(session.tables(), ["B", "A"]);
    }

    #[test]
    fn test_load_replaces_previous_handle() {
        let mut session = Reconciler::new();
        session.load(MockEngine::new(&["A"])).unwrap();
        session.load(MockEngine::new(&["X", "Y"])).unwrap();
        assert_eq!(session.tables(), ["X", "Y"]);
    }

    #[test]
    fn test_unload_clears_session() {
        let mut session = Reconciler::new();
        session.load(MockEngine::new(&["A"])).unwrap();
        session.unload().unwrap();
        assert_eq!(session.state(), SessionState::Unloaded);
        assert!(session.tables().is_empty());
    }
}
