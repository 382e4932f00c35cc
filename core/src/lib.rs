//! Rename-reconciliation core for sequence-prefixed SQLite table names.
//!
//! A CAD component library keeps one SQLite table per component category,
//! displayed in the order encoded by a zero-padded prefix on each table name
//! (`001 - Resistors`, `002 - Capacitors`, ...). This crate computes and
//! orchestrates the renames needed to re-label every table for a new
//! ordering:
//!
//! - [`parse`] — split a table name into its optional sequence prefix and
//!   bare display name.
//! - [`sequence`] / [`canonical_name`] — derive the canonical prefixed name
//!   for each position.
//! - [`plan`] / [`order_for_execution`] — diff current names against
//!   canonical names into a minimal, collision-safe [`RenamePlan`].
//! - [`emit`] — render the plan as quoted `ALTER TABLE ... RENAME TO ...;`
//!   statements.
//! - [`Reconciler`] — session orchestration over any [`TableEngine`]
//!   implementation (load, reorder, export, unload).
//!
//! # Example
//!
//! ```
//! use resequence_core::{emit, order_for_execution, plan};
//!
//! let current = vec!["Capacitors".to_string(), "Resistors".to_string()];
//! let desired = vec!["Resistors".to_string(), "Capacitors".to_string()];
//!
//! let planned = plan(&current, &desired).unwrap();
//! let ordered = order_for_execution(&planned).unwrap();
//! let statements = emit(&ordered);
//!
//! assert_eq!(
//!     statements[0],
//!     "ALTER TABLE \"Resistors\" RENAME TO \"001 - Resistors\";"
//! );
//! ```

mod emit;
mod engine;
mod error;
mod parse;
mod plan;
mod reconcile;
mod sequence;
mod source;

pub use emit::{emit, quote_ident};
pub use engine::{EngineError, TableEngine};
pub use error::{Error, Result};
pub use parse::{ParsedName, bare_name, parse};
pub use plan::{Rename, RenamePlan, order_for_execution, plan, resolve_order};
pub use reconcile::{Reconciler, SessionState};
pub use sequence::{PREFIX_SEPARATOR, canonical_name, sequence};
pub use source::{
    DEFAULT_EXPORT_NAME, SUPPORTED_EXTENSIONS, export_filename, single_file,
    validate_database_filename,
};
