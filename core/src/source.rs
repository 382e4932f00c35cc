//! Input file acceptance rules.
//!
//! A database image is accepted only when its source filename carries one of
//! the recognized SQLite extensions, and exactly one file may be supplied
//! per load.

use std::path::Path;

use crate::error::{Error, Result};

/// File extensions accepted as SQLite database images.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["db", "sqlite", "sqlite3"];

/// Default export filename when the source filename is unknown.
pub const DEFAULT_EXPORT_NAME: &str = "export.sqlite3";

/// Validates that a filename carries a supported database extension.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFile`] for any other extension (or none).
pub fn validate_database_filename(filename: &str) -> Result<()> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str());
    match extension {
        Some(ext)
            if SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext)) =>
        {
            Ok(())
        }
        _ => Err(Error::UnsupportedFile(filename.to_string())),
    }
}

/// Selects the single file from a supplied list.
///
/// # Errors
///
/// Returns [`Error::MultipleFiles`] unless exactly one file was supplied.
pub fn single_file<T>(files: &[T]) -> Result<&T> {
    match files {
        [one] => Ok(one),
        _ => Err(Error::MultipleFiles(files.len())),
    }
}

/// Derives the export filename from the originally loaded file.
///
/// The export is named after the source file; with no source name the
/// default is used.
pub fn export_filename(source: Option<&str>) -> String {
    source
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_EXPORT_NAME.to_string())
}
