//! Table name parsing.
//!
//! A sequenced table name carries a leading `"<digits> - "` prefix encoding
//! its display position, e.g. `001 - Resistors`. [`parse`] splits any table
//! name into that optional prefix and the bare display name. Parsing is pure
//! and total: every string is valid input, worst case no prefix is found.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+) - ").expect("static regex must compile"));

/// A table name split into its optional sequence prefix and bare name.
///
/// Round-trip stable: prefixing the `bare` name and parsing again yields the
/// same `bare` name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedName {
    /// Ordinal parsed from a leading `"<digits> - "` prefix, if present.
    pub sequence: Option<u32>,
    /// The table name with any sequence prefix stripped.
    pub bare: String,
}

/// Splits a table name into its sequence prefix and bare name.
///
/// A name with no recognizable prefix comes back unchanged as the bare name.
/// A leading integer too large for `u32` is not treated as a prefix.
///
/// # Examples
///
/// ```
/// use resequence_core::parse;
///
/// assert_eq!(parse("001 - Resistors").sequence, Some(1));
/// assert_eq!(parse("001 - Resistors").bare, "Resistors");
/// assert_eq!(parse("Resistors").sequence, None);
/// ```
pub fn parse(table_name: &str) -> ParsedName {
    if let Some(caps) = PREFIX_RE.captures(table_name) {
        let matched_len = caps.get(0).map_or(0, |m| m.end());
        if let Some(sequence) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
            return ParsedName {
                sequence: Some(sequence),
                bare: table_name[matched_len..].to_string(),
            };
        }
    }
    ParsedName {
        sequence: None,
        bare: table_name.to_string(),
    }
}

/// Returns the bare name of a table, stripping any sequence prefix.
pub fn bare_name(table_name: &str) -> String {
    parse(table_name).bare
}
