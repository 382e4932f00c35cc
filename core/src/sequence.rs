//! Canonical name generation.
//!
//! Given a position and a bare name, the canonical table name is the
//! zero-padded 3-digit ordinal of the position (1-based), the `" - "`
//! separator, and the bare name. Past position 999 the ordinal simply grows
//! to four digits and beyond; this is accepted boundary behavior, not an
//! error.

/// Separator between the sequence ordinal and the bare name.
pub const PREFIX_SEPARATOR: &str = " - ";

/// Returns the canonical table name for a bare name at a 0-based position.
///
/// # Examples
///
/// ```
/// use resequence_core::canonical_name;
///
/// assert_eq!(canonical_name(0, "Resistors"), "001 - Resistors");
/// assert_eq!(canonical_name(999, "Overflow"), "1000 - Overflow");
/// ```
pub fn canonical_name(position: usize, bare: &str) -> String {
    format!("{:03}{PREFIX_SEPARATOR}{bare}", position + 1)
}

/// Maps an ordered list of bare names to their canonical table names.
///
/// Pure and total; the output always has the same length as the input.
pub fn sequence<I, S>(bare_names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    bare_names
        .into_iter()
        .enumerate()
        .map(|(position, bare)| canonical_name(position, bare.as_ref()))
        .collect()
}
