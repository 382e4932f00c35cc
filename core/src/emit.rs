//! SQL statement emission.
//!
//! Turns a [`RenamePlan`] into `ALTER TABLE ... RENAME TO ...;` statements.
//! Identifiers are always wrapped in double quotes with embedded quotes
//! doubled, per SQLite's quoting convention. The emitter performs no
//! reordering or validation; statements preserve plan order.

use crate::plan::RenamePlan;

/// Quotes a string as a SQLite identifier.
///
/// Every embedded `"` is doubled and the result is wrapped in double quotes,
/// whether or not quoting is strictly necessary.
///
/// # Examples
///
/// ```
/// use resequence_core::quote_ident;
///
/// assert_eq!(quote_ident("Resistors"), "\"Resistors\"");
/// assert_eq!(quote_ident("Foo\"Bar"), "\"Foo\"\"Bar\"");
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Emits one `ALTER TABLE` statement per rename pair, in plan order.
pub fn emit(plan: &RenamePlan) -> Vec<String> {
    plan.renames
        .iter()
        .map(|rename| {
            format!(
                "ALTER TABLE {} RENAME TO {};",
                quote_ident(&rename.from),
                quote_ident(&rename.to)
            )
        })
        .collect()
}
