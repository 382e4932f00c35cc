//! Rename planning.
//!
//! The planner diffs the current table names against the canonical names
//! implied by a desired ordering and produces the minimal set of rename
//! pairs. Tables already carrying their canonical name are omitted, so
//! planning is idempotent: a second plan over an already-renamed schema is
//! empty.
//!
//! SQLite applies `ALTER TABLE ... RENAME TO` statements one at a time with
//! immediate visibility, even inside a transaction, so a plan must also be
//! ordered such that no target name collides with a name still held by a
//! pending rename. [`order_for_execution`] performs that ordering and fails
//! with [`Error::CyclicRename`] when a rotation admits no safe sequence.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::parse::{bare_name, parse};
use crate::sequence::sequence;

/// A single rename operation from one table name to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    /// Current table name.
    pub from: String,
    /// Canonical table name for the table's desired position.
    pub to: String,
}

/// An ordered set of rename operations.
///
/// Invariants: `from` values are pairwise distinct, `to` values are pairwise
/// distinct, and no pair is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePlan {
    /// Rename pairs in plan order.
    pub renames: Vec<Rename>,
}

impl RenamePlan {
    /// Returns `true` when no renames are needed.
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    /// Number of rename pairs in the plan.
    pub fn len(&self) -> usize {
        self.renames.len()
    }
}

/// Computes the rename plan moving `current` table names to the canonical
/// names implied by `desired`.
///
/// Pairs are emitted in desired-list order. Tables whose current name
/// already matches their canonical name are skipped.
///
/// # Errors
///
/// Returns [`Error::InvalidOrder`] if `desired` is not a permutation of
/// `current`.
pub fn plan(current: &[String], desired: &[String]) -> Result<RenamePlan> {
    let mut current_sorted = current.to_vec();
    let mut desired_sorted = desired.to_vec();
    current_sorted.sort();
    desired_sorted.sort();
    if current_sorted != desired_sorted {
        return Err(Error::InvalidOrder(format!(
            "desired order is not a permutation of the current tables \
             ({} current, {} desired)",
            current.len(),
            desired.len()
        )));
    }

    let targets = sequence(desired.iter().map(|name| parse(name).bare));
    let renames: Vec<Rename> = desired
        .iter()
        .zip(targets)
        .filter(|(from, to)| from.as_str() != to.as_str())
        .map(|(from, to)| Rename {
            from: from.clone(),
            to,
        })
        .collect();

    debug!(
        tables = desired.len(),
        renames = renames.len(),
        "computed rename plan"
    );
    Ok(RenamePlan { renames })
}

/// Orders a plan so it can be executed one statement at a time.
///
/// A rename whose target name is still held by another pending rename's
/// source table must run after that rename has vacated the name. Plan order
/// is preserved wherever no dependency forces otherwise.
///
/// # Errors
///
/// Returns [`Error::CyclicRename`] if the renames form a rotation with no
/// collision-free sequence. This can only happen when two live tables share
/// a bare name.
pub fn order_for_execution(plan: &RenamePlan) -> Result<RenamePlan> {
    let mut pending: Vec<Rename> = plan.renames.clone();
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let next = pending.iter().position(|candidate| {
            !pending
                .iter()
                .any(|other| other.from != candidate.from && other.from == candidate.to)
        });
        match next {
            Some(idx) => ordered.push(pending.remove(idx)),
            None => {
                let stuck: Vec<&str> = pending.iter().map(|r| r.from.as_str()).collect();
                return Err(Error::CyclicRename(format!(
                    "no collision-free ordering for renames of {}",
                    stuck.join(", ")
                )));
            }
        }
    }

    Ok(RenamePlan { renames: ordered })
}

/// Resolves a user-supplied ordering of bare (or full) names against the
/// current table names.
///
/// Each requested name is matched against the not-yet-consumed current
/// tables, first by full name and then by bare name, so `A` and `001 - A`
/// both select the table currently named `001 - A`. Tables sharing a bare
/// name are consumed in current-list order.
///
/// # Errors
///
/// Returns [`Error::InvalidOrder`] if the requested order has the wrong
/// length or names a table that does not exist (or was already consumed).
pub fn resolve_order(current: &[String], requested: &[String]) -> Result<Vec<String>> {
    if requested.len() != current.len() {
        return Err(Error::InvalidOrder(format!(
            "expected {} table names, got {}",
            current.len(),
            requested.len()
        )));
    }

    let mut used = vec![false; current.len()];
    let mut resolved = Vec::with_capacity(current.len());
    for wanted in requested {
        let found = current.iter().enumerate().find(|(idx, name)| {
            !used[*idx] && (name.as_str() == wanted.as_str() || bare_name(name) == *wanted)
        });
        match found {
            Some((idx, name)) => {
                used[idx] = true;
                resolved.push(name.clone());
            }
            None => {
                return Err(Error::InvalidOrder(format!(
                    "no table matches '{wanted}'"
                )));
            }
        }
    }
    Ok(resolved)
}
