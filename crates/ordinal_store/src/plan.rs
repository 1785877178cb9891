//! Procedure planning.
//!
//! Backends read the slots of a table, ask this module what to write, and
//! apply the writes inside one transaction. Keeping the decision logic here
//! means every backend resolves collisions identically.
//!
//! ## Move
//!
//! Moving row `M` to position `t`:
//!
//! 1. If `t` is already `M`'s position nothing changes.
//! 2. If no other row holds `t`, `M` takes it.
//! 3. Otherwise every other holder of `t` is displaced, oldest first. Each
//!    displaced row takes the first position above `t` that no row other
//!    than `M` and the displaced rows occupies. `M`'s current slot counts as
//!    free since `M` is vacating it.
//!
//! In the common case (one neighbour, free slot right above) exactly two
//! rows change. A scan that would pass `i64::MAX` fails the move instead of
//! wrapping.

use crate::error::{StoreError, StoreResult};
use crate::row::Slot;
use serde::Serialize;
use std::collections::BTreeSet;

/// A row that was pushed out of the target slot by a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Displacement {
    /// Id of the displaced row.
    pub id: String,
    /// Position the row held before the move.
    pub from: i64,
    /// Position the row holds after the move.
    pub to: i64,
}

/// Result of a single move procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapOutcome {
    /// Id of the moved row.
    pub id: String,
    /// Position before the move.
    pub previous_position: i64,
    /// Position after the move.
    pub new_position: i64,
    /// Rows relocated to make room, in resolution order.
    pub displaced: Vec<Displacement>,
}

impl SwapOutcome {
    /// Returns true if the move changed nothing.
    #[must_use]
    pub fn is_no_op(&self) -> bool {
        self.previous_position == self.new_position && self.displaced.is_empty()
    }

    /// Position writes this outcome implies, moved row first.
    pub fn writes(&self) -> impl Iterator<Item = (&str, i64)> {
        let moved = (!self.is_no_op()).then_some((self.id.as_str(), self.new_position));
        moved
            .into_iter()
            .chain(self.displaced.iter().map(|d| (d.id.as_str(), d.to)))
    }
}

/// Plans moving `id` to `target` in `table`.
///
/// # Errors
///
/// Returns [`StoreError::RowNotFound`] if no slot carries `id`, and
/// [`StoreError::Constraint`] if a displaced row has no free position left
/// above the target.
pub fn plan_swap(table: &str, slots: &[Slot], id: &str, target: i64) -> StoreResult<SwapOutcome> {
    let mover = slots
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| StoreError::row_not_found(table, id))?;
    let previous_position = mover.position;

    let mut outcome = SwapOutcome {
        id: id.to_string(),
        previous_position,
        new_position: target,
        displaced: Vec::new(),
    };
    if previous_position == target {
        return Ok(outcome);
    }

    let mut holders: Vec<&Slot> = slots
        .iter()
        .filter(|s| s.id != id && s.position == target)
        .collect();
    if holders.is_empty() {
        return Ok(outcome);
    }
    holders.sort_by(|a, b| a.canonical_cmp(b));

    let mut occupied: BTreeSet<i64> = slots
        .iter()
        .filter(|s| s.id != id && s.position != target)
        .map(|s| s.position)
        .collect();

    let exhausted = || {
        StoreError::Constraint(format!(
            "no free position above {target} in table {table}"
        ))
    };
    let mut candidate = target;
    for holder in holders {
        candidate = candidate.checked_add(1).ok_or_else(exhausted)?;
        while occupied.contains(&candidate) {
            candidate = candidate.checked_add(1).ok_or_else(exhausted)?;
        }
        occupied.insert(candidate);
        outcome.displaced.push(Displacement {
            id: holder.id.clone(),
            from: holder.position,
            to: candidate,
        });
    }

    Ok(outcome)
}

/// Plans renumbering a table to `1..=N` in canonical order.
///
/// Returns only the rows whose position changes, so a dense table yields an
/// empty plan.
#[must_use]
pub fn plan_compaction(slots: &[Slot]) -> Vec<(String, i64)> {
    let mut ordered: Vec<&Slot> = slots.iter().collect();
    ordered.sort_by(|a, b| a.canonical_cmp(b));
    ordered
        .into_iter()
        .zip(1i64..)
        .filter(|(slot, rank)| slot.position != *rank)
        .map(|(slot, rank)| (slot.id.clone(), rank))
        .collect()
}

/// Returns `count + 1`, the append position for a table of `count` rows.
#[must_use]
pub fn next_position(count: u64) -> i64 {
    i64::try_from(count).map_or(i64::MAX, |n| n.saturating_add(1))
}
