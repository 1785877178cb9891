//! Operation outcomes and the caller-facing result report.

use crate::error::{CoreError, CoreResult};
use ordinal_store::SwapOutcome;
use serde::{Deserialize, Serialize};

/// Outcome of a successful move.
pub type MoveOutcome = SwapOutcome;

/// One entry of a batch move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Row to move.
    pub id: String,
    /// Target position.
    pub position: i64,
}

impl MoveRequest {
    /// Creates a move request.
    pub fn new(id: impl Into<String>, position: i64) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

/// Outcome of a batch that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Number of moves applied.
    pub applied: usize,
    /// Per-move outcomes, in request order.
    pub outcomes: Vec<MoveOutcome>,
}

/// What a caller shows the user after an ordering operation.
///
/// `message` is meant to be displayed verbatim. On a move that displaced a
/// neighbour, `new_position` carries the neighbour's new slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    /// Whether the operation took effect.
    pub success: bool,
    /// Human-readable description.
    pub message: String,
    /// New slot of the displaced neighbour, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_position: Option<i64>,
}

impl OrderResult {
    /// A successful report.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            new_position: None,
        }
    }

    /// A failed report carrying the error text.
    pub fn failed(err: &CoreError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            new_position: None,
        }
    }

    /// Reports a move.
    pub fn from_move(result: &CoreResult<MoveOutcome>) -> Self {
        match result {
            Ok(outcome) if outcome.is_no_op() => Self::ok(format!(
                "{} is already at position {}",
                outcome.id, outcome.new_position
            )),
            Ok(outcome) => {
                let mut message =
                    format!("moved {} to position {}", outcome.id, outcome.new_position);
                for d in &outcome.displaced {
                    message.push_str(&format!(
                        "; {} was moved to position {} to make room",
                        d.id, d.to
                    ));
                }
                Self {
                    success: true,
                    message,
                    new_position: outcome.displaced.first().map(|d| d.to),
                }
            }
            Err(err) => Self::failed(err),
        }
    }

    /// Reports a batch.
    pub fn from_batch(result: &CoreResult<BatchOutcome>) -> Self {
        match result {
            Ok(batch) => Self::ok(format!("applied {} moves", batch.applied)),
            Err(err) => Self::failed(err),
        }
    }

    /// Reports a compaction or reorder that rewrote `rows` rows.
    pub fn from_renumber(result: &CoreResult<usize>) -> Self {
        match result {
            Ok(0) => Self::ok("positions already contiguous"),
            Ok(rows) => Self::ok(format!("renumbered {rows} rows")),
            Err(err) => Self::failed(err),
        }
    }
}
