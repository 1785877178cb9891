//! Error types for the ordering engine.

use ordinal_store::StoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in ordering operations.
///
/// Validation errors are raised before the store is touched. Store errors
/// mean the atomic unit of work failed and nothing was written. The engine
/// never retries; see [`CoreError::is_transient`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// The position store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A target position below 1.
    #[error("invalid position {position}: positions start at 1")]
    InvalidPosition {
        /// The rejected value.
        position: i64,
    },

    /// A target position that is not an integer.
    #[error("invalid position {input:?}: not a whole number")]
    NonNumericPosition {
        /// The rejected input.
        input: String,
    },

    /// A collection name with no registry entry.
    #[error("unknown collection: {name}")]
    UnknownCollection {
        /// The name that failed to resolve.
        name: String,
    },

    /// A row could not be decoded into the requested type.
    #[error("cannot decode row from {collection}: {message}")]
    Decode {
        /// Collection being read.
        collection: &'static str,
        /// Decoder message.
        message: String,
    },

    /// A batch longer than the configured limit.
    #[error("batch of {len} moves exceeds the limit of {max}")]
    BatchTooLarge {
        /// Number of moves submitted.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A batch stopped at a failing move. Earlier moves stay applied.
    #[error("batch stopped at move {failed_index} after {applied} applied: {source}")]
    BatchInterrupted {
        /// Moves applied before the failure.
        applied: usize,
        /// Index of the failing move.
        failed_index: usize,
        /// Why the move failed.
        source: Box<CoreError>,
    },
}

impl CoreError {
    /// Creates an invalid position error.
    pub fn invalid_position(position: i64) -> Self {
        Self::InvalidPosition { position }
    }

    /// Creates a non-numeric position error.
    pub fn non_numeric_position(input: impl Into<String>) -> Self {
        Self::NonNumericPosition {
            input: input.into(),
        }
    }

    /// Creates an unknown collection error.
    pub fn unknown_collection(name: impl Into<String>) -> Self {
        Self::UnknownCollection { name: name.into() }
    }

    /// Creates a decode error.
    pub fn decode(collection: &'static str, err: &serde_json::Error) -> Self {
        Self::Decode {
            collection,
            message: err.to_string(),
        }
    }

    /// Returns true for errors raised before any store interaction.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidPosition { .. }
                | Self::NonNumericPosition { .. }
                | Self::UnknownCollection { .. }
                | Self::BatchTooLarge { .. }
        )
    }

    /// Returns true if the caller may reasonably retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(err) => err.is_transient(),
            Self::BatchInterrupted { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// Number of moves applied before this error, for batch failures.
    #[must_use]
    pub fn applied_moves(&self) -> usize {
        match self {
            Self::BatchInterrupted { applied, .. } => *applied,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors() {
        assert!(CoreError::invalid_position(0).is_validation());
        assert!(CoreError::non_numeric_position("abc").is_validation());
        assert!(!CoreError::Store(StoreError::Unavailable("x".into())).is_validation());
    }

    #[test]
    fn batch_error_reports_progress() {
        let err = CoreError::BatchInterrupted {
            applied: 1,
            failed_index: 1,
            source: Box::new(CoreError::Store(StoreError::Conflict("busy".into()))),
        };
        assert_eq!(err.applied_moves(), 1);
        assert!(err.is_transient());
        assert_eq!(
            err.to_string(),
            "batch stopped at move 1 after 1 applied: store error: transaction conflict: busy"
        );
    }
}
