//! Engine configuration.

/// Configuration for an [`crate::OrderEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Longest batch accepted by `batch_move`.
    pub max_batch_moves: usize,

    /// Whether to check for duplicate positions after every write.
    ///
    /// A duplicate found this way is logged, never returned as an error:
    /// the write itself succeeded.
    pub verify_after_write: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_batch_moves: 500,
            verify_after_write: false,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the batch length limit.
    #[must_use]
    pub const fn max_batch_moves(mut self, value: usize) -> Self {
        self.max_batch_moves = value;
        self
    }

    /// Sets whether to verify after writes.
    #[must_use]
    pub const fn verify_after_write(mut self, value: bool) -> Self {
        self.verify_after_write = value;
        self
    }
}
