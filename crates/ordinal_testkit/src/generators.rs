//! Property-based test generators using proptest.
//!
//! Provides strategies for collections and move sequences. Row choice is
//! expressed as a [`prop::sample::Index`] so a sequence stays valid for
//! whatever number of rows the test seeded.

use proptest::prelude::*;

/// Strategy for valid target positions, biased towards small values so
/// moves actually collide.
pub fn position_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        8 => 1i64..=24,
        1 => 25i64..=10_000,
    ]
}

/// Strategy for target positions the engine must reject.
pub fn invalid_position_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![Just(0i64), Just(-1i64), i64::MIN..0i64]
}

/// One step of a generated move sequence.
#[derive(Debug, Clone)]
pub struct MoveStep {
    /// Which seeded row to move.
    pub row: prop::sample::Index,
    /// Target position.
    pub target: i64,
}

impl MoveStep {
    /// Resolves the row against the ids a test seeded.
    pub fn id<'a>(&self, ids: &'a [String]) -> &'a str {
        self.row.get::<String>(ids)
    }
}

/// Strategy for a single move.
pub fn move_step_strategy() -> impl Strategy<Value = MoveStep> {
    (any::<prop::sample::Index>(), position_strategy())
        .prop_map(|(row, target)| MoveStep { row, target })
}

/// Strategy for a sequence of moves.
pub fn move_sequence_strategy(
    min_moves: usize,
    max_moves: usize,
) -> impl Strategy<Value = Vec<MoveStep>> {
    prop::collection::vec(move_step_strategy(), min_moves..max_moves)
}

/// Strategy for arbitrary stored positions: gaps, duplicates and any
/// insertion order.
pub fn scattered_positions_strategy(max_rows: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1i64..=40, 0..max_rows)
}

/// Strategy for a collection size.
pub fn collection_size_strategy(max_rows: usize) -> impl Strategy<Value = usize> {
    1..=max_rows.max(1)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
