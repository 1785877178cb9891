//! Creation timestamps.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Hands out `created_at` values in Unix milliseconds.
///
/// Values are strictly increasing per clock even when several rows are
/// inserted within the same millisecond, which keeps the creation-time
/// tie-break meaningful.
#[derive(Debug, Default)]
pub struct CreationClock {
    last: AtomicI64,
}

impl CreationClock {
    /// Creates a clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next timestamp.
    pub fn stamp(&self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let next = now.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange(last, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }

    /// Makes every later stamp greater than `seen`.
    ///
    /// Used when a store is reopened with rows stamped by an earlier clock.
    pub fn observe(&self, seen: i64) {
        self.last.fetch_max(seen, Ordering::SeqCst);
    }
}
