//! Record identifier generation.
//!
//! Identifiers are integers unique within a session for a given record
//! kind. Each record store owns its own generator.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::clock::Clock;

/// Hands out session-unique record identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns the next identifier. Never returns the same value twice.
    fn next_id(&self) -> i64;
}

/// Monotonic counter starting at a fixed value.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicI64,
}

impl SequentialIds {
    /// Creates a counter whose first identifier is `first`.
    #[must_use]
    pub const fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Time-derived identifiers: the current Unix time in milliseconds, bumped
/// past the previous value when two calls land in the same millisecond.
pub struct ClockIds<C: Clock> {
    clock: C,
    last: AtomicI64,
}

impl<C: Clock> ClockIds<C> {
    /// Creates a generator reading time from `clock`.
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            last: AtomicI64::new(0),
        }
    }
}

impl<C: Clock> IdGenerator for ClockIds<C> {
    fn next_id(&self) -> i64 {
        let now = self.clock.now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use crate::clock::ManualClock;

    use super::*;

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::starting_at(10);
        assert_eq!(ids.next_id(), 10);
        assert_eq!(ids.next_id(), 11);
    }

    #[test]
    fn clock_ids_never_repeat_within_a_millisecond() {
        let start = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap();
        let ids = ClockIds::new(ManualClock::new(start));

        let first = ids.next_id();
        let second = ids.next_id();
        let third = ids.next_id();

        assert_eq!(first, 1_700_000_000_000);
        assert_eq!(second, first + 1);
        assert_eq!(third, first + 2);
    }
}
