//! Monotonic clock abstraction for injectable time sources.
//!
//! Controllers that measure their own time step read the clock through this
//! trait so tests can substitute a deterministic source. The timestamp type is
//! [`std::time::Instant`]: opaque, comparable, and monotonic by construction.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// A source of monotonic timestamps.
pub trait MonotonicClock {
    /// Current reading of the clock.
    fn now(&self) -> Instant;
}

/// Seconds elapsed between two clock readings.
///
/// Returns 0.0 if `later` precedes `earlier` (monotonic clocks do not go
/// backwards, but `Instant::duration_since` saturates rather than panics).
pub fn elapsed_seconds(earlier: Instant, later: Instant) -> f64 {
    later.duration_since(earlier).as_secs_f64()
}

/// The process monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl MonotonicClock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A hand-advanced clock for deterministic tests.
///
/// Starts at an arbitrary base instant and only moves when [`advance`] is
/// called. Interior mutability lets tests advance it while a controller holds
/// it by value; not `Sync`, which is fine for single-threaded test loops.
///
/// [`advance`]: ManualClock::advance
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Cell<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.offset
            .set(self.offset.get() + Duration::from_secs_f64(seconds));
    }
}

impl MonotonicClock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(elapsed_seconds(a, b) >= 0.0);
    }

    #[test]
    fn manual_clock_advances_exactly() {
        let clock = ManualClock::new();
        let a = clock.now();
        clock.advance(0.25);
        let b = clock.now();
        assert!((elapsed_seconds(a, b) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn manual_clock_is_frozen_between_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn elapsed_seconds_saturates_backwards() {
        let clock = ManualClock::new();
        let a = clock.now();
        clock.advance(1.0);
        let b = clock.now();
        assert_eq!(elapsed_seconds(b, a), 0.0);
    }
}
