//! Monotonic time source for rate accounting.
//!
//! The pipeline never blocks; reading the clock is its only interaction
//! with the outside world. Injecting the clock keeps frame-rollover
//! behavior deterministic under test.

use std::time::Instant;

/// Monotonic nanosecond clock. Zero is reserved as the "bucket never
/// initialized" sentinel, so implementations must never return 0.
pub trait Clock {
    fn now_ns(&self) -> u64;
}

/// Process-monotonic clock anchored at construction time.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ns(&self) -> u64 {
        // +1 keeps 0 reserved for the uninitialized-bucket sentinel.
        u64::try_from(self.epoch.elapsed().as_nanos())
            .unwrap_or(u64::MAX)
            .saturating_add(1)
    }
}

/// Hand-advanced clock for tests and benchmarks.
#[derive(Debug)]
pub struct ManualClock {
    now_ns: std::cell::Cell<u64>,
}

impl ManualClock {
    /// Starts at `start_ns`; pass a non-zero value (0 is the uninitialized
    /// sentinel).
    pub fn starting_at(start_ns: u64) -> Self {
        Self {
            now_ns: std::cell::Cell::new(start_ns),
        }
    }

    pub fn advance(&self, delta_ns: u64) {
        self.now_ns.set(self.now_ns.get() + delta_ns);
    }

    pub fn set(&self, now_ns: u64) {
        self.now_ns.set(now_ns);
    }
}

impl Clock for ManualClock {
    fn now_ns(&self) -> u64 {
        self.now_ns.get()
    }
}
