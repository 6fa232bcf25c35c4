#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Converts wall-clock time into simulation ticks at the session's speed.

use std::time::Duration;

use snake_portal_core::Speed;

const DEFAULT_MAX_CATCH_UP: u32 = 5;

/// Configuration parameters required to construct the pacing system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    max_catch_up: u32,
}

impl Config {
    /// Creates a configuration allowing at most `max_catch_up` ticks per call.
    #[must_use]
    pub const fn new(max_catch_up: u32) -> Self {
        Self { max_catch_up }
    }

    /// Upper bound on ticks released by a single call.
    #[must_use]
    pub const fn max_catch_up(&self) -> u32 {
        self.max_catch_up
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CATCH_UP)
    }
}

/// Pure system that accumulates frame time and releases due ticks.
#[derive(Debug)]
pub struct Pacing {
    max_catch_up: u32,
    accumulator: Duration,
}

impl Pacing {
    /// Creates a new pacing system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            max_catch_up: config.max_catch_up,
            accumulator: Duration::ZERO,
        }
    }

    /// Adds `elapsed` to the accumulator and returns the number of ticks due
    /// at `speed`.
    ///
    /// Time beyond the catch-up bound is discarded so a stalled frame cannot
    /// trigger a burst of moves.
    pub fn handle(&mut self, elapsed: Duration, speed: Speed) -> u32 {
        let interval = speed.tick_interval();
        if interval.is_zero() {
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(elapsed);

        let mut due = 0;
        while self.accumulator >= interval && due < self.max_catch_up {
            self.accumulator -= interval;
            due += 1;
        }

        if self.accumulator >= interval {
            self.accumulator = Duration::ZERO;
        }

        due
    }

    /// Drops any partially accumulated time, used while the simulation is halted.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }

    /// Time accumulated toward the next tick.
    #[must_use]
    pub fn pending(&self) -> Duration {
        self.accumulator
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
