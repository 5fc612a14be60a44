#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use self::mock::MockClock;

use std::sync::Arc;
use std::time::{Duration, Instant};

/// A trait for getting the current time
pub trait Clock: Send + Sync {
    /// Returns the current instant
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Turns clock readings into the elapsed-milliseconds arguments that every
/// `tick` in the stack expects.
///
/// Sub-millisecond remainders are carried into the next reading rather than
/// lost, so many quick ticks still add up to real time.
pub struct Ticker {
    clock: Arc<dyn Clock>,
    last: Instant,
}

impl Ticker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let last = clock.now();
        Ticker { clock, last }
    }

    /// Whole milliseconds since the previous call (or since creation).
    pub fn elapsed_ms(&mut self) -> u64 {
        let now = self.clock.now();
        let ms = now.saturating_duration_since(self.last).as_millis() as u64;
        self.last += Duration::from_millis(ms);
        ms
    }
}
