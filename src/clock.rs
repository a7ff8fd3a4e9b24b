//! Injectable time source.
//!
//! Dismiss-click suppression and timer deadlines read time through [`Clock`]
//! so tests can drive them with [`ManualClock`].

use parking_lot::Mutex;
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Simulated time that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }

    /// Move to `at` if it lies in the future; the clock never goes back.
    pub fn advance_to(&self, at: Instant) {
        let target = at.saturating_duration_since(self.base);
        let mut elapsed = self.elapsed.lock();
        if target > *elapsed {
            *elapsed = target;
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.elapsed.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(40));
        assert_eq!(clock.now() - start, Duration::from_millis(40));
    }

    #[test]
    fn test_manual_clock_never_goes_back() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(50));
        clock.advance_to(start + Duration::from_millis(10));
        assert_eq!(clock.elapsed(), Duration::from_millis(50));
    }
}
