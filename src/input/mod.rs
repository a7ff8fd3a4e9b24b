//! Input normalization.
//!
//! - [`translate`]: backend-neutral raw events and the rules mapping them onto
//!   [`KeyboardEvent`](crate::event::KeyboardEvent) and
//!   [`MouseEvent`](crate::event::MouseEvent)
//! - [`winit`](mod@self::winit): conversions from winit types into raw events
//! - [`InputCoordinator`]: the process-wide dismiss-click suppression state

pub mod translate;
#[cfg(feature = "winit")]
pub mod winit;

pub use translate::{
    NativeKey, NativeModifiers, RawKeyEvent, RawPointerEvent, RawPointerKind, translate_key,
    translate_pointer,
};

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Shared record of the most recent popup menu dismissal without selection.
///
/// Every window consults it before translating a pointer button event: the
/// click that closed a popup must not also reach whatever lies underneath.
#[derive(Debug)]
pub struct InputCoordinator {
    suppression: Duration,
    last_dismissal: Mutex<Option<Instant>>,
}

impl InputCoordinator {
    pub fn new(suppression: Duration) -> Self {
        Self {
            suppression,
            last_dismissal: Mutex::new(None),
        }
    }

    pub fn suppression(&self) -> Duration {
        self.suppression
    }

    /// Record that a popup menu closed without a selection at `now`.
    pub fn record_dismissal(&self, now: Instant) {
        *self.last_dismissal.lock() = Some(now);
    }

    /// Whether a pointer button event arriving at `now` must be swallowed.
    pub fn should_suppress(&self, now: Instant) -> bool {
        match *self.last_dismissal.lock() {
            Some(at) => now.saturating_duration_since(at) < self.suppression,
            None => false,
        }
    }

    pub fn last_dismissal(&self) -> Option<Instant> {
        *self.last_dismissal.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_dismissal_no_suppression() {
        let coordinator = InputCoordinator::new(Duration::from_millis(100));
        assert!(!coordinator.should_suppress(Instant::now()));
    }

    #[test]
    fn test_suppression_window() {
        let coordinator = InputCoordinator::new(Duration::from_millis(100));
        let at = Instant::now();
        coordinator.record_dismissal(at);

        assert!(coordinator.should_suppress(at));
        assert!(coordinator.should_suppress(at + Duration::from_millis(99)));
        assert!(!coordinator.should_suppress(at + Duration::from_millis(100)));
        assert!(!coordinator.should_suppress(at + Duration::from_millis(250)));
    }
}
