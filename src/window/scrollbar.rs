//! Scrollbar position scaling and user actions.
//!
//! Native scrollbars take integers, so real-valued ranges are stored as
//! multiples of [`SCROLLBAR_UNIT`]. Every value crossing the native boundary
//! goes through [`to_native`] or [`from_native`].

use std::collections::VecDeque;

/// Native units per real unit.
pub const SCROLLBAR_UNIT: f64 = 65536.0;

pub fn to_native(value: f64) -> i64 {
    (value * SCROLLBAR_UNIT).round() as i64
}

pub fn from_native(value: i64) -> f64 {
    value as f64 / SCROLLBAR_UNIT
}

/// A scrollbar operation performed by the user (or reported by the toolkit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    /// One real unit towards the start.
    LineUp,
    LineDown,
    /// One page towards the start.
    PageUp,
    PageDown,
    Top,
    Bottom,
    /// Thumb dragged to, or value changed to, this native position.
    Track(i64),
}

/// Scrollbar range in native units.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct ScrollbarState {
    pub min: i64,
    pub max: i64,
    pub page: i64,
    pub visible: bool,
    /// Native writes the toolkit has yet to echo back, oldest first.
    pending_echoes: VecDeque<i64>,
}

impl ScrollbarState {
    /// Record a native write whose echo must not be reported.
    pub fn expect_echo(&mut self, position: i64) {
        self.pending_echoes.push_back(position);
    }

    /// Consume the echo of an earlier write. Echoes queued before the match
    /// were coalesced by the toolkit and are dropped with it.
    pub fn take_echo(&mut self, position: i64) -> bool {
        match self.pending_echoes.iter().position(|&echo| echo == position) {
            Some(index) => {
                self.pending_echoes.drain(..=index);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn pending_echoes(&self) -> usize {
        self.pending_echoes.len()
    }

    /// Clamp a native position into `[min, max - page]`.
    pub fn clamp(&self, position: i64) -> i64 {
        position.min(self.max - self.page).max(self.min)
    }

    /// Position after `action`, starting from `current`.
    pub fn resolve(&self, action: ScrollAction, current: i64) -> i64 {
        let unit = SCROLLBAR_UNIT as i64;
        let target = match action {
            ScrollAction::LineUp => current.saturating_sub(unit),
            ScrollAction::LineDown => current.saturating_add(unit),
            ScrollAction::PageUp => current.saturating_sub(self.page),
            ScrollAction::PageDown => current.saturating_add(self.page),
            ScrollAction::Top => self.min,
            ScrollAction::Bottom => self.max - self.page,
            ScrollAction::Track(position) => position,
        };
        self.clamp(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(min: f64, max: f64, page: f64) -> ScrollbarState {
        ScrollbarState {
            min: to_native(min),
            max: to_native(max),
            page: to_native(page),
            visible: true,
            ..ScrollbarState::default()
        }
    }

    #[test]
    fn test_scaling_is_exact_for_binary_fractions() {
        assert_eq!(to_native(1.0), 65536);
        assert_eq!(from_native(to_native(12.25)), 12.25);
        assert_eq!(from_native(to_native(-3.5)), -3.5);
    }

    #[test]
    fn test_clamp() {
        let bar = state(0.0, 100.0, 10.0);
        assert_eq!(bar.clamp(to_native(95.0)), to_native(90.0));
        assert_eq!(bar.clamp(to_native(-5.0)), 0);
        assert_eq!(bar.clamp(to_native(42.0)), to_native(42.0));
    }

    #[test]
    fn test_page_larger_than_range_clamps_to_min() {
        let bar = state(5.0, 10.0, 20.0);
        assert_eq!(bar.clamp(to_native(7.0)), to_native(5.0));
    }

    #[test]
    fn test_resolve_actions() {
        let bar = state(0.0, 100.0, 10.0);
        let current = to_native(50.0);
        assert_eq!(bar.resolve(ScrollAction::LineUp, current), to_native(49.0));
        assert_eq!(bar.resolve(ScrollAction::LineDown, current), to_native(51.0));
        assert_eq!(bar.resolve(ScrollAction::PageUp, current), to_native(40.0));
        assert_eq!(bar.resolve(ScrollAction::PageDown, current), to_native(60.0));
        assert_eq!(bar.resolve(ScrollAction::Top, current), 0);
        assert_eq!(bar.resolve(ScrollAction::Bottom, current), to_native(90.0));
        assert_eq!(
            bar.resolve(ScrollAction::PageDown, to_native(85.0)),
            to_native(90.0)
        );
        assert_eq!(
            bar.resolve(ScrollAction::Track(to_native(200.0)), current),
            to_native(90.0)
        );
    }

    #[test]
    fn test_echoes_match_in_order() {
        let mut bar = state(0.0, 100.0, 10.0);
        bar.expect_echo(to_native(30.0));
        bar.expect_echo(to_native(60.0));

        assert!(bar.take_echo(to_native(30.0)));
        assert!(!bar.take_echo(to_native(45.0)));
        assert!(bar.take_echo(to_native(60.0)));
        assert_eq!(bar.pending_echoes(), 0);
    }

    #[test]
    fn test_coalesced_echo_drops_older_writes() {
        let mut bar = state(0.0, 100.0, 10.0);
        bar.expect_echo(to_native(10.0));
        bar.expect_echo(to_native(20.0));
        bar.expect_echo(to_native(30.0));

        assert!(bar.take_echo(to_native(20.0)));
        assert_eq!(bar.pending_echoes(), 1);
        assert!(!bar.take_echo(to_native(10.0)));
    }
}
