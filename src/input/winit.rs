//! Conversions from winit input types into raw platform events.
//!
//! winit reports neither held buttons with motion events nor double clicks,
//! so a backend built on it tracks pressed buttons itself (see
//! [`NativeModifiers::for_button`]) and counts clicks with [`ClickTracker`].

use super::translate::{NativeKey, NativeModifiers, RawKeyEvent, RawPointerKind};
use crate::event::{KeyboardEventType, MouseButton};
use std::time::{Duration, Instant};
use uniplat_config::PlatformConfig;
use ::winit::event::{ElementState, KeyEvent, MouseScrollDelta};
use ::winit::keyboard::{Key, ModifiersState, NamedKey};

/// Modifier keys from winit's modifier state.
pub fn modifiers(state: ModifiersState) -> NativeModifiers {
    let mut mods = NativeModifiers::empty();
    mods.set(NativeModifiers::SHIFT, state.shift_key());
    mods.set(NativeModifiers::CONTROL, state.control_key());
    mods.set(NativeModifiers::ALT, state.alt_key());
    mods.set(NativeModifiers::SUPER, state.super_key());
    mods
}

pub fn mouse_button(button: ::winit::event::MouseButton) -> MouseButton {
    match button {
        ::winit::event::MouseButton::Left => MouseButton::Left,
        ::winit::event::MouseButton::Middle => MouseButton::Middle,
        ::winit::event::MouseButton::Right => MouseButton::Right,
        _ => MouseButton::None,
    }
}

/// Raw pointer kind for a winit button transition.
///
/// `click_count` comes from a [`ClickTracker`] and is ignored on release.
pub fn button_kind(
    state: ElementState,
    button: ::winit::event::MouseButton,
    click_count: u32,
) -> RawPointerKind {
    let button = mouse_button(button);
    match state {
        ElementState::Pressed => RawPointerKind::ButtonDown {
            button,
            click_count,
        },
        ElementState::Released => RawPointerKind::ButtonUp { button },
    }
}

/// Vertical wheel movement; positive is away from the user.
pub fn wheel_delta(delta: MouseScrollDelta) -> f64 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => f64::from(y),
        MouseScrollDelta::PixelDelta(position) => position.y,
    }
}

pub fn native_key(key: &Key) -> NativeKey {
    match key {
        Key::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(chr), None) => NativeKey::Character(chr),
                _ => NativeKey::Unmapped,
            }
        }
        Key::Named(named) => named_key(*named),
        _ => NativeKey::Unmapped,
    }
}

fn named_key(named: NamedKey) -> NativeKey {
    match named {
        NamedKey::Escape => NativeKey::Character('\x1b'),
        NamedKey::Tab => NativeKey::Character('\t'),
        NamedKey::Enter => NativeKey::Character('\r'),
        NamedKey::Backspace => NativeKey::Character('\x08'),
        NamedKey::Space => NativeKey::Character(' '),
        NamedKey::Delete => NativeKey::Delete,
        NamedKey::F1 => NativeKey::Function(1),
        NamedKey::F2 => NativeKey::Function(2),
        NamedKey::F3 => NativeKey::Function(3),
        NamedKey::F4 => NativeKey::Function(4),
        NamedKey::F5 => NativeKey::Function(5),
        NamedKey::F6 => NativeKey::Function(6),
        NamedKey::F7 => NativeKey::Function(7),
        NamedKey::F8 => NativeKey::Function(8),
        NamedKey::F9 => NativeKey::Function(9),
        NamedKey::F10 => NativeKey::Function(10),
        NamedKey::F11 => NativeKey::Function(11),
        NamedKey::F12 => NativeKey::Function(12),
        _ => NativeKey::Unmapped,
    }
}

/// Raw key event for a winit key event under the given modifier state.
pub fn key_event(event: &KeyEvent, state: ModifiersState) -> RawKeyEvent {
    let kind = match event.state {
        ElementState::Pressed => KeyboardEventType::Press,
        ElementState::Released => KeyboardEventType::Release,
    };
    RawKeyEvent {
        kind,
        key: native_key(&event.logical_key),
        modifiers: modifiers(state),
    }
}

/// Counts sequential presses of the same button to detect double clicks.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    interval: Duration,
    slop: f64,
    last: Option<LastClick>,
}

#[derive(Debug, Clone, Copy)]
struct LastClick {
    button: MouseButton,
    at: Instant,
    x: f64,
    y: f64,
    count: u32,
}

impl ClickTracker {
    pub fn new(interval: Duration, slop: f64) -> Self {
        Self {
            interval,
            slop,
            last: None,
        }
    }

    pub fn from_config(config: &PlatformConfig) -> Self {
        Self::new(config.double_click_interval(), config.double_click_slop)
    }

    /// Register a press and return its click count: 2 for the second press
    /// of a double click, 1 otherwise.
    pub fn press(&mut self, button: MouseButton, at: Instant, x: f64, y: f64) -> u32 {
        let count = match self.last {
            Some(last)
                if last.button == button
                    && last.count == 1
                    && at.saturating_duration_since(last.at) < self.interval
                    && (x - last.x).abs() <= self.slop
                    && (y - last.y).abs() <= self.slop =>
            {
                2
            }
            _ => 1,
        };
        self.last = Some(LastClick {
            button,
            at,
            x,
            y,
            count,
        });
        count
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers() {
        let mods = modifiers(ModifiersState::SHIFT | ModifiersState::CONTROL);
        assert_eq!(mods, NativeModifiers::SHIFT | NativeModifiers::CONTROL);
        assert!(modifiers(ModifiersState::ALT).contains(NativeModifiers::ALT));
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(
            native_key(&Key::Named(NamedKey::F3)),
            NativeKey::Function(3)
        );
        assert_eq!(native_key(&Key::Named(NamedKey::Delete)), NativeKey::Delete);
        assert_eq!(
            native_key(&Key::Named(NamedKey::Escape)),
            NativeKey::Character('\x1b')
        );
        assert_eq!(native_key(&Key::Named(NamedKey::F20)), NativeKey::Unmapped);
    }

    #[test]
    fn test_character_keys() {
        assert_eq!(
            native_key(&Key::Character("Q".into())),
            NativeKey::Character('Q')
        );
        assert_eq!(native_key(&Key::Character("ab".into())), NativeKey::Unmapped);
    }

    #[test]
    fn test_wheel_delta() {
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(0.0, -1.0)), -1.0);
    }

    #[test]
    fn test_click_tracker_double_click() {
        let mut tracker = ClickTracker::new(Duration::from_millis(500), 4.0);
        let start = Instant::now();

        assert_eq!(tracker.press(MouseButton::Left, start, 10.0, 10.0), 1);
        assert_eq!(
            tracker.press(
                MouseButton::Left,
                start + Duration::from_millis(200),
                11.0,
                9.0
            ),
            2
        );
        // A third press starts a new sequence
        assert_eq!(
            tracker.press(
                MouseButton::Left,
                start + Duration::from_millis(300),
                11.0,
                9.0
            ),
            1
        );
    }

    #[test]
    fn test_click_tracker_rejects_slow_or_distant_presses() {
        let mut tracker = ClickTracker::new(Duration::from_millis(500), 4.0);
        let start = Instant::now();

        tracker.press(MouseButton::Left, start, 0.0, 0.0);
        assert_eq!(
            tracker.press(MouseButton::Left, start + Duration::from_millis(600), 0.0, 0.0),
            1
        );
        assert_eq!(
            tracker.press(MouseButton::Left, start + Duration::from_millis(700), 20.0, 0.0),
            1
        );
        assert_eq!(
            tracker.press(MouseButton::Right, start + Duration::from_millis(750), 20.0, 0.0),
            1
        );
    }
}
