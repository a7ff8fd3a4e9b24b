//! Raw native input and its translation into normalized events.
//!
//! Backends convert whatever their toolkit delivers into [`RawPointerEvent`]
//! and [`RawKeyEvent`]; the functions here apply the same mapping rules for
//! every backend. A `None` result means the input has no normalized
//! representation and is dropped.

use crate::event::{
    DELETE, Key, KeyboardEvent, KeyboardEventType, MouseButton, MouseEvent, MouseEventType,
};
use bitflags::bitflags;

bitflags! {
    /// Modifier keys and held pointer buttons at the time of a native event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NativeModifiers: u32 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
        /// Left button held
        const BUTTON1 = 1 << 8;
        /// Middle button held
        const BUTTON2 = 1 << 9;
        /// Right button held
        const BUTTON3 = 1 << 10;
    }
}

impl NativeModifiers {
    /// Highest priority held button: left, then middle, then right.
    pub fn held_button(self) -> MouseButton {
        if self.contains(Self::BUTTON1) {
            MouseButton::Left
        } else if self.contains(Self::BUTTON2) {
            MouseButton::Middle
        } else if self.contains(Self::BUTTON3) {
            MouseButton::Right
        } else {
            MouseButton::None
        }
    }

    /// Flag for `button` being held.
    pub fn for_button(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::BUTTON1,
            MouseButton::Middle => Self::BUTTON2,
            MouseButton::Right => Self::BUTTON3,
            MouseButton::None => Self::empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPointerKind {
    Motion,
    /// `click_count` is 2 for the second press of a native double click.
    ButtonDown {
        button: MouseButton,
        click_count: u32,
    },
    ButtonUp {
        button: MouseButton,
    },
    /// Positive is away from the user.
    Wheel {
        delta_y: f64,
    },
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerEvent {
    pub kind: RawPointerKind,
    /// Window-content coordinates, unscaled logical pixels.
    pub x: f64,
    pub y: f64,
    /// Pointer position in screen coordinates, when the toolkit reports it.
    pub screen: Option<(f64, f64)>,
    pub modifiers: NativeModifiers,
}

impl RawPointerEvent {
    pub fn new(kind: RawPointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            screen: None,
            modifiers: NativeModifiers::empty(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: NativeModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_screen(mut self, x: f64, y: f64) -> Self {
        self.screen = Some((x, y));
        self
    }

    /// Whether this is a button transition, the class of event the popup
    /// dismissal suppression applies to.
    pub fn is_button(&self) -> bool {
        matches!(
            self.kind,
            RawPointerKind::ButtonDown { .. } | RawPointerKind::ButtonUp { .. }
        )
    }
}

/// Native key identity before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeKey {
    /// Character produced by the key, in any case.
    Character(char),
    /// Function key, 1-based.
    Function(u8),
    Delete,
    Unmapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub kind: KeyboardEventType,
    pub key: NativeKey,
    pub modifiers: NativeModifiers,
}

impl RawKeyEvent {
    pub fn press(key: NativeKey, modifiers: NativeModifiers) -> Self {
        Self {
            kind: KeyboardEventType::Press,
            key,
            modifiers,
        }
    }

    pub fn release(key: NativeKey, modifiers: NativeModifiers) -> Self {
        Self {
            kind: KeyboardEventType::Release,
            key,
            modifiers,
        }
    }
}

/// Map a raw pointer event onto a [`MouseEvent`].
///
/// Dropped: button transitions of unknown buttons and wheel events without
/// vertical movement.
pub fn translate_pointer(raw: &RawPointerEvent) -> Option<MouseEvent> {
    let (kind, button, scroll_delta) = match raw.kind {
        RawPointerKind::Motion => (MouseEventType::Motion, raw.modifiers.held_button(), 0),
        RawPointerKind::ButtonDown {
            button: MouseButton::None,
            ..
        }
        | RawPointerKind::ButtonUp {
            button: MouseButton::None,
        } => return None,
        RawPointerKind::ButtonDown {
            button,
            click_count,
        } => {
            let kind = if click_count == 2 {
                MouseEventType::DblPress
            } else {
                MouseEventType::Press
            };
            (kind, button, 0)
        }
        RawPointerKind::ButtonUp { button } => (MouseEventType::Release, button, 0),
        RawPointerKind::Wheel { delta_y } => {
            let delta = if delta_y > 0.0 {
                1
            } else if delta_y < 0.0 {
                -1
            } else {
                return None;
            };
            (MouseEventType::ScrollVert, raw.modifiers.held_button(), delta)
        }
        RawPointerKind::Leave => (MouseEventType::Leave, MouseButton::None, 0),
    };

    Some(MouseEvent {
        kind,
        x: raw.x,
        y: raw.y,
        button,
        shift_down: raw.modifiers.contains(NativeModifiers::SHIFT),
        control_down: raw.modifiers.contains(NativeModifiers::CONTROL),
        scroll_delta,
    })
}

/// Map a raw key event onto a [`KeyboardEvent`].
///
/// Function keys F1 to F12 become [`Key::Function`]; everything else that
/// produces a printable or control character becomes a lowercase
/// [`Key::Character`]. Shift with `.` yields `'>'` with the shift flag
/// cleared. With `drop_extra_modifiers`, keys pressed with Alt or Super held
/// have no representation.
pub fn translate_key(raw: &RawKeyEvent, drop_extra_modifiers: bool) -> Option<KeyboardEvent> {
    if drop_extra_modifiers
        && raw
            .modifiers
            .intersects(NativeModifiers::ALT | NativeModifiers::SUPER)
    {
        return None;
    }

    let mut shift_down = raw.modifiers.contains(NativeModifiers::SHIFT);
    let control_down = raw.modifiers.contains(NativeModifiers::CONTROL);

    let key = match raw.key {
        NativeKey::Function(index @ 1..=12) => Key::Function(index),
        NativeKey::Function(_) | NativeKey::Unmapped => return None,
        NativeKey::Delete => Key::Character(DELETE),
        NativeKey::Character('\0') => return None,
        NativeKey::Character('>') => {
            shift_down = false;
            Key::Character('>')
        }
        NativeKey::Character('.') if shift_down => {
            shift_down = false;
            Key::Character('>')
        }
        NativeKey::Character(chr) => Key::Character(lowercase(chr)),
    };

    Some(KeyboardEvent {
        kind: raw.kind,
        key,
        shift_down,
        control_down,
    })
}

fn lowercase(chr: char) -> char {
    let mut lower = chr.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => chr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: NativeKey, modifiers: NativeModifiers) -> Option<KeyboardEvent> {
        translate_key(&RawKeyEvent::press(key, modifiers), true)
    }

    #[test]
    fn test_characters_are_lowercased() {
        let event = press(NativeKey::Character('A'), NativeModifiers::SHIFT).unwrap();
        assert_eq!(event.key, Key::Character('a'));
        assert!(event.shift_down);
    }

    #[test]
    fn test_function_keys() {
        let event = press(NativeKey::Function(12), NativeModifiers::CONTROL).unwrap();
        assert_eq!(event.key, Key::Function(12));
        assert!(event.control_down);
        assert_eq!(press(NativeKey::Function(13), NativeModifiers::empty()), None);
        assert_eq!(press(NativeKey::Function(0), NativeModifiers::empty()), None);
    }

    #[test]
    fn test_delete_maps_to_fixed_code_point() {
        let event = press(NativeKey::Delete, NativeModifiers::empty()).unwrap();
        assert_eq!(event.key, Key::Character(DELETE));
    }

    #[test]
    fn test_shift_period_becomes_greater_than() {
        let event = press(NativeKey::Character('.'), NativeModifiers::SHIFT).unwrap();
        assert_eq!(event.key, Key::Character('>'));
        assert!(!event.shift_down);

        let plain = press(NativeKey::Character('.'), NativeModifiers::empty()).unwrap();
        assert_eq!(plain.key, Key::Character('.'));

        let shifted = press(NativeKey::Character('>'), NativeModifiers::SHIFT).unwrap();
        assert_eq!(shifted.key, Key::Character('>'));
        assert!(!shifted.shift_down);
    }

    #[test]
    fn test_unmappable_and_extra_modifiers_are_dropped() {
        assert_eq!(press(NativeKey::Unmapped, NativeModifiers::empty()), None);
        assert_eq!(press(NativeKey::Character('x'), NativeModifiers::ALT), None);
        assert_eq!(press(NativeKey::Character('x'), NativeModifiers::SUPER), None);

        let kept = translate_key(
            &RawKeyEvent::press(NativeKey::Character('x'), NativeModifiers::ALT),
            false,
        );
        assert_eq!(kept.map(|e| e.key), Some(Key::Character('x')));
    }

    #[test]
    fn test_release_kind_is_preserved() {
        let event = translate_key(
            &RawKeyEvent::release(NativeKey::Character('q'), NativeModifiers::empty()),
            true,
        )
        .unwrap();
        assert_eq!(event.kind, KeyboardEventType::Release);
    }

    #[test]
    fn test_motion_reports_held_button_by_priority() {
        let raw = RawPointerEvent::new(RawPointerKind::Motion, 3.0, 4.0)
            .with_modifiers(NativeModifiers::BUTTON3 | NativeModifiers::BUTTON2);
        let event = translate_pointer(&raw).unwrap();
        assert_eq!(event.kind, MouseEventType::Motion);
        assert_eq!(event.button, MouseButton::Middle);
        assert_eq!((event.x, event.y), (3.0, 4.0));
    }

    #[test]
    fn test_double_click_is_single_event() {
        let first = RawPointerEvent::new(
            RawPointerKind::ButtonDown {
                button: MouseButton::Left,
                click_count: 1,
            },
            0.0,
            0.0,
        );
        let second = RawPointerEvent {
            kind: RawPointerKind::ButtonDown {
                button: MouseButton::Left,
                click_count: 2,
            },
            ..first
        };
        assert_eq!(translate_pointer(&first).unwrap().kind, MouseEventType::Press);
        assert_eq!(
            translate_pointer(&second).unwrap().kind,
            MouseEventType::DblPress
        );
    }

    #[test]
    fn test_wheel_direction() {
        let up = RawPointerEvent::new(RawPointerKind::Wheel { delta_y: 2.5 }, 0.0, 0.0)
            .with_modifiers(NativeModifiers::CONTROL);
        let down = RawPointerEvent::new(RawPointerKind::Wheel { delta_y: -0.1 }, 0.0, 0.0);
        let flat = RawPointerEvent::new(RawPointerKind::Wheel { delta_y: 0.0 }, 0.0, 0.0);

        let event = translate_pointer(&up).unwrap();
        assert_eq!(event.kind, MouseEventType::ScrollVert);
        assert_eq!(event.scroll_delta, 1);
        assert!(event.control_down);
        assert_eq!(translate_pointer(&down).unwrap().scroll_delta, -1);
        assert_eq!(translate_pointer(&flat), None);
    }

    #[test]
    fn test_unknown_button_is_dropped() {
        let raw = RawPointerEvent::new(
            RawPointerKind::ButtonUp {
                button: MouseButton::None,
            },
            0.0,
            0.0,
        );
        assert_eq!(translate_pointer(&raw), None);
    }
}
