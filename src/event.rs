//! Normalized input events.
//!
//! These value types are what the application core sees, whatever toolkit
//! produced the underlying input. Translation from native events lives in
//! [`crate::input`].

/// Whether a key went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardEventType {
    Press,
    Release,
}

/// Normalized key identity.
///
/// The payload is tied to the variant: a character key never carries a
/// function index and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A lowercase code point. Delete is `'\x7f'`, Escape `'\x1b'`, Tab
    /// `'\t'`, Enter `'\r'`.
    Character(char),
    /// A function key, 1-based (`F1` is `Function(1)`).
    Function(u8),
}

/// Delete key code point.
pub const DELETE: char = '\x7f';
/// Escape key code point.
pub const ESCAPE: char = '\x1b';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyboardEvent {
    pub kind: KeyboardEventType,
    pub key: Key,
    pub shift_down: bool,
    pub control_down: bool,
}

impl KeyboardEvent {
    /// A key press without modifiers.
    pub fn press(key: Key) -> Self {
        Self {
            kind: KeyboardEventType::Press,
            key,
            shift_down: false,
            control_down: false,
        }
    }

    /// A character key press, for use as an accelerator descriptor.
    pub fn character(chr: char) -> Self {
        Self::press(Key::Character(chr.to_ascii_lowercase()))
    }

    /// A function key press, for use as an accelerator descriptor.
    pub fn function(index: u8) -> Self {
        Self::press(Key::Function(index))
    }

    pub fn with_shift(mut self) -> Self {
        self.shift_down = true;
        self
    }

    pub fn with_control(mut self) -> Self {
        self.control_down = true;
        self
    }

    /// Human readable shortcut text, e.g. `Ctrl+Shift+S` or `F5`.
    ///
    /// Used as the accelerator suffix of menu item labels.
    pub fn accelerator_description(&self) -> String {
        let mut label = String::new();
        if self.control_down {
            label.push_str("Ctrl+");
        }
        if self.shift_down {
            label.push_str("Shift+");
        }

        match self.key {
            Key::Function(index) => label.push_str(&format!("F{}", index)),
            Key::Character('\t') => label.push_str("Tab"),
            Key::Character(' ') => label.push_str("Space"),
            Key::Character(ESCAPE) => label.push_str("Esc"),
            Key::Character(DELETE) => label.push_str("Del"),
            Key::Character(chr) => label.extend(chr.to_uppercase()),
        }
        label
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventType {
    Motion,
    Press,
    DblPress,
    Release,
    ScrollVert,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    None,
    Left,
    Middle,
    Right,
}

/// A normalized pointer event in unscaled window-content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventType,
    pub x: f64,
    pub y: f64,
    pub button: MouseButton,
    pub shift_down: bool,
    pub control_down: bool,
    /// `+1` up, `-1` down; zero unless `kind` is `ScrollVert`.
    pub scroll_delta: i32,
}

impl MouseEvent {
    pub fn new(kind: MouseEventType, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            button: MouseButton::None,
            shift_down: false,
            control_down: false,
            scroll_delta: 0,
        }
    }

    /// Whether this event is a button transition, as opposed to motion,
    /// scrolling or leaving.
    pub fn is_button(&self) -> bool {
        matches!(
            self.kind,
            MouseEventType::Press | MouseEventType::DblPress | MouseEventType::Release
        )
    }
}
