//! Native backend capability traits.
//!
//! A backend supplies one concrete type per primitive (timer, menu, menu bar,
//! window) plus the event source that feeds [`Platform`](crate::Platform).
//! The wrappers in [`crate::timer`], [`crate::menu`] and [`crate::window`]
//! hold the normalization rules and state machines; backends only perform
//! native calls and report what the toolkit did.
//!
//! | Primitive | Trait | Wrapper |
//! |---|---|---|
//! | single-shot deferred callback | [`NativeTimer`] | [`Timer`](crate::Timer) |
//! | popup or submenu | [`NativeMenu`] | [`Menu`](crate::Menu) |
//! | menu bar | [`NativeMenuBar`] | [`MenuBar`](crate::MenuBar) |
//! | top-level or tool window | [`NativeWindow`] | [`Window`](crate::Window) |

pub mod headless;

use crate::clock::{Clock, SystemClock};
use crate::error::NativeResult;
use crate::input::{RawKeyEvent, RawPointerEvent};
use crate::menu::Indicator;
use crate::window::{Cursor, EditorGeometry, FontMetrics, Placement, Rect, ScrollAction, WindowKind};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Identifies a window for event routing. Allocated by the platform.
pub type WindowId = u64;

/// Identifies a menu item in native selection reports. Allocated by the
/// platform and unique for the lifetime of the process.
pub type NativeItemId = u64;

/// How a native window reports and accepts its normal-mode placement, which
/// decides the settings keys used by freeze/thaw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementLayout {
    /// `K_left`, `K_top`, `K_right`, `K_bottom`
    #[default]
    Corners,
    /// `K_left`, `K_top`, `K_width`, `K_height`
    Extent,
}

/// Result of a popup menu presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupOutcome {
    Selected(NativeItemId),
    Dismissed,
}

/// Events a backend delivers to the platform.
pub enum NativeEvent {
    /// Input or state change for one window.
    Window {
        window: WindowId,
        event: WindowEvent,
    },
    /// A menu bar item was activated by the user.
    MenuActivated(NativeItemId),
    /// A deferred callback (timer fire) is due.
    Callback(Box<dyn FnOnce()>),
    /// Nothing to deliver; the loop re-checks its exit condition.
    Wakeup,
}

impl std::fmt::Debug for NativeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NativeEvent::Window { window, event } => f
                .debug_struct("Window")
                .field("window", window)
                .field("event", event)
                .finish(),
            NativeEvent::MenuActivated(id) => f.debug_tuple("MenuActivated").field(id).finish(),
            NativeEvent::Callback(_) => f.write_str("Callback"),
            NativeEvent::Wakeup => f.write_str("Wakeup"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    Pointer(RawPointerEvent),
    Key(RawKeyEvent),
    /// The user operated the native scrollbar, or the toolkit reported a new
    /// value after a programmatic set.
    Scrollbar(ScrollAction),
    /// The toolkit entered or left full screen on its own.
    FullScreenChanged(bool),
    CloseRequested,
    /// The surface needs repainting.
    Render,
}

/// Process-wide backend: factories, display queries and the event source.
pub trait Backend: Sized + 'static {
    type Timer: NativeTimer;
    type Menu: NativeMenu;
    type MenuBar: NativeMenuBar<Menu = Self::Menu>;
    type Window: NativeWindow<MenuBar = Self::MenuBar>;

    fn name(&self) -> &'static str;

    /// Time source matching the native loop's notion of time.
    fn clock(&self) -> Arc<dyn Clock> {
        Arc::new(SystemClock)
    }

    fn create_timer(&self) -> NativeResult<Self::Timer>;

    fn create_menu(&self) -> NativeResult<Self::Menu>;

    fn create_menu_bar(&self) -> NativeResult<Self::MenuBar>;

    /// Whether the toolkit has one application-wide menu bar rather than one
    /// per window.
    fn has_global_menu_bar(&self) -> bool {
        false
    }

    fn create_window(
        &self,
        id: WindowId,
        kind: WindowKind,
        parent: Option<&Self::Window>,
    ) -> NativeResult<Self::Window>;

    fn placement_layout(&self) -> PlacementLayout {
        PlacementLayout::Corners
    }

    /// Visible bounds of every display, in screen coordinates.
    fn displays(&self) -> Vec<Rect>;

    /// The window under a screen position, with the position translated into
    /// that window's content coordinates.
    fn window_under_pointer(&self, screen_x: f64, screen_y: f64) -> Option<(WindowId, f64, f64)>;

    /// Next native event. With `wait`, block until one is available; `None`
    /// means the loop has nothing more to deliver.
    fn next_event(&self, wait: bool) -> Option<NativeEvent>;

    /// Ask the native loop to terminate.
    fn exit(&self);
}

pub trait NativeTimer {
    /// Run `fire` once after `delay`, through the event loop.
    fn schedule(&mut self, delay: Duration, fire: Box<dyn FnOnce()>) -> NativeResult<()>;

    /// Best-effort cancellation of the pending fire, if any.
    fn cancel(&mut self);
}

pub trait NativeMenu {
    fn append_item(&mut self, id: NativeItemId, label: &str) -> NativeResult<()>;

    fn append_submenu(&mut self, label: &str, submenu: &Self) -> NativeResult<()>;

    fn append_separator(&mut self) -> NativeResult<()>;

    fn set_item_label(&mut self, id: NativeItemId, label: &str) -> NativeResult<()>;

    fn set_item_indicator(&mut self, id: NativeItemId, indicator: Indicator) -> NativeResult<()>;

    /// Set the checked state. Must not report an activation.
    fn set_item_checked(&mut self, id: NativeItemId, checked: bool) -> NativeResult<()>;

    fn set_item_enabled(&mut self, id: NativeItemId, enabled: bool) -> NativeResult<()>;

    fn clear(&mut self) -> NativeResult<()>;

    /// Present the menu at the pointer without blocking. The outcome becomes
    /// available through [`NativeMenu::take_popup_outcome`] once the user
    /// selects or dismisses.
    fn show_popup(&mut self) -> NativeResult<()>;

    fn take_popup_outcome(&mut self) -> Option<PopupOutcome>;
}

pub trait NativeMenuBar {
    type Menu: NativeMenu;

    fn append_menu(&mut self, label: &str, menu: &Self::Menu) -> NativeResult<()>;

    fn clear(&mut self) -> NativeResult<()>;
}

pub trait NativeWindow {
    type MenuBar: NativeMenuBar;

    /// Device dots per inch of the display showing the window.
    fn pixel_density(&self) -> f64;

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool) -> NativeResult<()>;

    /// Normal-mode placement in screen coordinates.
    fn placement(&self) -> Placement;

    fn set_placement(&mut self, placement: &Placement) -> NativeResult<()>;

    fn set_full_screen(&mut self, full_screen: bool) -> NativeResult<()>;

    fn set_title(&mut self, title: &str) -> NativeResult<()>;

    /// Show `path` as the window's document. Returns false when the toolkit
    /// has no notion of a represented file.
    fn set_title_for_filename(&mut self, _path: &Path) -> NativeResult<bool> {
        Ok(false)
    }

    fn set_menu_bar(&mut self, menu_bar: Option<&Self::MenuBar>) -> NativeResult<()>;

    /// Content area size in logical pixels.
    fn content_size(&self) -> (f64, f64);

    fn set_min_content_size(&mut self, width: f64, height: f64) -> NativeResult<()>;

    fn set_cursor(&mut self, cursor: Cursor) -> NativeResult<()>;

    /// `None` removes the tooltip.
    fn set_tooltip(&mut self, text: Option<&str>) -> NativeResult<()>;

    fn font_metrics(&self, font_height: f64, monospace: bool) -> FontMetrics;

    fn measure_text(&self, text: &str, font_height: f64, monospace: bool) -> f64;

    /// Show the single-line editor. With `select_all` the text is selected
    /// and the editor takes focus.
    fn show_editor(
        &mut self,
        geometry: &EditorGeometry,
        font_height: f64,
        monospace: bool,
        text: &str,
        select_all: bool,
    ) -> NativeResult<()>;

    fn hide_editor(&mut self) -> NativeResult<()>;

    fn editor_text(&self) -> String;

    /// Integer range and page size of the scrollbar.
    fn configure_scrollbar(&mut self, min: i64, max: i64, page: i64) -> NativeResult<()>;

    fn set_scrollbar_visible(&mut self, visible: bool) -> NativeResult<()>;

    fn set_scrollbar_position(&mut self, position: i64) -> NativeResult<()>;

    fn scrollbar_position(&self) -> i64;

    /// Whether a programmatic position change is reported back as a
    /// [`WindowEvent::Scrollbar`] event.
    fn scrollbar_echoes_sets(&self) -> bool {
        false
    }

    /// Request a [`WindowEvent::Render`].
    fn invalidate(&mut self) -> NativeResult<()>;

    /// Release native resources. Called once.
    fn destroy(&mut self) {}
}
