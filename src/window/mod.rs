//! Windows: the state machine the application drives and the event
//! normalization applied to everything the backend reports.
//!
//! Three state axes are independent of each other:
//!
//! | Axis | States | Entry points |
//! |---|---|---|
//! | visibility | hidden, visible | [`Window::set_visible`] |
//! | placement | normal, full screen | [`Window::set_full_screen`], [`Window::freeze_position`], [`Window::thaw_position`] |
//! | editor overlay | hidden, editing | [`Window::show_editor`], [`Window::hide_editor`] |
//!
//! Submodules:
//! - [`editor`]: overlay geometry
//! - [`placement`]: rectangles, display clamping, freeze/thaw keys
//! - [`scale`]: scale factors from pixel density
//! - [`scrollbar`]: fixed-point scrollbar scaling and user actions

pub mod editor;
pub mod placement;
pub mod scale;
pub mod scrollbar;

pub use editor::{EditorGeometry, FontMetrics};
pub use placement::{Placement, Rect};
pub use scrollbar::{SCROLLBAR_UNIT, ScrollAction};

use crate::backend::{Backend, NativeWindow, WindowEvent, WindowId};
use crate::callback::Slot;
use crate::event::{ESCAPE, Key, KeyboardEvent, KeyboardEventType, MouseEvent};
use crate::input::{RawKeyEvent, RawPointerEvent, translate_key, translate_pointer};
use crate::menu::MenuBar;
use crate::native_check;
use crate::platform::Platform;
use scrollbar::ScrollbarState;
use std::cell::{Ref, RefCell};
use std::path::Path;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    TopLevel,
    /// Stays above its parent; unhandled keys go to the parent.
    Tool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    #[default]
    Pointer,
    Hand,
}

struct WindowState<B: Backend> {
    full_screen: bool,
    /// Normal-mode placement saved on entering full screen.
    restore: Option<Placement>,
    menu_bar: Option<MenuBar<B>>,
    editor: Option<EditorGeometry>,
    /// Key that closed the editor; its release belongs to the editor.
    editor_closing_key: Option<Key>,
    scrollbar: ScrollbarState,
    render_pending: bool,
    destroyed: bool,
}

impl<B: Backend> Default for WindowState<B> {
    fn default() -> Self {
        Self {
            full_screen: false,
            restore: None,
            menu_bar: None,
            editor: None,
            editor_closing_key: None,
            scrollbar: ScrollbarState::default(),
            render_pending: false,
            destroyed: false,
        }
    }
}

#[derive(Default)]
struct Callbacks {
    on_close: Slot<dyn FnMut()>,
    on_full_screen: Slot<dyn FnMut(bool)>,
    on_mouse_event: Slot<dyn FnMut(MouseEvent) -> bool>,
    on_keyboard_event: Slot<dyn FnMut(KeyboardEvent) -> bool>,
    on_editing_done: Slot<dyn FnMut(&str)>,
    on_scrollbar_adjusted: Slot<dyn FnMut(f64)>,
    on_render: Slot<dyn FnMut()>,
}

impl Callbacks {
    fn clear(&self) {
        self.on_close.clear();
        self.on_full_screen.clear();
        self.on_mouse_event.clear();
        self.on_keyboard_event.clear();
        self.on_editing_done.clear();
        self.on_scrollbar_adjusted.clear();
        self.on_render.clear();
    }
}

pub(crate) struct WindowInner<B: Backend> {
    id: WindowId,
    kind: WindowKind,
    parent: Option<Weak<WindowInner<B>>>,
    platform: Platform<B>,
    native: RefCell<B::Window>,
    state: RefCell<WindowState<B>>,
    callbacks: Callbacks,
}

impl<B: Backend> Drop for WindowInner<B> {
    fn drop(&mut self) {
        if !self.state.get_mut().destroyed {
            self.native.get_mut().destroy();
        }
    }
}

/// Handle to a native window. Clones refer to the same window.
pub struct Window<B: Backend> {
    inner: Rc<WindowInner<B>>,
}

impl<B: Backend> Clone for Window<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<B: Backend> Window<B> {
    pub(crate) fn new(
        platform: Platform<B>,
        id: WindowId,
        kind: WindowKind,
        parent: Option<&Window<B>>,
        native: B::Window,
    ) -> Self {
        Self {
            inner: Rc::new(WindowInner {
                id,
                kind,
                parent: parent.map(|parent| Rc::downgrade(&parent.inner)),
                platform,
                native: RefCell::new(native),
                state: RefCell::new(WindowState::default()),
                callbacks: Callbacks::default(),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<WindowInner<B>> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn from_inner(inner: Rc<WindowInner<B>>) -> Self {
        Self { inner }
    }

    pub fn id(&self) -> WindowId {
        self.inner.id
    }

    pub fn kind(&self) -> WindowKind {
        self.inner.kind
    }

    /// The parent window, while it is alive.
    pub fn parent(&self) -> Option<Window<B>> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Window::from_inner)
    }

    pub fn native(&self) -> Ref<'_, B::Window> {
        self.inner.native.borrow()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.state.borrow().destroyed
    }

    // ---- callbacks ----

    pub fn on_close(&self, callback: impl FnMut() + 'static) {
        self.inner.callbacks.on_close.set(Box::new(callback));
    }

    pub fn on_full_screen(&self, callback: impl FnMut(bool) + 'static) {
        self.inner.callbacks.on_full_screen.set(Box::new(callback));
    }

    /// Install the pointer handler. Returning false marks the event unhandled.
    pub fn on_mouse_event(&self, callback: impl FnMut(MouseEvent) -> bool + 'static) {
        self.inner.callbacks.on_mouse_event.set(Box::new(callback));
    }

    /// Install the key handler. Returning false marks the event unhandled,
    /// which forwards it to the parent of a tool window.
    pub fn on_keyboard_event(&self, callback: impl FnMut(KeyboardEvent) -> bool + 'static) {
        self.inner.callbacks.on_keyboard_event.set(Box::new(callback));
    }

    pub fn on_editing_done(&self, callback: impl FnMut(&str) + 'static) {
        self.inner.callbacks.on_editing_done.set(Box::new(callback));
    }

    pub fn on_scrollbar_adjusted(&self, callback: impl FnMut(f64) + 'static) {
        self.inner
            .callbacks
            .on_scrollbar_adjusted
            .set(Box::new(callback));
    }

    pub fn on_render(&self, callback: impl FnMut() + 'static) {
        self.inner.callbacks.on_render.set(Box::new(callback));
    }

    // ---- scale ----

    /// Raw device dots per inch.
    pub fn pixel_density(&self) -> f64 {
        self.inner.native.borrow().pixel_density()
    }

    /// Density relative to the reference density, unrounded.
    pub fn fractional_scale_factor(&self) -> f64 {
        scale::fractional(
            self.pixel_density(),
            self.inner.platform.config().reference_dpi,
        )
    }

    /// Density relative to the reference density, floored, at least 1.
    pub fn integral_scale_factor(&self) -> i32 {
        scale::integral(
            self.pixel_density(),
            self.inner.platform.config().reference_dpi,
        )
    }

    // ---- visibility and placement ----

    pub fn is_visible(&self) -> bool {
        self.inner.native.borrow().is_visible()
    }

    pub fn set_visible(&self, visible: bool) {
        native_check!(self.inner.native.borrow_mut().set_visible(visible));
    }

    pub fn is_full_screen(&self) -> bool {
        self.inner.state.borrow().full_screen
    }

    /// Enter or leave full screen. Entering saves the normal placement;
    /// leaving restores exactly that placement.
    pub fn set_full_screen(&self, full_screen: bool) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.full_screen == full_screen {
                return;
            }
            let mut native = self.inner.native.borrow_mut();
            if full_screen {
                state.restore = Some(native.placement());
                native_check!(native.set_full_screen(true));
            } else {
                native_check!(native.set_full_screen(false));
                if let Some(restore) = state.restore.take() {
                    native_check!(native.set_placement(&restore));
                }
            }
            state.full_screen = full_screen;
        }
        crate::debug_info!(
            "WINDOW",
            "Window {} full screen: {}",
            self.inner.id,
            full_screen
        );
        self.notify_full_screen(full_screen);
    }

    /// The toolkit changed full-screen state on its own.
    fn handle_full_screen_changed(&self, full_screen: bool) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.full_screen == full_screen {
                return;
            }
            state.full_screen = full_screen;
            if !full_screen && let Some(restore) = state.restore.take() {
                native_check!(self.inner.native.borrow_mut().set_placement(&restore));
            }
        }
        self.notify_full_screen(full_screen);
    }

    fn notify_full_screen(&self, full_screen: bool) {
        self.inner
            .callbacks
            .on_full_screen
            .with(|callback| callback(full_screen));
    }

    /// Placement outside full screen: the saved snapshot while full screen.
    pub fn normal_placement(&self) -> Placement {
        let state = self.inner.state.borrow();
        match (state.full_screen, state.restore) {
            (true, Some(restore)) => restore,
            _ => self.inner.native.borrow().placement(),
        }
    }

    /// Persist the normal-mode placement under `key`.
    pub fn freeze_position(&self, key: &str) {
        let placement = self.normal_placement();
        let platform = &self.inner.platform;
        placement::freeze(
            platform.settings().as_ref(),
            key,
            &placement,
            platform.backend().placement_layout(),
        );
        crate::debug_log!("WINDOW", "Froze '{}' as {:?}", key, placement);
    }

    /// Restore the placement stored under `key`, clamped to the display
    /// nearest to it. While full screen the restore snapshot is updated
    /// instead.
    pub fn thaw_position(&self, key: &str) {
        let platform = &self.inner.platform;
        let current = self.normal_placement();
        let stored = placement::thaw(
            platform.settings().as_ref(),
            key,
            &current,
            platform.backend().placement_layout(),
        );
        let clamped = placement::clamp_to_displays(&stored, &platform.backend().displays());
        if clamped != stored {
            crate::debug_log!(
                "WINDOW",
                "Thawed '{}' clamped from {:?} to {:?}",
                key,
                stored.rect,
                clamped.rect
            );
        }

        let mut state = self.inner.state.borrow_mut();
        if state.full_screen {
            state.restore = Some(clamped);
        } else {
            native_check!(self.inner.native.borrow_mut().set_placement(&clamped));
        }
    }

    // ---- decorations ----

    pub fn set_title(&self, title: &str) {
        native_check!(self.inner.native.borrow_mut().set_title(title));
    }

    /// Show `path` as the window's document. Returns false when the backend
    /// cannot represent files, in which case the caller sets a title itself.
    pub fn set_title_for_filename(&self, path: &Path) -> bool {
        native_check!(self.inner.native.borrow_mut().set_title_for_filename(path))
    }

    /// Attach a menu bar, or detach with `None`.
    pub fn set_menu_bar(&self, menu_bar: Option<&MenuBar<B>>) {
        {
            let native_bar = menu_bar.map(|bar| bar.inner.native.borrow());
            native_check!(
                self.inner
                    .native
                    .borrow_mut()
                    .set_menu_bar(native_bar.as_deref())
            );
        }
        self.inner.state.borrow_mut().menu_bar = menu_bar.cloned();
    }

    pub fn menu_bar(&self) -> Option<MenuBar<B>> {
        self.inner.state.borrow().menu_bar.clone()
    }

    pub fn content_size(&self) -> (f64, f64) {
        self.inner.native.borrow().content_size()
    }

    pub fn set_min_content_size(&self, width: f64, height: f64) {
        native_check!(
            self.inner
                .native
                .borrow_mut()
                .set_min_content_size(width, height)
        );
    }

    pub fn set_cursor(&self, cursor: Cursor) {
        native_check!(self.inner.native.borrow_mut().set_cursor(cursor));
    }

    /// Set the tooltip; empty text removes it.
    pub fn set_tooltip(&self, text: &str) {
        let text = (!text.is_empty()).then_some(text);
        native_check!(self.inner.native.borrow_mut().set_tooltip(text));
    }

    // ---- editor overlay ----

    pub fn is_editor_visible(&self) -> bool {
        self.inner.state.borrow().editor.is_some()
    }

    pub fn editor_geometry(&self) -> Option<EditorGeometry> {
        self.inner.state.borrow().editor
    }

    /// Show the inline editor over the text baseline at (`x`, `y`),
    /// pre-filled with `text`. Does nothing while already editing.
    pub fn show_editor(
        &self,
        x: f64,
        y: f64,
        font_height: f64,
        min_width: f64,
        is_monospace: bool,
        text: &str,
    ) {
        let mut state = self.inner.state.borrow_mut();
        if state.editor.is_some() {
            return;
        }

        let mut native = self.inner.native.borrow_mut();
        let metrics = native.font_metrics(font_height, is_monospace);
        let text_width = native.measure_text(text, font_height, is_monospace);
        let geometry = EditorGeometry::for_baseline(x, y, min_width, &metrics, text_width);
        native_check!(native.show_editor(
            &geometry,
            font_height,
            is_monospace,
            text,
            !text.is_empty()
        ));
        state.editor = Some(geometry);
        crate::debug_log!("EDITOR", "Shown at {:?}", geometry);
    }

    /// Hide the inline editor without reporting its text.
    pub fn hide_editor(&self) {
        let mut state = self.inner.state.borrow_mut();
        if state.editor.take().is_none() {
            return;
        }
        native_check!(self.inner.native.borrow_mut().hide_editor());
        crate::debug_log!("EDITOR", "Hidden");
    }

    /// Report the editor's text, then hide it.
    fn commit_editor(&self) {
        let text = self.inner.native.borrow().editor_text();
        crate::debug_log!("EDITOR", "Committed {:?}", text);
        self.inner
            .callbacks
            .on_editing_done
            .with(|callback| callback(&text));
        self.hide_editor();
    }

    // ---- scrollbar ----

    /// Set the real-valued range and page size of the scrollbar.
    pub fn configure_scrollbar(&self, min: f64, max: f64, page_size: f64) {
        let mut state = self.inner.state.borrow_mut();
        state.scrollbar.min = scrollbar::to_native(min);
        state.scrollbar.max = scrollbar::to_native(max);
        state.scrollbar.page = scrollbar::to_native(page_size);
        native_check!(self.inner.native.borrow_mut().configure_scrollbar(
            state.scrollbar.min,
            state.scrollbar.max,
            state.scrollbar.page
        ));
    }

    pub fn set_scrollbar_visible(&self, visible: bool) {
        self.inner.state.borrow_mut().scrollbar.visible = visible;
        native_check!(self.inner.native.borrow_mut().set_scrollbar_visible(visible));
    }

    pub fn is_scrollbar_visible(&self) -> bool {
        self.inner.state.borrow().scrollbar.visible
    }

    /// Current position, or 0 while the scrollbar is hidden.
    pub fn scrollbar_position(&self) -> f64 {
        if !self.inner.state.borrow().scrollbar.visible {
            return 0.0;
        }
        scrollbar::from_native(self.inner.native.borrow().scrollbar_position())
    }

    /// Move to `position`, clamped to `[min, max - page_size]`, and report
    /// the clamped value through `on_scrollbar_adjusted`, even when it did
    /// not change.
    pub fn set_scrollbar_position(&self, position: f64) {
        let clamped = {
            let mut state = self.inner.state.borrow_mut();
            let clamped = state.scrollbar.clamp(scrollbar::to_native(position));
            self.write_scrollbar(&mut state.scrollbar, clamped);
            clamped
        };
        self.notify_scrollbar(clamped);
    }

    /// Apply a native position, remembering the echo a toolkit that reports
    /// programmatic changes will send for it.
    fn write_scrollbar(&self, scrollbar: &mut ScrollbarState, position: i64) {
        let mut native = self.inner.native.borrow_mut();
        if native.scrollbar_position() == position {
            // Unchanged values produce no echo and need no write
            return;
        }
        if native.scrollbar_echoes_sets() {
            scrollbar.expect_echo(position);
        }
        native_check!(native.set_scrollbar_position(position));
    }

    fn handle_scrollbar(&self, action: ScrollAction) {
        let position = {
            let mut state = self.inner.state.borrow_mut();
            if let ScrollAction::Track(position) = action
                && state.scrollbar.take_echo(position)
            {
                crate::debug_trace!("SCROLL", "Echo of native write ignored");
                return;
            }

            let current = self.inner.native.borrow().scrollbar_position();
            let position = state.scrollbar.resolve(action, current);
            self.write_scrollbar(&mut state.scrollbar, position);
            position
        };
        self.notify_scrollbar(position);
    }

    fn notify_scrollbar(&self, native_position: i64) {
        let position = scrollbar::from_native(native_position);
        self.inner
            .callbacks
            .on_scrollbar_adjusted
            .with(|callback| callback(position));
    }

    // ---- rendering ----

    /// Request a render. Requests coalesce until the render happens.
    pub fn invalidate(&self) {
        let mut state = self.inner.state.borrow_mut();
        if state.render_pending {
            return;
        }
        state.render_pending = true;
        native_check!(self.inner.native.borrow_mut().invalidate());
    }

    /// Request a render and service pending events, rendering now if the
    /// backend has the render ready.
    pub fn redraw(&self) {
        self.invalidate();
        self.inner.platform.run_until_idle();
    }

    fn handle_render(&self) {
        self.inner.state.borrow_mut().render_pending = false;
        self.inner.callbacks.on_render.with(|callback| callback());
    }

    // ---- lifecycle ----

    /// Tear the window down: the editor is hidden, the menu bar released,
    /// callbacks dropped and the native window destroyed. Later events for
    /// this window are ignored.
    pub fn destroy(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.editor = None;
            state.menu_bar = None;
        }
        self.inner.callbacks.clear();
        self.inner.platform.unregister_window(self.inner.id);
        self.inner.native.borrow_mut().destroy();
        crate::debug_info!("WINDOW", "Window {} destroyed", self.inner.id);
    }

    // ---- event handling ----

    pub(crate) fn handle_event(&self, event: WindowEvent) {
        if self.is_destroyed() {
            return;
        }
        match event {
            WindowEvent::Pointer(raw) => self.handle_pointer(&raw),
            WindowEvent::Key(raw) => self.handle_key(&raw),
            WindowEvent::Scrollbar(action) => self.handle_scrollbar(action),
            WindowEvent::FullScreenChanged(full_screen) => {
                self.handle_full_screen_changed(full_screen)
            }
            WindowEvent::CloseRequested => {
                crate::debug_info!("WINDOW", "Close requested for window {}", self.inner.id);
                self.inner.callbacks.on_close.with(|callback| callback());
            }
            WindowEvent::Render => self.handle_render(),
        }
    }

    fn handle_pointer(&self, raw: &RawPointerEvent) {
        let platform = &self.inner.platform;
        if raw.is_button() && platform.input().should_suppress(platform.now()) {
            crate::debug_log!(
                "INPUT",
                "Button event {:?} swallowed after popup dismissal",
                raw.kind
            );
            return;
        }

        let Some(event) = translate_pointer(raw) else {
            crate::debug_trace!("INPUT", "Pointer event {:?} dropped", raw.kind);
            return;
        };
        self.dispatch_mouse(event);
    }

    /// Deliver a normalized pointer event. Returns whether it was handled.
    pub fn dispatch_mouse(&self, event: MouseEvent) -> bool {
        self.inner
            .callbacks
            .on_mouse_event
            .with(|callback| callback(event))
            .unwrap_or(false)
    }

    fn handle_key(&self, raw: &RawKeyEvent) {
        let drop_extra = self
            .inner
            .platform
            .config()
            .drop_keys_with_extra_modifiers;
        let Some(event) = translate_key(raw, drop_extra) else {
            crate::debug_trace!("INPUT", "Key {:?} dropped", raw.key);
            return;
        };

        if self.is_editor_visible() {
            self.handle_editor_key(&event);
            return;
        }
        {
            let mut state = self.inner.state.borrow_mut();
            if state.editor_closing_key == Some(event.key) {
                state.editor_closing_key = None;
                if event.kind == KeyboardEventType::Release {
                    crate::debug_trace!("EDITOR", "Release of closing key consumed");
                    return;
                }
            }
        }
        self.dispatch_key(event);
    }

    /// Enter commits, Escape cancels; the native editor consumes the rest.
    fn handle_editor_key(&self, event: &KeyboardEvent) {
        if event.kind != KeyboardEventType::Press {
            return;
        }
        match event.key {
            Key::Character(ESCAPE) => self.hide_editor(),
            Key::Character('\r' | '\n') => self.commit_editor(),
            _ => return,
        }
        if !self.is_editor_visible() {
            self.inner.state.borrow_mut().editor_closing_key = Some(event.key);
        }
    }

    /// Deliver a normalized key event, forwarding it to the parent of a tool
    /// window when unhandled. Returns whether it was handled.
    pub fn dispatch_key(&self, event: KeyboardEvent) -> bool {
        let handled = self
            .inner
            .callbacks
            .on_keyboard_event
            .with(|callback| callback(event))
            .unwrap_or(false);
        if handled || self.inner.kind != WindowKind::Tool {
            return handled;
        }
        match self.parent() {
            Some(parent) => parent.dispatch_key(event),
            None => false,
        }
    }
}

impl<B: Backend> std::fmt::Debug for Window<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .finish()
    }
}
