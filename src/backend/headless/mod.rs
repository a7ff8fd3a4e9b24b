//! In-memory backend with simulated time.
//!
//! Everything a native toolkit would do happens in plain data structures:
//! timers are deadlines on a [`ManualClock`], popups resolve from a queue of
//! [`PopupScript`]s, windows live on a configurable set of fake displays and
//! text is measured with fixed font ratios. Tests post native events with the
//! `post_*` helpers and inspect native state through the `Headless*` types.
//!
//! When the loop waits and nothing is queued, the clock jumps to the next
//! timer deadline or popup resolution, whichever comes first.

mod menu;
mod window;

pub use menu::{HeadlessMenu, HeadlessMenuBar, ItemRecord, MenuRecordEntry};
pub use window::{EditorState, HeadlessWindow, NativeScrollbar};

use super::{Backend, NativeEvent, NativeItemId, NativeTimer, PlacementLayout, PopupOutcome, WindowEvent, WindowId};
use crate::clock::{Clock, ManualClock};
use crate::error::NativeResult;
use crate::input::{RawKeyEvent, RawPointerEvent};
use crate::window::{Rect, WindowKind};
use menu::MenuRecord;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::time::{Duration, Instant};
use window::WindowRecord;

/// Behavior switches for the headless backend.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessConfig {
    /// Dots per inch reported by new windows.
    pub pixel_density: f64,
    /// Visible display bounds in screen coordinates.
    pub displays: Vec<Rect>,
    /// Initial placement of new windows.
    pub default_placement: Rect,
    pub placement_layout: PlacementLayout,
    /// One application-wide menu bar instead of one per window.
    pub global_menu_bar: bool,
    /// Report programmatic scrollbar changes back as scrollbar events.
    pub scrollbar_echoes_sets: bool,
    /// Windows can show a represented document file.
    pub represents_files: bool,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            pixel_density: 96.0,
            displays: vec![Rect::new(0, 0, 1920, 1080)],
            default_placement: Rect::new(100, 100, 900, 700),
            placement_layout: PlacementLayout::Corners,
            global_menu_bar: false,
            scrollbar_echoes_sets: false,
            represents_files: false,
        }
    }
}

/// How the next popup closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupResponse {
    /// Select the enabled item with this label (mnemonics and accelerator
    /// ignored), searching submenus too.
    Select(String),
    SelectId(NativeItemId),
    Dismiss,
}

/// Scripted user response to one popup presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupScript {
    pub after: Duration,
    pub response: PopupResponse,
}

impl PopupScript {
    pub fn select(label: &str) -> Self {
        Self {
            after: Duration::ZERO,
            response: PopupResponse::Select(label.to_string()),
        }
    }

    pub fn select_id(id: NativeItemId) -> Self {
        Self {
            after: Duration::ZERO,
            response: PopupResponse::SelectId(id),
        }
    }

    pub fn dismiss() -> Self {
        Self {
            after: Duration::ZERO,
            response: PopupResponse::Dismiss,
        }
    }

    /// Resolve `after` the popup was shown.
    pub fn after(mut self, after: Duration) -> Self {
        self.after = after;
        self
    }
}

struct PendingTimer {
    timer: u64,
    due: Instant,
    seq: u64,
    fire: Box<dyn FnOnce()>,
}

struct OpenPopup {
    menu: Rc<RefCell<MenuRecord>>,
    resolve_at: Instant,
    response: PopupResponse,
}

pub(crate) struct State {
    config: HeadlessConfig,
    clock: Arc<ManualClock>,
    queue: RefCell<VecDeque<NativeEvent>>,
    timers: RefCell<Vec<PendingTimer>>,
    next_seq: Cell<u64>,
    popup_scripts: RefCell<VecDeque<PopupScript>>,
    /// Open popups, innermost last. Only the innermost one can resolve.
    open_popups: RefCell<Vec<OpenPopup>>,
    windows: RefCell<Vec<(WindowId, Weak<RefCell<WindowRecord>>)>>,
    exit_requested: Cell<bool>,
}

impl State {
    fn next_seq(&self) -> u64 {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        seq
    }

    pub(crate) fn push(&self, event: NativeEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    pub(crate) fn push_window_event(&self, window: WindowId, event: WindowEvent) {
        self.push(NativeEvent::Window { window, event });
    }

    pub(crate) fn now(&self) -> Instant {
        self.clock.now()
    }

    pub(crate) fn config(&self) -> &HeadlessConfig {
        &self.config
    }

    pub(crate) fn present_popup(&self, menu: Rc<RefCell<MenuRecord>>) {
        let script = self
            .popup_scripts
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(PopupScript::dismiss);
        self.open_popups.borrow_mut().push(OpenPopup {
            menu,
            resolve_at: self.now() + script.after,
            response: script.response,
        });
    }

    /// Move every due timer into the queue, earliest first.
    fn collect_due(&self) {
        let now = self.now();
        let mut timers = self.timers.borrow_mut();
        let mut due = Vec::new();
        let mut index = 0;
        while index < timers.len() {
            if timers[index].due <= now {
                due.push(timers.remove(index));
            } else {
                index += 1;
            }
        }
        due.sort_by_key(|timer| (timer.due, timer.seq));
        let mut queue = self.queue.borrow_mut();
        for timer in due {
            queue.push_back(NativeEvent::Callback(timer.fire));
        }
    }

    fn resolve_popup(&self) {
        let Some(popup) = self.open_popups.borrow_mut().pop() else {
            return;
        };
        let outcome = {
            let record = popup.menu.borrow();
            match &popup.response {
                PopupResponse::Dismiss => PopupOutcome::Dismissed,
                PopupResponse::SelectId(id) => record
                    .find_enabled(|item| item.id == *id)
                    .map_or(PopupOutcome::Dismissed, PopupOutcome::Selected),
                PopupResponse::Select(label) => record
                    .find_enabled(|item| item.plain_label() == *label)
                    .map_or(PopupOutcome::Dismissed, PopupOutcome::Selected),
            }
        };
        log::debug!("Headless popup resolved: {:?}", outcome);
        popup.menu.borrow_mut().outcome = Some(outcome);
    }
}

/// The headless backend. Clones share one simulated environment.
#[derive(Clone)]
pub struct HeadlessBackend {
    state: Rc<State>,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(HeadlessConfig::default())
    }
}

impl HeadlessBackend {
    pub fn new(config: HeadlessConfig) -> Self {
        Self {
            state: Rc::new(State {
                config,
                clock: Arc::new(ManualClock::new()),
                queue: RefCell::new(VecDeque::new()),
                timers: RefCell::new(Vec::new()),
                next_seq: Cell::new(1),
                popup_scripts: RefCell::new(VecDeque::new()),
                open_popups: RefCell::new(Vec::new()),
                windows: RefCell::new(Vec::new()),
                exit_requested: Cell::new(false),
            }),
        }
    }

    pub fn manual_clock(&self) -> Arc<ManualClock> {
        Arc::clone(&self.state.clock)
    }

    /// Advance simulated time. Timers that become due are queued on the next
    /// event fetch.
    pub fn advance(&self, by: Duration) {
        self.state.clock.advance(by);
    }

    /// Queue a native event.
    pub fn post(&self, event: NativeEvent) {
        self.state.push(event);
    }

    pub fn post_window_event(&self, window: WindowId, event: WindowEvent) {
        self.state.push_window_event(window, event);
    }

    pub fn post_pointer(&self, window: WindowId, raw: RawPointerEvent) {
        self.post_window_event(window, WindowEvent::Pointer(raw));
    }

    pub fn post_key(&self, window: WindowId, raw: RawKeyEvent) {
        self.post_window_event(window, WindowEvent::Key(raw));
    }

    pub fn post_menu_activation(&self, item: NativeItemId) {
        self.post(NativeEvent::MenuActivated(item));
    }

    /// Script how the next popup presentation closes. Without a script a
    /// popup is dismissed immediately.
    pub fn script_popup(&self, script: PopupScript) {
        self.state.popup_scripts.borrow_mut().push_back(script);
    }

    pub fn is_popup_open(&self) -> bool {
        !self.state.open_popups.borrow().is_empty()
    }

    /// Number of popups open at once, nested ones included.
    pub fn open_popups(&self) -> usize {
        self.state.open_popups.borrow().len()
    }

    /// Queue the fires of all due timers without dispatching them.
    pub fn collect_due_timers(&self) {
        self.state.collect_due();
    }

    pub fn pending_events(&self) -> usize {
        self.state.queue.borrow().len()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.timers.borrow().len()
    }

    pub fn exit_requested(&self) -> bool {
        self.state.exit_requested.get()
    }
}

impl Backend for HeadlessBackend {
    type Timer = HeadlessTimer;
    type Menu = HeadlessMenu;
    type MenuBar = HeadlessMenuBar;
    type Window = HeadlessWindow;

    fn name(&self) -> &'static str {
        "headless"
    }

    fn clock(&self) -> Arc<dyn Clock> {
        self.manual_clock()
    }

    fn create_timer(&self) -> NativeResult<HeadlessTimer> {
        Ok(HeadlessTimer {
            state: Rc::clone(&self.state),
            id: self.state.next_seq(),
        })
    }

    fn create_menu(&self) -> NativeResult<HeadlessMenu> {
        Ok(HeadlessMenu::new(Rc::clone(&self.state)))
    }

    fn create_menu_bar(&self) -> NativeResult<HeadlessMenuBar> {
        Ok(HeadlessMenuBar::default())
    }

    fn has_global_menu_bar(&self) -> bool {
        self.state.config.global_menu_bar
    }

    fn create_window(
        &self,
        id: WindowId,
        kind: WindowKind,
        parent: Option<&HeadlessWindow>,
    ) -> NativeResult<HeadlessWindow> {
        let window = HeadlessWindow::new(
            Rc::clone(&self.state),
            id,
            kind,
            parent.map(HeadlessWindow::id),
        );
        self.state
            .windows
            .borrow_mut()
            .push((id, window.downgrade_record()));
        Ok(window)
    }

    fn placement_layout(&self) -> PlacementLayout {
        self.state.config.placement_layout
    }

    fn displays(&self) -> Vec<Rect> {
        self.state.config.displays.clone()
    }

    fn window_under_pointer(&self, screen_x: f64, screen_y: f64) -> Option<(WindowId, f64, f64)> {
        let windows = self.state.windows.borrow();
        // Later windows stack above earlier ones
        windows.iter().rev().find_map(|(id, record)| {
            let record = record.upgrade()?;
            let record = record.borrow();
            let rect = record.placement.rect;
            (record.visible && !record.destroyed && rect.contains(screen_x, screen_y)).then(|| {
                (
                    *id,
                    screen_x - f64::from(rect.left),
                    screen_y - f64::from(rect.top),
                )
            })
        })
    }

    fn next_event(&self, wait: bool) -> Option<NativeEvent> {
        let state = &self.state;
        state.collect_due();
        if let Some(event) = state.queue.borrow_mut().pop_front() {
            return Some(event);
        }
        if !wait {
            return None;
        }

        let next_timer = state.timers.borrow().iter().map(|timer| timer.due).min();
        let popup_at = state
            .open_popups
            .borrow()
            .last()
            .map(|popup| popup.resolve_at);

        if let Some(timer_at) = next_timer
            && popup_at.is_none_or(|at| timer_at <= at)
        {
            state.clock.advance_to(timer_at);
            state.collect_due();
            return state.queue.borrow_mut().pop_front();
        }

        let popup_at = popup_at?;
        state.clock.advance_to(popup_at);
        state.resolve_popup();
        Some(NativeEvent::Wakeup)
    }

    fn exit(&self) {
        self.state.exit_requested.set(true);
    }
}

/// Headless single-shot timer: a deadline on the simulated clock.
pub struct HeadlessTimer {
    state: Rc<State>,
    id: u64,
}

impl NativeTimer for HeadlessTimer {
    fn schedule(&mut self, delay: Duration, fire: Box<dyn FnOnce()>) -> NativeResult<()> {
        let pending = PendingTimer {
            timer: self.id,
            due: self.state.now() + delay,
            seq: self.state.next_seq(),
            fire,
        };
        self.state.timers.borrow_mut().push(pending);
        Ok(())
    }

    fn cancel(&mut self) {
        // Fires already moved to the queue stay there
        self.state
            .timers
            .borrow_mut()
            .retain(|timer| timer.timer != self.id);
    }
}
