//! The platform context: factories, shared input state and the event loop.
//!
//! [`Platform`] is a cheap handle; clones share one context. It owns the
//! backend, the [`InputCoordinator`] every window consults, the clock, the
//! settings store and the configuration. Windows and menu items are tracked
//! weakly so native events can be routed to them by id.

use crate::backend::{Backend, NativeEvent, NativeItemId, WindowEvent, WindowId};
use crate::clock::Clock;
use crate::input::{InputCoordinator, RawPointerKind};
use crate::menu::{ItemInner, Menu, MenuBar, MenuBarInner, MenuItem};
use crate::native_check;
use crate::timer::Timer;
use crate::window::{Window, WindowInner, WindowKind};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::time::Instant;
use uniplat_config::{PlatformConfig, SettingsStore};

pub struct Platform<B: Backend> {
    shared: Rc<Shared<B>>,
}

impl<B: Backend> Clone for Platform<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

struct Shared<B: Backend> {
    backend: B,
    config: PlatformConfig,
    clock: Arc<dyn Clock>,
    input: Arc<InputCoordinator>,
    settings: Arc<dyn SettingsStore>,
    windows: RefCell<BTreeMap<WindowId, Weak<WindowInner<B>>>>,
    items: RefCell<HashMap<NativeItemId, Weak<ItemInner<B>>>>,
    main_menu: RefCell<Weak<MenuBarInner<B>>>,
    next_id: Cell<u64>,
    exit_requested: Cell<bool>,
}

impl<B: Backend> Platform<B> {
    pub fn new(backend: B, config: PlatformConfig, settings: Arc<dyn SettingsStore>) -> Self {
        let clock = backend.clock();
        let input = Arc::new(InputCoordinator::new(config.menu_dismiss_suppression()));
        log::info!(
            "Platform initialized with {} backend (dismiss suppression {}ms)",
            backend.name(),
            config.menu_dismiss_suppression_ms
        );
        Self {
            shared: Rc::new(Shared {
                backend,
                config,
                clock,
                input,
                settings,
                windows: RefCell::new(BTreeMap::new()),
                items: RefCell::new(HashMap::new()),
                main_menu: RefCell::new(Weak::new()),
                next_id: Cell::new(1),
                exit_requested: Cell::new(false),
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.shared.backend
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.shared.config
    }

    pub fn settings(&self) -> &Arc<dyn SettingsStore> {
        &self.shared.settings
    }

    /// The shared dismiss-click suppression state.
    pub fn input(&self) -> &Arc<InputCoordinator> {
        &self.shared.input
    }

    pub fn now(&self) -> Instant {
        self.shared.clock.now()
    }

    pub(crate) fn allocate_id(&self) -> u64 {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);
        id
    }

    // ---- factories ----

    pub fn create_timer(&self) -> Timer<B> {
        Timer::new(native_check!(self.shared.backend.create_timer()))
    }

    pub fn create_menu(&self) -> Menu<B> {
        Menu::new(
            self.clone(),
            native_check!(self.shared.backend.create_menu()),
        )
    }

    /// The application menu bar and whether it is unique.
    ///
    /// With a global menu bar every call returns the same bar and `true`,
    /// for as long as the application keeps a handle to it. Otherwise every
    /// call returns a new bar for one window and `false`.
    pub fn get_or_create_main_menu(&self) -> (MenuBar<B>, bool) {
        if !self.shared.backend.has_global_menu_bar() {
            return (self.create_menu_bar(), false);
        }

        if let Some(inner) = self.shared.main_menu.borrow().upgrade() {
            return (MenuBar::from_inner(inner), true);
        }
        let bar = self.create_menu_bar();
        *self.shared.main_menu.borrow_mut() = bar.downgrade();
        (bar, true)
    }

    fn create_menu_bar(&self) -> MenuBar<B> {
        MenuBar::new(
            self.clone(),
            native_check!(self.shared.backend.create_menu_bar()),
        )
    }

    pub fn create_window(&self, kind: WindowKind, parent: Option<&Window<B>>) -> Window<B> {
        let id = self.allocate_id();
        let native = {
            let parent_native = parent.map(|parent| parent.native());
            native_check!(
                self.shared
                    .backend
                    .create_window(id, kind, parent_native.as_deref())
            )
        };
        let window = Window::new(self.clone(), id, kind, parent, native);
        self.shared
            .windows
            .borrow_mut()
            .insert(id, window.downgrade());
        crate::debug_info!("WINDOW", "Created {:?} window {}", kind, id);
        window
    }

    pub(crate) fn register_item(&self, id: NativeItemId, item: Weak<ItemInner<B>>) {
        let mut items = self.shared.items.borrow_mut();
        items.retain(|_, item| item.strong_count() > 0);
        items.insert(id, item);
    }

    pub(crate) fn unregister_window(&self, id: WindowId) {
        self.shared.windows.borrow_mut().remove(&id);
    }

    /// A live window by id.
    pub fn window(&self, id: WindowId) -> Option<Window<B>> {
        let inner = self.shared.windows.borrow().get(&id)?.upgrade()?;
        Some(Window::from_inner(inner))
    }

    /// Ids of all live windows, ascending.
    pub fn window_ids(&self) -> Vec<WindowId> {
        self.shared
            .windows
            .borrow()
            .iter()
            .filter(|(_, window)| window.strong_count() > 0)
            .map(|(id, _)| *id)
            .collect()
    }

    fn item(&self, id: NativeItemId) -> Option<MenuItem<B>> {
        let inner = self.shared.items.borrow().get(&id)?.upgrade()?;
        Some(MenuItem::from_inner(inner))
    }

    // ---- event loop ----

    /// Drive the event loop until [`Platform::exit`] is called or the backend
    /// runs out of events.
    pub fn run(&self) {
        self.shared.exit_requested.set(false);
        while !self.shared.exit_requested.get() {
            match self.shared.backend.next_event(true) {
                Some(event) => self.dispatch(event),
                None => break,
            }
        }
    }

    /// Drive the event loop until `done` returns true. Returns false when the
    /// loop ended first, through [`Platform::exit`] or exhaustion.
    pub fn run_until(&self, mut done: impl FnMut() -> bool) -> bool {
        loop {
            if done() {
                return true;
            }
            if self.shared.exit_requested.get() {
                return false;
            }
            match self.shared.backend.next_event(true) {
                Some(event) => self.dispatch(event),
                None => return done(),
            }
        }
    }

    /// Service only the events that are already pending.
    pub fn run_until_idle(&self) {
        while let Some(event) = self.shared.backend.next_event(false) {
            self.dispatch(event);
        }
    }

    /// Stop [`Platform::run`] and the native loop.
    pub fn exit(&self) {
        log::info!("Platform exit requested");
        self.shared.exit_requested.set(true);
        self.shared.backend.exit();
    }

    pub fn is_exit_requested(&self) -> bool {
        self.shared.exit_requested.get()
    }

    /// Route one native event.
    pub fn dispatch(&self, event: NativeEvent) {
        match event {
            NativeEvent::Window { window, event } => self.dispatch_window_event(window, event),
            NativeEvent::MenuActivated(id) => match self.item(id) {
                Some(item) => item.trigger(),
                None => crate::debug_log!("MENU", "Activation of unknown item {}", id),
            },
            NativeEvent::Callback(callback) => callback(),
            NativeEvent::Wakeup => {}
        }
    }

    fn dispatch_window_event(&self, id: WindowId, event: WindowEvent) {
        let (id, event) = self.redirect_wheel(id, event);
        match self.window(id) {
            Some(window) => window.handle_event(event),
            None => crate::debug_trace!("WINDOW", "Event for unknown window {} dropped", id),
        }
    }

    /// Wheel events go to the window under the pointer, not the focused one.
    fn redirect_wheel(&self, id: WindowId, event: WindowEvent) -> (WindowId, WindowEvent) {
        let WindowEvent::Pointer(mut raw) = event else {
            return (id, event);
        };
        if let RawPointerKind::Wheel { .. } = raw.kind
            && let Some((screen_x, screen_y)) = raw.screen
            && let Some((target, x, y)) = self
                .shared
                .backend
                .window_under_pointer(screen_x, screen_y)
            && target != id
        {
            crate::debug_trace!("INPUT", "Wheel redirected from window {} to {}", id, target);
            raw.x = x;
            raw.y = y;
            return (target, WindowEvent::Pointer(raw));
        }
        (id, WindowEvent::Pointer(raw))
    }
}
