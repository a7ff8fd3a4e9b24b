//! Shared integration test helpers for uniplat.
//!
//! Every test drives a [`Platform`] over the headless backend and keeps a
//! clone of the backend to post native events and inspect native state.
//!
//! ```ignore
//! mod common;
//! use common::{Harness, counter};
//! ```

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use uniplat::backend::headless::{HeadlessBackend, HeadlessConfig};
use uniplat::input::{NativeModifiers, RawPointerEvent, RawPointerKind};
use uniplat::uniplat_config::MemorySettings;
use uniplat::{MouseButton, Platform, PlatformConfig, Window, WindowKind};

pub type TestPlatform = Platform<HeadlessBackend>;
pub type TestWindow = Window<HeadlessBackend>;

pub struct Harness {
    pub backend: HeadlessBackend,
    pub platform: TestPlatform,
    pub settings: Arc<MemorySettings>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(HeadlessConfig::default())
    }

    pub fn with_config(config: HeadlessConfig) -> Self {
        Self::with_configs(config, PlatformConfig::default())
    }

    pub fn with_configs(headless: HeadlessConfig, config: PlatformConfig) -> Self {
        let backend = HeadlessBackend::new(headless);
        let settings = Arc::new(MemorySettings::new());
        let platform = Platform::new(backend.clone(), config, settings.clone());
        Self {
            backend,
            platform,
            settings,
        }
    }

    /// A visible top-level window.
    pub fn window(&self) -> TestWindow {
        let window = self.platform.create_window(WindowKind::TopLevel, None);
        window.set_visible(true);
        window
    }

    pub fn advance_ms(&self, ms: u64) {
        self.backend.advance(Duration::from_millis(ms));
    }

    /// Advance simulated time and service everything that became due.
    pub fn settle_ms(&self, ms: u64) {
        self.advance_ms(ms);
        self.platform.run_until_idle();
    }

    pub fn elapsed(&self) -> Duration {
        self.backend.manual_clock().elapsed()
    }
}

/// A shared call counter and a closure that bumps it.
pub fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
    let count = Rc::new(Cell::new(0));
    let bump = {
        let count = Rc::clone(&count);
        move || count.set(count.get() + 1)
    };
    (count, bump)
}

pub fn left_press(x: f64, y: f64) -> RawPointerEvent {
    RawPointerEvent::new(
        RawPointerKind::ButtonDown {
            button: MouseButton::Left,
            click_count: 1,
        },
        x,
        y,
    )
}

pub fn left_release(x: f64, y: f64) -> RawPointerEvent {
    RawPointerEvent::new(
        RawPointerKind::ButtonUp {
            button: MouseButton::Left,
        },
        x,
        y,
    )
    .with_modifiers(NativeModifiers::BUTTON1)
}

pub fn motion(x: f64, y: f64) -> RawPointerEvent {
    RawPointerEvent::new(RawPointerKind::Motion, x, y)
}
