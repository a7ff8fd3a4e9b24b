//! Single-shot timer.
//!
//! Each [`Timer::wind_up`] bumps a generation counter and schedules a native
//! fire tagged with it. A fire whose generation is stale, or whose timer is
//! gone, does nothing: the native loop may already have queued it when the
//! timer was re-armed or dropped.

use crate::backend::{Backend, NativeTimer};
use crate::callback::Slot;
use crate::native_check;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

#[derive(Default)]
struct TimerShared {
    generation: Cell<u64>,
    armed: Cell<bool>,
    on_timeout: Slot<dyn FnMut()>,
}

pub struct Timer<B: Backend> {
    native: RefCell<B::Timer>,
    shared: Rc<TimerShared>,
}

impl<B: Backend> Timer<B> {
    pub(crate) fn new(native: B::Timer) -> Self {
        Self {
            native: RefCell::new(native),
            shared: Rc::new(TimerShared::default()),
        }
    }

    /// Install the callback run when the timer fires.
    pub fn on_timeout(&self, callback: impl FnMut() + 'static) {
        self.shared.on_timeout.set(Box::new(callback));
    }

    /// Fire once after at least `milliseconds`, replacing any pending fire.
    pub fn wind_up(&self, milliseconds: u64) {
        let generation = self.shared.generation.get().wrapping_add(1);
        self.shared.generation.set(generation);
        self.shared.armed.set(true);

        let shared: Weak<TimerShared> = Rc::downgrade(&self.shared);
        let fire = move || {
            let Some(shared) = shared.upgrade() else {
                crate::debug_trace!("TIMER", "Fire for dropped timer ignored");
                return;
            };
            if shared.generation.get() != generation {
                crate::debug_trace!("TIMER", "Stale fire (generation {}) ignored", generation);
                return;
            }
            shared.armed.set(false);
            crate::debug_log!("TIMER", "Fired (generation {})", generation);
            shared.on_timeout.with(|callback| callback());
        };

        let mut native = self.native.borrow_mut();
        native.cancel();
        native_check!(native.schedule(Duration::from_millis(milliseconds), Box::new(fire)));
        crate::debug_log!(
            "TIMER",
            "Armed for {}ms (generation {})",
            milliseconds,
            generation
        );
    }

    /// Whether a fire is pending.
    pub fn is_armed(&self) -> bool {
        self.shared.armed.get()
    }

    /// Drop the pending fire, if any.
    pub fn cancel(&self) {
        self.shared
            .generation
            .set(self.shared.generation.get().wrapping_add(1));
        self.shared.armed.set(false);
        self.native.borrow_mut().cancel();
    }
}

impl<B: Backend> Drop for Timer<B> {
    fn drop(&mut self) {
        self.native.get_mut().cancel();
    }
}
