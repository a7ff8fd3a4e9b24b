//! Installable application callbacks.
//!
//! Callbacks run on the single thread that drives the platform layer and may
//! re-enter it (a menu trigger can show another popup, a timeout can re-arm
//! its own timer). [`Slot`] takes the callback out while it runs so such
//! re-entry never aliases a borrow; a nested call to the same slot sees it
//! empty and does nothing.

use std::cell::RefCell;

pub struct Slot<F: ?Sized> {
    callback: RefCell<Option<Box<F>>>,
}

impl<F: ?Sized> Default for Slot<F> {
    fn default() -> Self {
        Self {
            callback: RefCell::new(None),
        }
    }
}

impl<F: ?Sized> std::fmt::Debug for Slot<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("installed", &self.is_installed())
            .finish()
    }
}

impl<F: ?Sized> Slot<F> {
    pub fn set(&self, callback: Box<F>) {
        *self.callback.borrow_mut() = Some(callback);
    }

    pub fn clear(&self) {
        self.callback.borrow_mut().take();
    }

    pub fn is_installed(&self) -> bool {
        self.callback.borrow().is_some()
    }

    /// Run the installed callback, returning `None` when none is installed.
    ///
    /// A callback installed by `call` itself while running replaces the one
    /// being run.
    pub fn with<R>(&self, call: impl FnOnce(&mut F) -> R) -> Option<R> {
        let mut callback = self.callback.borrow_mut().take()?;
        let result = call(&mut callback);
        let mut slot = self.callback.borrow_mut();
        if slot.is_none() {
            *slot = Some(callback);
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_empty_slot_returns_none() {
        let slot: Slot<dyn FnMut() -> u32> = Slot::default();
        assert_eq!(slot.with(|f| f()), None);
    }

    #[test]
    fn test_callback_survives_call() {
        let slot: Slot<dyn FnMut() -> u32> = Slot::default();
        let mut count = 0;
        slot.set(Box::new(move || {
            count += 1;
            count
        }));
        assert_eq!(slot.with(|f| f()), Some(1));
        assert_eq!(slot.with(|f| f()), Some(2));
    }

    #[test]
    fn test_reentrant_call_is_ignored() {
        let slot: Rc<Slot<dyn FnMut() -> Option<u32>>> = Rc::new(Slot::default());
        let inner = Rc::clone(&slot);
        slot.set(Box::new(move || inner.with(|f| f().unwrap_or(0))));
        assert_eq!(slot.with(|f| f()), Some(None));
    }

    #[test]
    fn test_replacement_during_call_wins() {
        let slot: Rc<Slot<dyn FnMut() -> u32>> = Rc::new(Slot::default());
        let inner = Rc::clone(&slot);
        slot.set(Box::new(move || {
            inner.set(Box::new(|| 2));
            1
        }));
        assert_eq!(slot.with(|f| f()), Some(1));
        assert_eq!(slot.with(|f| f()), Some(2));
    }
}
