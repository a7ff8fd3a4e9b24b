//! Menu items.

use super::{Indicator, MenuInner};
use crate::backend::{Backend, NativeItemId, NativeMenu};
use crate::callback::Slot;
use crate::event::KeyboardEvent;
use crate::native_check;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Handle to an entry of a [`Menu`](super::Menu).
///
/// The handle does not keep its menu alive. Once the owning menu is cleared
/// or dropped the item is detached and every mutation is a no-op.
pub struct MenuItem<B: Backend> {
    pub(crate) inner: Rc<ItemInner<B>>,
}

impl<B: Backend> Clone for MenuItem<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

pub(crate) struct ItemInner<B: Backend> {
    id: NativeItemId,
    owner: RefCell<Weak<MenuInner<B>>>,
    label: RefCell<String>,
    accelerator: Cell<Option<KeyboardEvent>>,
    indicator: Cell<Indicator>,
    active: Cell<bool>,
    enabled: Cell<bool>,
    on_trigger: Slot<dyn FnMut()>,
}

impl<B: Backend> MenuItem<B> {
    pub(crate) fn new(
        id: NativeItemId,
        owner: Weak<MenuInner<B>>,
        label: &str,
        on_trigger: Box<dyn FnMut()>,
    ) -> Self {
        let inner = ItemInner {
            id,
            owner: RefCell::new(owner),
            label: RefCell::new(label.to_string()),
            accelerator: Cell::new(None),
            indicator: Cell::new(Indicator::None),
            active: Cell::new(false),
            enabled: Cell::new(true),
            on_trigger: Slot::default(),
        };
        inner.on_trigger.set(on_trigger);
        Self {
            inner: Rc::new(inner),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<ItemInner<B>> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn from_inner(inner: Rc<ItemInner<B>>) -> Self {
        Self { inner }
    }

    pub fn id(&self) -> NativeItemId {
        self.inner.id
    }

    /// Label without the accelerator suffix.
    pub fn label(&self) -> String {
        self.inner.label.borrow().clone()
    }

    /// Label as shown natively: the label, then `'\t'` and the accelerator
    /// description when one is set.
    pub fn display_label(&self) -> String {
        let label = self.inner.label.borrow();
        match self.inner.accelerator.get() {
            Some(accel) => format!("{}\t{}", label, accel.accelerator_description()),
            None => label.clone(),
        }
    }

    pub fn accelerator(&self) -> Option<KeyboardEvent> {
        self.inner.accelerator.get()
    }

    pub fn indicator(&self) -> Indicator {
        self.inner.indicator.get()
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    /// Whether the owning menu still holds this item.
    pub fn is_attached(&self) -> bool {
        self.inner.owner.borrow().strong_count() > 0
    }

    pub(crate) fn detach(&self) {
        *self.inner.owner.borrow_mut() = Weak::new();
    }

    /// Show `accel` as the item's shortcut. Key dispatch stays with the
    /// application.
    pub fn set_accelerator(&self, accel: KeyboardEvent) {
        let Some(owner) = self.owner("set_accelerator") else {
            return;
        };
        self.inner.accelerator.set(Some(accel));
        let label = self.display_label();
        native_check!(owner.native.borrow_mut().set_item_label(self.inner.id, &label));
    }

    /// Switch the mark drawn before the label. The active flag is unchanged.
    pub fn set_indicator(&self, indicator: Indicator) {
        let Some(owner) = self.owner("set_indicator") else {
            return;
        };
        self.inner.indicator.set(indicator);
        native_check!(
            owner
                .native
                .borrow_mut()
                .set_item_indicator(self.inner.id, indicator)
        );
    }

    /// Check or uncheck the item. Never fires the trigger callback.
    ///
    /// # Panics
    ///
    /// When the item has no indicator.
    pub fn set_active(&self, active: bool) {
        assert!(
            self.inner.indicator.get() != Indicator::None,
            "Cannot change state of a menu item without indicator"
        );
        let Some(owner) = self.owner("set_active") else {
            return;
        };
        self.inner.active.set(active);
        native_check!(
            owner
                .native
                .borrow_mut()
                .set_item_checked(self.inner.id, active)
        );
    }

    pub fn set_enabled(&self, enabled: bool) {
        let Some(owner) = self.owner("set_enabled") else {
            return;
        };
        self.inner.enabled.set(enabled);
        native_check!(
            owner
                .native
                .borrow_mut()
                .set_item_enabled(self.inner.id, enabled)
        );
    }

    /// Run the trigger callback for a native activation.
    pub(crate) fn trigger(&self) {
        if !self.is_attached() {
            crate::debug_log!("MENU", "Activation of detached item {} ignored", self.inner.id);
            return;
        }
        if !self.inner.enabled.get() {
            crate::debug_log!("MENU", "Activation of disabled item {} ignored", self.inner.id);
            return;
        }
        crate::debug_info!("MENU", "Item {} '{}' triggered", self.inner.id, self.label());
        self.inner.on_trigger.with(|callback| callback());
    }

    fn owner(&self, operation: &str) -> Option<Rc<MenuInner<B>>> {
        let owner = self.inner.owner.borrow().upgrade();
        if owner.is_none() {
            crate::debug_log!(
                "MENU",
                "{} on detached item {} ignored",
                operation,
                self.inner.id
            );
        }
        owner
    }
}

impl<B: Backend> std::fmt::Debug for MenuItem<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuItem")
            .field("id", &self.inner.id)
            .field("label", &*self.inner.label.borrow())
            .field("indicator", &self.inner.indicator.get())
            .field("active", &self.inner.active.get())
            .field("enabled", &self.inner.enabled.get())
            .finish()
    }
}
