//! Menu tree: popup menus, submenus and menu bars.
//!
//! A [`Menu`] owns its entries; submenus are owned by the entry that holds
//! them. Items refer back to their menu without owning it, and lose that
//! reference when the menu is cleared. Labels may carry `&` mnemonic markers,
//! which backends translate into their own convention.
//!
//! [`Menu::pop_up`] is the one blocking call: it drives the event loop through
//! [`Platform::run_until`](crate::Platform::run_until) until the popup closes.

mod item;

pub use item::MenuItem;
pub(crate) use item::ItemInner;

use crate::backend::{Backend, NativeItemId, NativeMenu, NativeMenuBar, PopupOutcome};
use crate::native_check;
use crate::platform::Platform;
use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

/// Mark drawn before a menu item's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Indicator {
    #[default]
    None,
    CheckMark,
    RadioMark,
}

/// One entry of a [`Menu`], in insertion order.
pub enum MenuEntry<B: Backend> {
    Item(MenuItem<B>),
    SubMenu { label: String, menu: Menu<B> },
    Separator,
}

impl<B: Backend> Clone for MenuEntry<B> {
    fn clone(&self) -> Self {
        match self {
            MenuEntry::Item(item) => MenuEntry::Item(item.clone()),
            MenuEntry::SubMenu { label, menu } => MenuEntry::SubMenu {
                label: label.clone(),
                menu: menu.clone(),
            },
            MenuEntry::Separator => MenuEntry::Separator,
        }
    }
}

impl<B: Backend> std::fmt::Debug for MenuEntry<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuEntry::Item(item) => f.debug_tuple("Item").field(item).finish(),
            MenuEntry::SubMenu { label, menu } => f
                .debug_struct("SubMenu")
                .field("label", label)
                .field("entries", &menu.len())
                .finish(),
            MenuEntry::Separator => f.write_str("Separator"),
        }
    }
}

pub struct Menu<B: Backend> {
    inner: Rc<MenuInner<B>>,
}

impl<B: Backend> Clone for Menu<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

pub(crate) struct MenuInner<B: Backend> {
    platform: Platform<B>,
    pub(crate) native: RefCell<B::Menu>,
    entries: RefCell<Vec<MenuEntry<B>>>,
}

impl<B: Backend> Menu<B> {
    pub(crate) fn new(platform: Platform<B>, native: B::Menu) -> Self {
        Self {
            inner: Rc::new(MenuInner {
                platform,
                native: RefCell::new(native),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Append an actionable item running `on_trigger` when selected.
    pub fn add_item(&self, label: &str, on_trigger: impl FnMut() + 'static) -> MenuItem<B> {
        let platform = &self.inner.platform;
        let id = platform.allocate_id();
        let item = MenuItem::new(id, Rc::downgrade(&self.inner), label, Box::new(on_trigger));
        native_check!(self.inner.native.borrow_mut().append_item(id, label));
        platform.register_item(id, item.downgrade());
        self.inner
            .entries
            .borrow_mut()
            .push(MenuEntry::Item(item.clone()));
        item
    }

    /// Append a nested menu and return it, empty.
    pub fn add_sub_menu(&self, label: &str) -> Menu<B> {
        let platform = &self.inner.platform;
        let submenu = Menu::new(platform.clone(), native_check!(platform.backend().create_menu()));
        native_check!(
            self.inner
                .native
                .borrow_mut()
                .append_submenu(label, &submenu.inner.native.borrow())
        );
        self.inner.entries.borrow_mut().push(MenuEntry::SubMenu {
            label: label.to_string(),
            menu: submenu.clone(),
        });
        submenu
    }

    pub fn add_separator(&self) {
        native_check!(self.inner.native.borrow_mut().append_separator());
        self.inner.entries.borrow_mut().push(MenuEntry::Separator);
    }

    /// Remove every entry. Items handed out earlier become detached and
    /// submenus are cleared in turn.
    pub fn clear(&self) {
        let entries = std::mem::take(&mut *self.inner.entries.borrow_mut());
        if entries.is_empty() {
            return;
        }
        native_check!(self.inner.native.borrow_mut().clear());
        for entry in entries {
            match entry {
                MenuEntry::Item(item) => item.detach(),
                MenuEntry::SubMenu { menu, .. } => menu.clear(),
                MenuEntry::Separator => {}
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    /// Snapshot of the entries.
    pub fn entries(&self) -> Vec<MenuEntry<B>> {
        self.inner.entries.borrow().clone()
    }

    /// Find an item by id in this menu or any submenu.
    pub fn find_item(&self, id: NativeItemId) -> Option<MenuItem<B>> {
        self.inner
            .entries
            .borrow()
            .iter()
            .find_map(|entry| match entry {
                MenuEntry::Item(item) if item.id() == id => Some(item.clone()),
                MenuEntry::SubMenu { menu, .. } => menu.find_item(id),
                _ => None,
            })
    }

    pub fn native(&self) -> Ref<'_, B::Menu> {
        self.inner.native.borrow()
    }

    /// Show the menu at the pointer and block until it closes.
    ///
    /// Other events, including timers and events for other windows, are
    /// serviced meanwhile. A selected item's trigger runs before this returns.
    /// A dismissal without selection opens the suppression window for pointer
    /// button events on every window.
    pub fn pop_up(&self) -> PopupOutcome {
        let platform = &self.inner.platform;
        native_check!(self.inner.native.borrow_mut().show_popup());
        crate::debug_info!("MENU", "Popup shown with {} entries", self.len());

        let mut outcome = None;
        platform.run_until(|| {
            if outcome.is_none() {
                outcome = self.inner.native.borrow_mut().take_popup_outcome();
            }
            outcome.is_some()
        });

        let outcome = outcome.unwrap_or(PopupOutcome::Dismissed);
        match outcome {
            PopupOutcome::Selected(id) => match self.find_item(id) {
                Some(item) => item.trigger(),
                None => crate::debug_log!("MENU", "Popup selected unknown item {}", id),
            },
            PopupOutcome::Dismissed => {
                platform.input().record_dismissal(platform.now());
                crate::debug_log!("MENU", "Popup dismissed without selection");
            }
        }
        outcome
    }
}

impl<B: Backend> std::fmt::Debug for Menu<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Menu")
            .field("entries", &*self.inner.entries.borrow())
            .finish()
    }
}

/// Application or window menu bar: an ordered list of labelled menus.
pub struct MenuBar<B: Backend> {
    pub(crate) inner: Rc<MenuBarInner<B>>,
}

impl<B: Backend> Clone for MenuBar<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

pub(crate) struct MenuBarInner<B: Backend> {
    platform: Platform<B>,
    pub(crate) native: RefCell<B::MenuBar>,
    menus: RefCell<Vec<(String, Menu<B>)>>,
}

impl<B: Backend> MenuBar<B> {
    pub(crate) fn new(platform: Platform<B>, native: B::MenuBar) -> Self {
        Self {
            inner: Rc::new(MenuBarInner {
                platform,
                native: RefCell::new(native),
                menus: RefCell::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Rc<MenuBarInner<B>>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<MenuBarInner<B>> {
        Rc::downgrade(&self.inner)
    }

    /// Append a top-level menu and return it, empty.
    pub fn add_sub_menu(&self, label: &str) -> Menu<B> {
        let platform = &self.inner.platform;
        let menu = Menu::new(platform.clone(), native_check!(platform.backend().create_menu()));
        native_check!(
            self.inner
                .native
                .borrow_mut()
                .append_menu(label, &menu.inner.native.borrow())
        );
        self.inner
            .menus
            .borrow_mut()
            .push((label.to_string(), menu.clone()));
        menu
    }

    /// Remove every menu, clearing each one.
    pub fn clear(&self) {
        let menus = std::mem::take(&mut *self.inner.menus.borrow_mut());
        if menus.is_empty() {
            return;
        }
        native_check!(self.inner.native.borrow_mut().clear());
        for (_, menu) in menus {
            menu.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.menus.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.menus.borrow().is_empty()
    }

    /// Snapshot of the labelled menus.
    pub fn menus(&self) -> Vec<(String, Menu<B>)> {
        self.inner.menus.borrow().clone()
    }

    pub fn native(&self) -> Ref<'_, B::MenuBar> {
        self.inner.native.borrow()
    }
}

/// Label text with `&` mnemonic markers removed; `&&` stands for `&`.
pub fn strip_mnemonic(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars();
    while let Some(chr) = chars.next() {
        if chr == '&' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(chr);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_mnemonic() {
        assert_eq!(strip_mnemonic("&File"), "File");
        assert_eq!(strip_mnemonic("Save &As..."), "Save As...");
        assert_eq!(strip_mnemonic("Fish && Chips"), "Fish & Chips");
        assert_eq!(strip_mnemonic("Trailing&"), "Trailing");
    }
}
