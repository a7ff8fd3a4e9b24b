//! Headless menus and menu bars.

use super::State;
use crate::backend::{NativeItemId, NativeMenu, NativeMenuBar, PopupOutcome};
use crate::error::{NativeError, NativeResult};
use crate::menu::{Indicator, strip_mnemonic};
use std::cell::RefCell;
use std::rc::Rc;

/// Native state of one menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: NativeItemId,
    /// Label as set natively, including any `'\t'` accelerator suffix.
    pub label: String,
    pub indicator: Indicator,
    pub checked: bool,
    pub enabled: bool,
}

impl ItemRecord {
    /// Label without mnemonics or accelerator suffix.
    pub fn plain_label(&self) -> String {
        let label = self.label.split('\t').next().unwrap_or_default();
        strip_mnemonic(label)
    }

    /// Accelerator suffix, if any.
    pub fn accelerator_text(&self) -> Option<&str> {
        self.label.split_once('\t').map(|(_, accel)| accel)
    }
}

#[derive(Debug, Clone)]
pub enum MenuRecordEntry {
    Item(ItemRecord),
    SubMenu {
        label: String,
        entries: Vec<MenuRecordEntry>,
    },
    Separator,
}

enum Entry {
    Item(ItemRecord),
    SubMenu {
        label: String,
        menu: Rc<RefCell<MenuRecord>>,
    },
    Separator,
}

#[derive(Default)]
pub(crate) struct MenuRecord {
    entries: Vec<Entry>,
    pub(crate) outcome: Option<PopupOutcome>,
    popups_shown: usize,
}

impl MenuRecord {
    fn item_mut(&mut self, id: NativeItemId) -> Option<&mut ItemRecord> {
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Item(item) if item.id == id => Some(item),
            _ => None,
        })
    }

    /// Id of the first enabled item matching `pred`, searching submenus.
    pub(crate) fn find_enabled(&self, pred: impl Fn(&ItemRecord) -> bool + Copy) -> Option<NativeItemId> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Item(item) if item.enabled && pred(item) => Some(item.id),
            Entry::SubMenu { menu, .. } => menu.borrow().find_enabled(pred),
            _ => None,
        })
    }

    fn snapshot(&self) -> Vec<MenuRecordEntry> {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Item(item) => MenuRecordEntry::Item(item.clone()),
                Entry::SubMenu { label, menu } => MenuRecordEntry::SubMenu {
                    label: label.clone(),
                    entries: menu.borrow().snapshot(),
                },
                Entry::Separator => MenuRecordEntry::Separator,
            })
            .collect()
    }
}

pub struct HeadlessMenu {
    state: Rc<State>,
    record: Rc<RefCell<MenuRecord>>,
}

impl HeadlessMenu {
    pub(crate) fn new(state: Rc<State>) -> Self {
        Self {
            state,
            record: Rc::new(RefCell::new(MenuRecord::default())),
        }
    }

    /// Native entries, submenus expanded.
    pub fn entries(&self) -> Vec<MenuRecordEntry> {
        self.record.borrow().snapshot()
    }

    pub fn item(&self, id: NativeItemId) -> Option<ItemRecord> {
        self.record.borrow_mut().item_mut(id).map(|item| item.clone())
    }

    pub fn popups_shown(&self) -> usize {
        self.record.borrow().popups_shown
    }

    fn with_item(
        &mut self,
        call: &'static str,
        id: NativeItemId,
        update: impl FnOnce(&mut ItemRecord),
    ) -> NativeResult<()> {
        let mut record = self.record.borrow_mut();
        let item = record
            .item_mut(id)
            .ok_or_else(|| NativeError::new(call, format!("no menu item {}", id)))?;
        update(item);
        Ok(())
    }
}

impl NativeMenu for HeadlessMenu {
    fn append_item(&mut self, id: NativeItemId, label: &str) -> NativeResult<()> {
        self.record.borrow_mut().entries.push(Entry::Item(ItemRecord {
            id,
            label: label.to_string(),
            indicator: Indicator::None,
            checked: false,
            enabled: true,
        }));
        Ok(())
    }

    fn append_submenu(&mut self, label: &str, submenu: &Self) -> NativeResult<()> {
        self.record.borrow_mut().entries.push(Entry::SubMenu {
            label: label.to_string(),
            menu: Rc::clone(&submenu.record),
        });
        Ok(())
    }

    fn append_separator(&mut self) -> NativeResult<()> {
        self.record.borrow_mut().entries.push(Entry::Separator);
        Ok(())
    }

    fn set_item_label(&mut self, id: NativeItemId, label: &str) -> NativeResult<()> {
        self.with_item("set_item_label", id, |item| item.label = label.to_string())
    }

    fn set_item_indicator(&mut self, id: NativeItemId, indicator: Indicator) -> NativeResult<()> {
        self.with_item("set_item_indicator", id, |item| item.indicator = indicator)
    }

    fn set_item_checked(&mut self, id: NativeItemId, checked: bool) -> NativeResult<()> {
        self.with_item("set_item_checked", id, |item| item.checked = checked)
    }

    fn set_item_enabled(&mut self, id: NativeItemId, enabled: bool) -> NativeResult<()> {
        self.with_item("set_item_enabled", id, |item| item.enabled = enabled)
    }

    fn clear(&mut self) -> NativeResult<()> {
        self.record.borrow_mut().entries.clear();
        Ok(())
    }

    fn show_popup(&mut self) -> NativeResult<()> {
        {
            let mut record = self.record.borrow_mut();
            record.outcome = None;
            record.popups_shown += 1;
        }
        self.state.present_popup(Rc::clone(&self.record));
        Ok(())
    }

    fn take_popup_outcome(&mut self) -> Option<PopupOutcome> {
        self.record.borrow_mut().outcome.take()
    }
}

#[derive(Default)]
pub struct HeadlessMenuBar {
    menus: Vec<(String, Rc<RefCell<MenuRecord>>)>,
}

impl HeadlessMenuBar {
    pub fn labels(&self) -> Vec<String> {
        self.menus.iter().map(|(label, _)| label.clone()).collect()
    }

    /// Native entries of the top-level menu at `index`.
    pub fn menu_entries(&self, index: usize) -> Option<Vec<MenuRecordEntry>> {
        self.menus
            .get(index)
            .map(|(_, menu)| menu.borrow().snapshot())
    }
}

impl NativeMenuBar for HeadlessMenuBar {
    type Menu = HeadlessMenu;

    fn append_menu(&mut self, label: &str, menu: &HeadlessMenu) -> NativeResult<()> {
        self.menus
            .push((label.to_string(), Rc::clone(&menu.record)));
        Ok(())
    }

    fn clear(&mut self) -> NativeResult<()> {
        self.menus.clear();
        Ok(())
    }
}
