//! Native menu bars through `muda`.
//!
//! - [`build_menu_bar`] mirrors a [`MenuBar`] tree into a `muda::Menu`
//! - [`accelerator_for`] converts accelerator descriptors
//! - [`poll_activations`] drains muda's event channel into item ids, ready to
//!   be posted as [`NativeEvent::MenuActivated`](crate::NativeEvent::MenuActivated)
//!
//! macOS installs the result as the global application menu, Windows and
//! Linux attach it per window; that part stays with the host since it needs
//! raw window handles.

use crate::backend::{Backend, NativeItemId};
use crate::event::{DELETE, ESCAPE, Key, KeyboardEvent};
use crate::menu::{Indicator, Menu, MenuBar, MenuEntry};
use anyhow::{Context, Result};
use muda::accelerator::{Accelerator, Code, Modifiers};
use muda::{CheckMenuItem, MenuEvent, MenuId, MenuItem, PredefinedMenuItem, Submenu};

const ID_PREFIX: &str = "uniplat-";

/// The muda id of a menu item.
pub fn menu_id(id: NativeItemId) -> MenuId {
    MenuId::new(format!("{}{}", ID_PREFIX, id))
}

/// The item id behind a muda id, if it was built here.
pub fn item_id(id: &MenuId) -> Option<NativeItemId> {
    id.0.strip_prefix(ID_PREFIX)?.parse().ok()
}

/// Convert an accelerator descriptor. Control maps to Command on macOS.
pub fn accelerator_for(accel: &KeyboardEvent) -> Option<Accelerator> {
    #[cfg(target_os = "macos")]
    let cmd_or_ctrl = Modifiers::META;
    #[cfg(not(target_os = "macos"))]
    let cmd_or_ctrl = Modifiers::CONTROL;

    let mut mods = Modifiers::empty();
    if accel.control_down {
        mods |= cmd_or_ctrl;
    }
    if accel.shift_down {
        mods |= Modifiers::SHIFT;
    }

    let code = match accel.key {
        Key::Function(index) => function_code(index)?,
        Key::Character('>') => {
            mods |= Modifiers::SHIFT;
            Code::Period
        }
        Key::Character(chr) => char_code(chr)?,
    };
    Some(Accelerator::new((!mods.is_empty()).then_some(mods), code))
}

fn function_code(index: u8) -> Option<Code> {
    Some(match index {
        1 => Code::F1,
        2 => Code::F2,
        3 => Code::F3,
        4 => Code::F4,
        5 => Code::F5,
        6 => Code::F6,
        7 => Code::F7,
        8 => Code::F8,
        9 => Code::F9,
        10 => Code::F10,
        11 => Code::F11,
        12 => Code::F12,
        _ => return None,
    })
}

fn char_code(chr: char) -> Option<Code> {
    Some(match chr.to_ascii_lowercase() {
        'a' => Code::KeyA,
        'b' => Code::KeyB,
        'c' => Code::KeyC,
        'd' => Code::KeyD,
        'e' => Code::KeyE,
        'f' => Code::KeyF,
        'g' => Code::KeyG,
        'h' => Code::KeyH,
        'i' => Code::KeyI,
        'j' => Code::KeyJ,
        'k' => Code::KeyK,
        'l' => Code::KeyL,
        'm' => Code::KeyM,
        'n' => Code::KeyN,
        'o' => Code::KeyO,
        'p' => Code::KeyP,
        'q' => Code::KeyQ,
        'r' => Code::KeyR,
        's' => Code::KeyS,
        't' => Code::KeyT,
        'u' => Code::KeyU,
        'v' => Code::KeyV,
        'w' => Code::KeyW,
        'x' => Code::KeyX,
        'y' => Code::KeyY,
        'z' => Code::KeyZ,
        '0' => Code::Digit0,
        '1' => Code::Digit1,
        '2' => Code::Digit2,
        '3' => Code::Digit3,
        '4' => Code::Digit4,
        '5' => Code::Digit5,
        '6' => Code::Digit6,
        '7' => Code::Digit7,
        '8' => Code::Digit8,
        '9' => Code::Digit9,
        '\t' => Code::Tab,
        ' ' => Code::Space,
        '\r' => Code::Enter,
        '-' => Code::Minus,
        '=' => Code::Equal,
        ',' => Code::Comma,
        '.' => Code::Period,
        '/' => Code::Slash,
        ESCAPE => Code::Escape,
        DELETE => Code::Delete,
        _ => return None,
    })
}

/// Mirror `bar` into a new muda menu. Item state is copied as it is now;
/// rebuild after changing the tree.
pub fn build_menu_bar<B: Backend>(bar: &MenuBar<B>) -> Result<muda::Menu> {
    let root = muda::Menu::new();
    for (label, menu) in bar.menus() {
        let submenu = Submenu::new(&label, true);
        populate(&submenu, &menu)?;
        root.append(&submenu)
            .with_context(|| format!("Failed to append menu '{}'", label))?;
    }
    crate::debug_info!("MENU", "Built native menu bar with {} menus", bar.len());
    Ok(root)
}

fn populate<B: Backend>(target: &Submenu, menu: &Menu<B>) -> Result<()> {
    for entry in menu.entries() {
        match entry {
            MenuEntry::Item(item) => {
                let id = menu_id(item.id());
                let accel = item.accelerator().as_ref().and_then(accelerator_for);
                let label = item.label();
                let appended = if item.indicator() == Indicator::None {
                    target.append(&MenuItem::with_id(id, &label, item.is_enabled(), accel))
                } else {
                    target.append(&CheckMenuItem::with_id(
                        id,
                        &label,
                        item.is_enabled(),
                        item.is_active(),
                        accel,
                    ))
                };
                appended.with_context(|| format!("Failed to append item '{}'", label))?;
            }
            MenuEntry::SubMenu { label, menu } => {
                let nested = Submenu::new(&label, true);
                populate(&nested, &menu)?;
                target
                    .append(&nested)
                    .with_context(|| format!("Failed to append submenu '{}'", label))?;
            }
            MenuEntry::Separator => target.append(&PredefinedMenuItem::separator())?,
        }
    }
    Ok(())
}

/// Drain pending muda activations. Events for menus not built here are
/// skipped.
pub fn poll_activations() -> Vec<NativeItemId> {
    std::iter::from_fn(|| MenuEvent::receiver().try_recv().ok())
        .filter_map(|event| {
            let id = item_id(&event.id);
            if id.is_none() {
                log::debug!("Ignoring foreign menu event {:?}", event.id);
            }
            id
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_id_roundtrip() {
        assert_eq!(item_id(&menu_id(42)), Some(42));
        assert_eq!(item_id(&MenuId::new("other")), None);
        assert_eq!(item_id(&MenuId::new("uniplat-x")), None);
    }

    #[test]
    fn test_accelerator_for_control_shift_letter() {
        let accel = accelerator_for(&KeyboardEvent::character('s').with_control().with_shift());
        #[cfg(target_os = "macos")]
        let expected = Modifiers::META | Modifiers::SHIFT;
        #[cfg(not(target_os = "macos"))]
        let expected = Modifiers::CONTROL | Modifiers::SHIFT;
        assert_eq!(accel, Some(Accelerator::new(Some(expected), Code::KeyS)));
    }

    #[test]
    fn test_accelerator_for_function_and_unmappable() {
        assert_eq!(
            accelerator_for(&KeyboardEvent::function(5)),
            Some(Accelerator::new(None, Code::F5))
        );
        assert_eq!(accelerator_for(&KeyboardEvent::function(13)), None);
        assert_eq!(accelerator_for(&KeyboardEvent::character('é')), None);
    }

    #[test]
    fn test_accelerator_for_greater_than_uses_shifted_period() {
        assert_eq!(
            accelerator_for(&KeyboardEvent::character('>')),
            Some(Accelerator::new(Some(Modifiers::SHIFT), Code::Period))
        );
    }
}
