//! Inline editor overlay and fixed-point scrollbar behavior.

mod common;

use common::Harness;
use std::cell::RefCell;
use std::rc::Rc;
use uniplat::backend::headless::HeadlessConfig;
use uniplat::event::ESCAPE;
use uniplat::input::{NativeKey, NativeModifiers, RawKeyEvent};
use uniplat::window::{EditorGeometry, SCROLLBAR_UNIT, ScrollAction};
use uniplat::{KeyboardEvent, WindowEvent};

fn key(chr: char) -> RawKeyEvent {
    RawKeyEvent::press(NativeKey::Character(chr), NativeModifiers::empty())
}

fn native(value: f64) -> i64 {
    (value * SCROLLBAR_UNIT).round() as i64
}

// ---- editor ----

#[test]
fn test_show_editor_geometry_over_baseline() {
    let harness = Harness::new();
    let window = harness.window();

    window.show_editor(10.0, 50.0, 20.0, 100.0, false, "hello");
    // ascent 15, line height 20, text 5 * 10 wide plus one average char
    let expected = EditorGeometry {
        x: 10.0,
        y: 35.0,
        width: 100.0,
        height: 20.0,
    };
    assert!(window.is_editor_visible());
    assert_eq!(window.editor_geometry(), Some(expected));

    let editor = window.native().editor().expect("native editor");
    assert_eq!(editor.geometry, expected);
    assert_eq!(editor.text, "hello");
    assert_eq!(editor.selection, Some(0..5));
    assert!(editor.focused);
}

#[test]
fn test_show_editor_grows_for_long_text() {
    let harness = Harness::new();
    let window = harness.window();

    window.show_editor(0.0, 20.0, 16.0, 40.0, true, "constraint");
    // monospace char is 10 wide: 10 chars plus one
    assert_eq!(window.editor_geometry().map(|geometry| geometry.width), Some(110.0));
}

#[test]
fn test_show_editor_with_empty_text_has_no_selection() {
    let harness = Harness::new();
    let window = harness.window();

    window.show_editor(0.0, 20.0, 16.0, 40.0, false, "");
    let editor = window.native().editor().expect("native editor");
    assert_eq!(editor.selection, None);
}

#[test]
fn test_show_editor_while_editing_is_ignored() {
    let harness = Harness::new();
    let window = harness.window();

    window.show_editor(10.0, 50.0, 20.0, 100.0, false, "first");
    window.native().type_text("typed");
    window.show_editor(300.0, 300.0, 20.0, 100.0, false, "second");

    assert_eq!(window.editor_geometry().map(|geometry| geometry.x), Some(10.0));
    assert_eq!(window.native().editor().map(|editor| editor.text), Some("typed".to_string()));
}

#[test]
fn test_enter_commits_editor_text() {
    let harness = Harness::new();
    let window = harness.window();
    let committed = Rc::new(RefCell::new(Vec::new()));
    {
        let committed = Rc::clone(&committed);
        window.on_editing_done(move |text| committed.borrow_mut().push(text.to_string()));
    }
    let keys = Rc::new(RefCell::new(Vec::new()));
    {
        let keys = Rc::clone(&keys);
        window.on_keyboard_event(move |event| {
            keys.borrow_mut().push(event);
            true
        });
    }

    window.show_editor(0.0, 20.0, 16.0, 40.0, false, "10");
    window.native().type_text("12.5");
    harness.backend.post_key(window.id(), key('5'));
    harness.backend.post_key(window.id(), key('\r'));
    harness.platform.run_until_idle();

    assert_eq!(*committed.borrow(), vec!["12.5".to_string()]);
    assert!(!window.is_editor_visible());
    assert!(window.native().editor().is_none());
    assert!(keys.borrow().is_empty(), "editor keys must not reach the window");

    // Keys reach the window again once the editor is gone
    harness.backend.post_key(window.id(), key('a'));
    harness.platform.run_until_idle();
    assert_eq!(*keys.borrow(), vec![KeyboardEvent::character('a')]);
}

#[test]
fn test_release_of_closing_key_stays_with_editor() {
    let harness = Harness::new();
    let window = harness.window();
    let keys = Rc::new(RefCell::new(Vec::new()));
    {
        let keys = Rc::clone(&keys);
        window.on_keyboard_event(move |event| {
            keys.borrow_mut().push(event);
            true
        });
    }

    window.show_editor(0.0, 20.0, 16.0, 40.0, false, "10");
    harness.backend.post_key(window.id(), key('\r'));
    harness.backend.post_key(
        window.id(),
        RawKeyEvent::release(NativeKey::Character('\r'), NativeModifiers::empty()),
    );
    harness.platform.run_until_idle();
    assert!(!window.is_editor_visible());
    assert!(keys.borrow().is_empty());

    // The next Enter is an ordinary key again
    harness.backend.post_key(window.id(), key('\r'));
    harness.platform.run_until_idle();
    assert_eq!(*keys.borrow(), vec![KeyboardEvent::character('\r')]);
}

#[test]
fn test_escape_cancels_editor() {
    let harness = Harness::new();
    let window = harness.window();
    let committed = Rc::new(RefCell::new(Vec::<String>::new()));
    {
        let committed = Rc::clone(&committed);
        window.on_editing_done(move |text| committed.borrow_mut().push(text.to_string()));
    }

    window.show_editor(0.0, 20.0, 16.0, 40.0, false, "10");
    harness.backend.post_key(window.id(), key(ESCAPE));
    harness.platform.run_until_idle();

    assert!(!window.is_editor_visible());
    assert!(committed.borrow().is_empty());
}

#[test]
fn test_show_editor_from_editing_done_is_ignored() {
    let harness = Harness::new();
    let window = harness.window();
    {
        let handle = window.clone();
        window.on_editing_done(move |text| {
            if text == "bad" {
                handle.show_editor(0.0, 20.0, 16.0, 40.0, false, "retry");
            }
        });
    }

    window.show_editor(0.0, 20.0, 16.0, 40.0, false, "bad");
    harness.backend.post_key(window.id(), key('\r'));
    harness.platform.run_until_idle();

    // The editor is still up while the callback runs, then the commit hides it
    assert!(!window.is_editor_visible());
}

#[test]
fn test_hide_editor_is_idempotent() {
    let harness = Harness::new();
    let window = harness.window();
    window.hide_editor();
    window.show_editor(0.0, 20.0, 16.0, 40.0, false, "x");
    window.hide_editor();
    window.hide_editor();
    assert!(!window.is_editor_visible());
}

// ---- scrollbar ----

fn scrolled_window(harness: &Harness) -> (common::TestWindow, Rc<RefCell<Vec<f64>>>) {
    let window = harness.window();
    let reports = Rc::new(RefCell::new(Vec::new()));
    {
        let reports = Rc::clone(&reports);
        window.on_scrollbar_adjusted(move |position| reports.borrow_mut().push(position));
    }
    window.configure_scrollbar(0.0, 100.0, 10.0);
    window.set_scrollbar_visible(true);
    (window, reports)
}

#[test]
fn test_scrollbar_range_is_scaled() {
    let harness = Harness::new();
    let (window, _) = scrolled_window(&harness);
    let bar = window.native().scrollbar();
    assert_eq!(bar.min, 0);
    assert_eq!(bar.max, native(100.0));
    assert_eq!(bar.page, native(10.0));
    assert!(bar.visible);
}

#[test]
fn test_set_position_clamps_and_reports_once() {
    let harness = Harness::new();
    let (window, reports) = scrolled_window(&harness);

    window.set_scrollbar_position(95.0);
    assert_eq!(window.scrollbar_position(), 90.0);
    assert_eq!(window.native().scrollbar().position, native(90.0));

    window.set_scrollbar_position(-4.0);
    assert_eq!(window.scrollbar_position(), 0.0);

    window.set_scrollbar_position(12.25);
    assert_eq!(window.scrollbar_position(), 12.25);

    harness.platform.run_until_idle();
    assert_eq!(*reports.borrow(), vec![90.0, 0.0, 12.25]);
}

#[test]
fn test_set_same_position_still_reports() {
    let harness = Harness::new();
    let (window, reports) = scrolled_window(&harness);
    window.set_scrollbar_position(30.0);
    window.set_scrollbar_position(30.0);
    assert_eq!(*reports.borrow(), vec![30.0, 30.0]);
}

#[test]
fn test_echoing_scrollbar_reports_once_per_set() {
    let harness = Harness::with_config(HeadlessConfig {
        scrollbar_echoes_sets: true,
        ..HeadlessConfig::default()
    });
    let (window, reports) = scrolled_window(&harness);

    window.set_scrollbar_position(50.0);
    assert_eq!(harness.backend.pending_events(), 1);
    harness.platform.run_until_idle();
    assert_eq!(*reports.borrow(), vec![50.0]);

    // A later user drag is reported normally
    window.native().drag_scrollbar(native(20.0));
    harness.platform.run_until_idle();
    assert_eq!(*reports.borrow(), vec![50.0, 20.0]);
}

#[test]
fn test_echoing_scrollbar_sets_before_pumping() {
    let harness = Harness::with_config(HeadlessConfig {
        scrollbar_echoes_sets: true,
        ..HeadlessConfig::default()
    });
    let (window, reports) = scrolled_window(&harness);

    window.set_scrollbar_position(30.0);
    window.set_scrollbar_position(60.0);
    assert_eq!(harness.backend.pending_events(), 2);

    for _ in 0..10 {
        harness.platform.run_until_idle();
    }
    assert_eq!(harness.backend.pending_events(), 0);
    assert_eq!(*reports.borrow(), vec![30.0, 60.0]);
    assert_eq!(window.scrollbar_position(), 60.0);
}

#[test]
fn test_echoing_scrollbar_user_action_reports_once() {
    let harness = Harness::with_config(HeadlessConfig {
        scrollbar_echoes_sets: true,
        ..HeadlessConfig::default()
    });
    let (window, reports) = scrolled_window(&harness);

    harness
        .backend
        .post_window_event(window.id(), WindowEvent::Scrollbar(ScrollAction::PageDown));
    harness.platform.run_until_idle();
    harness
        .backend
        .post_window_event(window.id(), WindowEvent::Scrollbar(ScrollAction::LineUp));
    harness.platform.run_until_idle();

    assert_eq!(harness.backend.pending_events(), 0);
    assert_eq!(*reports.borrow(), vec![10.0, 9.0]);
    assert_eq!(window.native().scrollbar().position, native(9.0));
}

#[test]
fn test_hidden_scrollbar_position_is_zero() {
    let harness = Harness::new();
    let (window, _) = scrolled_window(&harness);
    window.set_scrollbar_position(40.0);
    window.set_scrollbar_visible(false);
    assert!(!window.is_scrollbar_visible());
    assert_eq!(window.scrollbar_position(), 0.0);

    window.set_scrollbar_visible(true);
    assert_eq!(window.scrollbar_position(), 40.0);
}

#[test]
fn test_user_scroll_actions() {
    let harness = Harness::new();
    let (window, reports) = scrolled_window(&harness);
    window.set_scrollbar_position(50.0);
    reports.borrow_mut().clear();

    let post = |action| {
        harness
            .backend
            .post_window_event(window.id(), WindowEvent::Scrollbar(action));
        harness.platform.run_until_idle();
    };
    post(ScrollAction::LineDown);
    post(ScrollAction::PageUp);
    post(ScrollAction::Bottom);
    post(ScrollAction::PageDown);
    post(ScrollAction::Top);
    post(ScrollAction::LineUp);

    assert_eq!(*reports.borrow(), vec![51.0, 41.0, 90.0, 90.0, 0.0, 0.0]);
    assert_eq!(window.native().scrollbar().position, 0);
}

#[test]
fn test_reconfigure_clamps_native_position() {
    let harness = Harness::new();
    let (window, _) = scrolled_window(&harness);
    window.set_scrollbar_position(80.0);

    window.configure_scrollbar(0.0, 50.0, 10.0);
    assert_eq!(window.scrollbar_position(), 40.0);
}
