//! Headless windows.

use super::State;
use super::menu::HeadlessMenuBar;
use crate::backend::{NativeWindow, WindowEvent, WindowId};
use crate::error::NativeResult;
use crate::window::{Cursor, EditorGeometry, FontMetrics, Placement, Rect, ScrollAction, WindowKind};
use std::cell::{Ref, RefCell};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

/// Native state of the inline editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub geometry: EditorGeometry,
    pub font_height: f64,
    pub monospace: bool,
    pub text: String,
    /// Selected character range.
    pub selection: Option<Range<usize>>,
    pub focused: bool,
}

/// Native integer scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NativeScrollbar {
    pub min: i64,
    pub max: i64,
    pub page: i64,
    pub position: i64,
    pub visible: bool,
}

impl NativeScrollbar {
    fn clamp(&self, position: i64) -> i64 {
        position.min(self.max - self.page).max(self.min)
    }
}

pub(crate) struct WindowRecord {
    pub(crate) visible: bool,
    pub(crate) placement: Placement,
    pub(crate) destroyed: bool,
    kind: WindowKind,
    parent: Option<WindowId>,
    pixel_density: f64,
    full_screen: bool,
    title: String,
    represented_file: Option<PathBuf>,
    has_menu_bar: bool,
    menu_bar_labels: Vec<String>,
    min_content_size: (f64, f64),
    cursor: Cursor,
    tooltip: Option<String>,
    editor: Option<EditorState>,
    scrollbar: NativeScrollbar,
    invalidations: usize,
}

pub struct HeadlessWindow {
    state: Rc<State>,
    id: WindowId,
    record: Rc<RefCell<WindowRecord>>,
}

impl HeadlessWindow {
    pub(crate) fn new(
        state: Rc<State>,
        id: WindowId,
        kind: WindowKind,
        parent: Option<WindowId>,
    ) -> Self {
        let config = state.config();
        let record = WindowRecord {
            visible: false,
            placement: Placement::new(config.default_placement),
            destroyed: false,
            kind,
            parent,
            pixel_density: config.pixel_density,
            full_screen: false,
            title: String::new(),
            represented_file: None,
            has_menu_bar: false,
            menu_bar_labels: Vec::new(),
            min_content_size: (0.0, 0.0),
            cursor: Cursor::Pointer,
            tooltip: None,
            editor: None,
            scrollbar: NativeScrollbar::default(),
            invalidations: 0,
        };
        Self {
            state,
            id,
            record: Rc::new(RefCell::new(record)),
        }
    }

    pub(crate) fn downgrade_record(&self) -> Weak<RefCell<WindowRecord>> {
        Rc::downgrade(&self.record)
    }

    fn record(&self) -> Ref<'_, WindowRecord> {
        self.record.borrow()
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn kind(&self) -> WindowKind {
        self.record().kind
    }

    pub fn parent_id(&self) -> Option<WindowId> {
        self.record().parent
    }

    pub fn title(&self) -> String {
        self.record().title.clone()
    }

    pub fn represented_file(&self) -> Option<PathBuf> {
        self.record().represented_file.clone()
    }

    pub fn placement_rect(&self) -> Rect {
        self.record().placement.rect
    }

    pub fn is_native_full_screen(&self) -> bool {
        self.record().full_screen
    }

    pub fn has_menu_bar(&self) -> bool {
        self.record().has_menu_bar
    }

    /// Labels of the attached menu bar's top-level menus when it was set.
    pub fn menu_bar_labels(&self) -> Vec<String> {
        self.record().menu_bar_labels.clone()
    }

    pub fn min_content_size(&self) -> (f64, f64) {
        self.record().min_content_size
    }

    pub fn cursor(&self) -> Cursor {
        self.record().cursor
    }

    pub fn tooltip(&self) -> Option<String> {
        self.record().tooltip.clone()
    }

    pub fn editor(&self) -> Option<EditorState> {
        self.record().editor.clone()
    }

    pub fn scrollbar(&self) -> NativeScrollbar {
        self.record().scrollbar
    }

    /// Number of render requests received.
    pub fn invalidations(&self) -> usize {
        self.record().invalidations
    }

    pub fn is_destroyed(&self) -> bool {
        self.record().destroyed
    }

    // Simulated user and system actions

    /// Replace the editor content, as typing would.
    pub fn type_text(&self, text: &str) {
        if let Some(editor) = self.record.borrow_mut().editor.as_mut() {
            editor.text = text.to_string();
            editor.selection = None;
        }
    }

    /// Move the window to another display density.
    pub fn set_native_pixel_density(&self, density: f64) {
        self.record.borrow_mut().pixel_density = density;
    }

    /// Move or resize the window as the user would.
    pub fn move_to(&self, rect: Rect) {
        self.record.borrow_mut().placement.rect = rect;
    }

    /// Drag the scrollbar thumb to a native position and report it.
    pub fn drag_scrollbar(&self, position: i64) {
        let position = {
            let mut record = self.record.borrow_mut();
            let position = record.scrollbar.clamp(position);
            record.scrollbar.position = position;
            position
        };
        self.state
            .push_window_event(self.id, WindowEvent::Scrollbar(ScrollAction::Track(position)));
    }

    fn full_screen_rect(&self, rect: &Rect) -> Rect {
        let displays = &self.state.config().displays;
        crate::window::placement::nearest_display(rect, displays)
            .copied()
            .unwrap_or(*rect)
    }
}

impl NativeWindow for HeadlessWindow {
    type MenuBar = HeadlessMenuBar;

    fn pixel_density(&self) -> f64 {
        self.record().pixel_density
    }

    fn is_visible(&self) -> bool {
        self.record().visible
    }

    fn set_visible(&mut self, visible: bool) -> NativeResult<()> {
        self.record.borrow_mut().visible = visible;
        Ok(())
    }

    fn placement(&self) -> Placement {
        self.record().placement
    }

    fn set_placement(&mut self, placement: &Placement) -> NativeResult<()> {
        self.record.borrow_mut().placement = *placement;
        Ok(())
    }

    fn set_full_screen(&mut self, full_screen: bool) -> NativeResult<()> {
        let mut record = self.record.borrow_mut();
        record.full_screen = full_screen;
        if full_screen {
            record.placement = Placement::new(self.full_screen_rect(&record.placement.rect));
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> NativeResult<()> {
        self.record.borrow_mut().title = title.to_string();
        Ok(())
    }

    fn set_title_for_filename(&mut self, path: &Path) -> NativeResult<bool> {
        if !self.state.config().represents_files {
            return Ok(false);
        }
        let mut record = self.record.borrow_mut();
        record.represented_file = Some(path.to_path_buf());
        record.title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(true)
    }

    fn set_menu_bar(&mut self, menu_bar: Option<&HeadlessMenuBar>) -> NativeResult<()> {
        let mut record = self.record.borrow_mut();
        record.has_menu_bar = menu_bar.is_some();
        record.menu_bar_labels = menu_bar.map(HeadlessMenuBar::labels).unwrap_or_default();
        Ok(())
    }

    fn content_size(&self) -> (f64, f64) {
        let rect = self.record().placement.rect;
        (f64::from(rect.width()), f64::from(rect.height()))
    }

    fn set_min_content_size(&mut self, width: f64, height: f64) -> NativeResult<()> {
        self.record.borrow_mut().min_content_size = (width, height);
        Ok(())
    }

    fn set_cursor(&mut self, cursor: Cursor) -> NativeResult<()> {
        self.record.borrow_mut().cursor = cursor;
        Ok(())
    }

    fn set_tooltip(&mut self, text: Option<&str>) -> NativeResult<()> {
        self.record.borrow_mut().tooltip = text.map(str::to_string);
        Ok(())
    }

    fn font_metrics(&self, font_height: f64, monospace: bool) -> FontMetrics {
        FontMetrics {
            ascent: font_height * 0.75,
            descent: font_height * 0.25,
            average_char_width: char_width(font_height, monospace),
        }
    }

    fn measure_text(&self, text: &str, font_height: f64, monospace: bool) -> f64 {
        text.chars().count() as f64 * char_width(font_height, monospace)
    }

    fn show_editor(
        &mut self,
        geometry: &EditorGeometry,
        font_height: f64,
        monospace: bool,
        text: &str,
        select_all: bool,
    ) -> NativeResult<()> {
        self.record.borrow_mut().editor = Some(EditorState {
            geometry: *geometry,
            font_height,
            monospace,
            text: text.to_string(),
            selection: select_all.then(|| 0..text.chars().count()),
            focused: select_all,
        });
        Ok(())
    }

    fn hide_editor(&mut self) -> NativeResult<()> {
        self.record.borrow_mut().editor = None;
        Ok(())
    }

    fn editor_text(&self) -> String {
        self.record()
            .editor
            .as_ref()
            .map(|editor| editor.text.clone())
            .unwrap_or_default()
    }

    fn configure_scrollbar(&mut self, min: i64, max: i64, page: i64) -> NativeResult<()> {
        let mut record = self.record.borrow_mut();
        let scrollbar = &mut record.scrollbar;
        scrollbar.min = min;
        scrollbar.max = max;
        scrollbar.page = page;
        scrollbar.position = scrollbar.clamp(scrollbar.position);
        Ok(())
    }

    fn set_scrollbar_visible(&mut self, visible: bool) -> NativeResult<()> {
        self.record.borrow_mut().scrollbar.visible = visible;
        Ok(())
    }

    fn set_scrollbar_position(&mut self, position: i64) -> NativeResult<()> {
        let changed = {
            let mut record = self.record.borrow_mut();
            let position = record.scrollbar.clamp(position);
            let changed = record.scrollbar.position != position;
            record.scrollbar.position = position;
            changed.then_some(position)
        };
        if self.scrollbar_echoes_sets()
            && let Some(position) = changed
        {
            self.state
                .push_window_event(self.id, WindowEvent::Scrollbar(ScrollAction::Track(position)));
        }
        Ok(())
    }

    fn scrollbar_position(&self) -> i64 {
        self.record().scrollbar.position
    }

    fn scrollbar_echoes_sets(&self) -> bool {
        self.state.config().scrollbar_echoes_sets
    }

    fn invalidate(&mut self) -> NativeResult<()> {
        self.record.borrow_mut().invalidations += 1;
        self.state.push_window_event(self.id, WindowEvent::Render);
        Ok(())
    }

    fn destroy(&mut self) {
        let mut record = self.record.borrow_mut();
        record.destroyed = true;
        record.visible = false;
        record.editor = None;
    }
}

fn char_width(font_height: f64, monospace: bool) -> f64 {
    if monospace {
        font_height * 0.625
    } else {
        font_height * 0.5
    }
}
