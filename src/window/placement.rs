//! Window placement persistence and display clamping.
//!
//! Freeze writes a window's normal-mode placement into the settings store
//! under `<key>_left`, `<key>_top`, `<key>_maximized` and either
//! `<key>_right`/`<key>_bottom` or `<key>_width`/`<key>_height`, depending on
//! the backend's [`PlacementLayout`]. Thaw reads them back, using the
//! window's current placement for missing entries, and clamps the result to
//! the display nearest to the stored rectangle.

use crate::backend::PlacementLayout;
use uniplat_config::{Setting, SettingsStore};

/// Screen rectangle with exclusive right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= f64::from(self.left)
            && x < f64::from(self.right)
            && y >= f64::from(self.top)
            && y < f64::from(self.bottom)
    }

    /// Area shared with `other`, zero when disjoint.
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let width = i64::from(self.right.min(other.right)) - i64::from(self.left.max(other.left));
        let height =
            i64::from(self.bottom.min(other.bottom)) - i64::from(self.top.max(other.top));
        if width > 0 && height > 0 {
            width * height
        } else {
            0
        }
    }

    /// Squared length of the shortest gap to `other`, zero when touching.
    pub fn distance_squared(&self, other: &Rect) -> i64 {
        let gap = |a_start: i32, a_end: i32, b_start: i32, b_end: i32| -> i64 {
            if a_end < b_start {
                i64::from(b_start) - i64::from(a_end)
            } else if b_end < a_start {
                i64::from(a_start) - i64::from(b_end)
            } else {
                0
            }
        };
        let dx = gap(self.left, self.right, other.left, other.right);
        let dy = gap(self.top, self.bottom, other.top, other.bottom);
        dx * dx + dy * dy
    }

    /// Clamp each edge into `bounds` independently.
    pub fn clamped_into(&self, bounds: &Rect) -> Rect {
        let clamp_x = |x: i32| x.clamp(bounds.left, bounds.right);
        let clamp_y = |y: i32| y.clamp(bounds.top, bounds.bottom);
        Rect::new(
            clamp_x(self.left),
            clamp_y(self.top),
            clamp_x(self.right),
            clamp_y(self.bottom),
        )
    }
}

/// Normal-mode placement of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Placement {
    pub rect: Rect,
    pub maximized: bool,
}

impl Placement {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            maximized: false,
        }
    }
}

/// The display overlapping `rect` the most, or, when none overlaps, the one
/// closest to it.
pub fn nearest_display<'a>(rect: &Rect, displays: &'a [Rect]) -> Option<&'a Rect> {
    let overlapping = displays
        .iter()
        .map(|display| (display, rect.intersection_area(display)))
        .filter(|(_, area)| *area > 0)
        .max_by_key(|(_, area)| *area)
        .map(|(display, _)| display);

    overlapping.or_else(|| {
        displays
            .iter()
            .min_by_key(|display| rect.distance_squared(display))
    })
}

/// Clamp `placement` into the display nearest to it. Without displays the
/// placement is returned unchanged.
pub fn clamp_to_displays(placement: &Placement, displays: &[Rect]) -> Placement {
    match nearest_display(&placement.rect, displays) {
        Some(display) => Placement {
            rect: placement.rect.clamped_into(display),
            maximized: placement.maximized,
        },
        None => *placement,
    }
}

fn setting_key(key: &str, field: &str) -> String {
    format!("{}_{}", key, field)
}

pub(crate) fn freeze(
    settings: &dyn SettingsStore,
    key: &str,
    placement: &Placement,
    layout: PlacementLayout,
) {
    let rect = &placement.rect;
    let (far_x, far_y) = match layout {
        PlacementLayout::Corners => (("right", rect.right), ("bottom", rect.bottom)),
        PlacementLayout::Extent => (("width", rect.width()), ("height", rect.height())),
    };
    let mut entries: Vec<(String, Setting)> =
        [("left", rect.left), ("top", rect.top), far_x, far_y]
            .into_iter()
            .map(|(field, value)| (setting_key(key, field), Setting::Int(i64::from(value))))
            .collect();
    entries.push((
        setting_key(key, "maximized"),
        Setting::Int(i64::from(placement.maximized)),
    ));
    settings.freeze_all(entries);
}

pub(crate) fn thaw(
    settings: &dyn SettingsStore,
    key: &str,
    current: &Placement,
    layout: PlacementLayout,
) -> Placement {
    let read = |field: &str, default: i32| -> i32 {
        let value = settings.thaw_int(&setting_key(key, field), i64::from(default));
        value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    };

    let left = read("left", current.rect.left);
    let top = read("top", current.rect.top);
    let rect = match layout {
        PlacementLayout::Corners => Rect::new(
            left,
            top,
            read("right", current.rect.right),
            read("bottom", current.rect.bottom),
        ),
        PlacementLayout::Extent => Rect::from_origin_size(
            left,
            top,
            read("width", current.rect.width()),
            read("height", current.rect.height()),
        ),
    };

    Placement {
        rect,
        maximized: settings.thaw_bool(&setting_key(key, "maximized"), current.maximized),
    }
}
