//! Inline editor overlay geometry.

/// Font measurements used to place the editor over a text baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascent: f64,
    pub descent: f64,
    pub average_char_width: f64,
}

impl FontMetrics {
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// Editor box in window-content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl EditorGeometry {
    /// Box for text whose baseline starts at (`x`, `baseline`).
    ///
    /// One extra average character of width keeps the native widget from
    /// scrolling its content while the initial text is shown.
    pub fn for_baseline(
        x: f64,
        baseline: f64,
        min_width: f64,
        metrics: &FontMetrics,
        text_width: f64,
    ) -> Self {
        Self {
            x,
            y: baseline - metrics.ascent,
            width: min_width.max(text_width + metrics.average_char_width),
            height: metrics.line_height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: FontMetrics = FontMetrics {
        ascent: 12.0,
        descent: 4.0,
        average_char_width: 8.0,
    };

    #[test]
    fn test_box_hangs_from_baseline() {
        let geometry = EditorGeometry::for_baseline(10.0, 50.0, 0.0, &METRICS, 40.0);
        assert_eq!(geometry.x, 10.0);
        assert_eq!(geometry.y, 38.0);
        assert_eq!(geometry.height, 16.0);
        assert_eq!(geometry.width, 48.0);
    }

    #[test]
    fn test_min_width_wins_for_short_text() {
        let geometry = EditorGeometry::for_baseline(0.0, 20.0, 100.0, &METRICS, 16.0);
        assert_eq!(geometry.width, 100.0);
    }
}
