//! Scale factors derived from device pixel density.
//!
//! All three window queries derive from one density value so they never
//! disagree.

/// Unrounded ratio of `density` to `reference_dpi`, for vector and font
/// scaling.
pub fn fractional(density: f64, reference_dpi: f64) -> f64 {
    density / reference_dpi
}

/// Whole-number ratio for raster asset selection; never below 1.
pub fn integral(density: f64, reference_dpi: f64) -> i32 {
    (fractional(density, reference_dpi).floor() as i32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_density() {
        assert_eq!(fractional(96.0, 96.0), 1.0);
        assert_eq!(integral(96.0, 96.0), 1);
    }

    #[test]
    fn test_high_density_floors() {
        assert_eq!(fractional(144.0, 96.0), 1.5);
        assert_eq!(integral(144.0, 96.0), 1);
        assert_eq!(integral(192.0, 96.0), 2);
        assert_eq!(integral(287.0, 96.0), 2);
    }

    #[test]
    fn test_low_density_stays_at_one() {
        assert_eq!(integral(72.0, 96.0), 1);
    }
}
