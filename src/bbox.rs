//! Viewport bounding box in lon/lat coordinates.

use serde::{Deserialize, Serialize};

/// Axis-aligned viewport rectangle with inclusive bounds on both axes.
///
/// Coordinates follow the map convention: x is longitude (increasing east),
/// y is latitude (increasing north).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Inclusive containment on both axes.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.min_lon <= x && x <= self.max_lon && self.min_lat <= y && y <= self.max_lat
    }

    /// A box with zero width or height still splits into 9 well-defined
    /// (zero-area) cells; callers may want to know before aggregating.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_width_height() {
        let bbox = BoundingBox::new(-122.5, 47.2, -122.0, 47.8);
        assert_abs_diff_eq!(bbox.width(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(bbox.height(), 0.6, epsilon = 1e-12);
        assert!(!bbox.is_degenerate());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 6.0);
        assert!(bbox.contains(0.0, 0.0));
        assert!(bbox.contains(10.0, 6.0));
        assert!(bbox.contains(5.0, 3.0));
        assert!(!bbox.contains(10.0001, 3.0));
        assert!(!bbox.contains(5.0, -0.0001));
    }

    #[test]
    fn test_degenerate_box() {
        let flat = BoundingBox::new(0.0, 2.0, 10.0, 2.0);
        assert!(flat.is_degenerate());
        assert_eq!(flat.height(), 0.0);
        // the corner line is still inside
        assert!(flat.contains(3.0, 2.0));
        assert!(!flat.contains(3.0, 2.1));
    }
}
