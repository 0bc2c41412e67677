#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// A rectangle in layout units, used for treemap tiles and container bounds.
///
/// Uses screen coordinates (origin at top-left, y growing downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectF {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in layout units.
    pub width: f64,
    /// Height in layout units.
    pub height: f64,
}

impl RectF {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area in layout units squared.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check if the rectangle has no positive extent.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check that all four components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check whether the interiors of two rectangles overlap.
    ///
    /// Shared edges do not count as overlap.
    #[inline]
    pub fn overlaps(&self, other: &RectF) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::RectF;

    #[test]
    fn rect_edges_and_area() {
        let r = RectF::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.area(), 1200.0);
    }

    #[test]
    fn rect_is_empty() {
        assert!(RectF::new(0.0, 0.0, 0.0, 10.0).is_empty());
        assert!(RectF::new(0.0, 0.0, 10.0, -1.0).is_empty());
        assert!(!RectF::new(0.0, 0.0, 0.5, 0.5).is_empty());
    }

    #[test]
    fn rect_is_finite_rejects_nan_and_inf() {
        assert!(RectF::new(0.0, 0.0, 1.0, 1.0).is_finite());
        assert!(!RectF::new(f64::NAN, 0.0, 1.0, 1.0).is_finite());
        assert!(!RectF::new(0.0, 0.0, f64::INFINITY, 1.0).is_finite());
    }

    #[test]
    fn rect_contains_boundary() {
        let r = RectF::from_size(5.0, 5.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(4.9, 4.9));
        // Right/bottom edges are exclusive.
        assert!(!r.contains(5.0, 0.0));
        assert!(!r.contains(0.0, 5.0));
    }

    #[test]
    fn rect_overlaps_excludes_shared_edge() {
        let a = RectF::new(0.0, 0.0, 100.0, 100.0);
        let b = RectF::new(100.0, 0.0, 100.0, 100.0);
        assert!(!a.overlaps(&b));

        let c = RectF::new(99.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }
}
