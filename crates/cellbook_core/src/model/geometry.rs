//! Container-relative geometry used by marquee selection.

use serde::{Deserialize, Serialize};

/// Point relative to the document container's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle with non-negative extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized rectangle spanning two corner points in any drag direction.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Area of the overlap with `other`; zero when disjoint.
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let overlap_x =
            ((self.x + self.width).min(other.x + other.width) - self.x.max(other.x)).max(0.0);
        let overlap_y =
            ((self.y + self.height).min(other.y + other.height) - self.y.max(other.y)).max(0.0);
        overlap_x * overlap_y
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect};

    #[test]
    fn from_corners_normalizes_reverse_drag() {
        let rect = Rect::from_corners(Point::new(10.0, 20.0), Point::new(4.0, 5.0));
        assert_eq!(rect, Rect::new(4.0, 5.0, 6.0, 15.0));
    }

    #[test]
    fn intersection_is_zero_for_disjoint_and_touching_rects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection_area(&Rect::new(20.0, 0.0, 5.0, 5.0)), 0.0);
        assert_eq!(a.intersection_area(&Rect::new(10.0, 0.0, 5.0, 5.0)), 0.0);
        assert_eq!(a.intersection_area(&Rect::new(5.0, 5.0, 10.0, 10.0)), 25.0);
    }
}
