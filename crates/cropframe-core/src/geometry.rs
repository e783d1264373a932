//! Small canvas-space geometry primitives shared by every component.

use serde::{Deserialize, Serialize};

/// A point in canvas (or image) space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An axis-aligned rectangle. Width and height are never negative.
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
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Smallest rectangle containing all of `points`.
    pub fn bounding(points: &[Point]) -> Rect {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        if points.is_empty() {
            return Rect::default();
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_and_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(6.0, 8.0);
        assert_eq!(a.midpoint(b), Point::new(3.0, 4.0));
        assert!((a.distance(b) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_rect_never_negative() {
        let r = Rect::new(5.0, 5.0, -3.0, -1.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
        assert!(r.is_empty());
    }

    #[test]
    fn test_bounding() {
        let r = Rect::bounding(&[
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(1.0, 1.0),
        ]);
        assert_eq!(r, Rect::new(-2.0, -1.0, 5.0, 5.0));
        assert_eq!(Rect::bounding(&[]), Rect::default());
    }

    #[test]
    fn test_contains_rect() {
        let outer = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(outer.contains_rect(&Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(!outer.contains_rect(&Rect::new(90.0, 10.0, 20.0, 20.0)));
    }
}
