//! Crop window geometry.
//!
//! The crop window is the fixed-aspect rectangle, in canvas space, that
//! represents the exported region. It is recomputed from scratch whenever
//! the drawing surface changes size: the box takes 85% of the constraining
//! axis (a 15% margin) and is centered on the surface.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Fraction of the constraining surface axis covered by the crop window.
pub const CROP_FILL: f64 = 0.85;

/// Aspect ratio source for the crop window, in export pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropAspect {
    pub width: u32,
    pub height: u32,
}

impl CropAspect {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width / height, or `None` when either side is zero.
    pub fn ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(self.width as f64 / self.height as f64)
    }
}

/// The crop window in canvas space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CropWindow {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropWindow {
    /// Lay out the crop window on a surface of the given size.
    ///
    /// A zero-sized surface or an aspect with a zero side produces a
    /// zero-sized window at the surface center.
    pub fn layout(surface_width: f64, surface_height: f64, aspect: CropAspect) -> Self {
        let surface_width = surface_width.max(0.0);
        let surface_height = surface_height.max(0.0);
        let center = Point::new(surface_width / 2.0, surface_height / 2.0);

        let Some(ratio) = aspect.ratio() else {
            return Self::collapsed_at(center);
        };

        let max_w = surface_width * CROP_FILL;
        let max_h = surface_height * CROP_FILL;

        let (width, height) = if max_w / ratio <= max_h {
            (max_w, max_w / ratio)
        } else {
            (max_h * ratio, max_h)
        };

        Self {
            x: (surface_width - width) / 2.0,
            y: (surface_height - height) / 2.0,
            width,
            height,
        }
    }

    fn collapsed_at(center: Point) -> Self {
        Self {
            x: center.x,
            y: center.y,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the window has no area (e.g. before the surface is sized).
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
