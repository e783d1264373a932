//! Image placement on the canvas.
//!
//! A [`Transform`] places the loaded image on the canvas with a translation,
//! a uniform scale and a rotation. Every mutation here is pure arithmetic on
//! the transform; nothing touches pixels.
//!
//! # Composition Order
//!
//! An image-space point `p` maps to canvas space as:
//!
//! ```text
//! 1. translate the image center to the origin   (p - (w/2, h/2))
//! 2. rotate by rotation_degrees                 (clockwise on a y-down canvas)
//! 3. scale by scale
//! 4. translate to (x + w*scale/2, y + h*scale/2)
//! ```
//!
//! `(x, y)` is therefore the top-left corner of the unrotated, scaled image.

use serde::Serialize;

use super::crop_window::CropWindow;
use crate::geometry::{Point, Rect};

/// Smallest allowed scale factor.
pub const MIN_SCALE: f64 = 0.05;

/// Largest allowed scale factor.
pub const MAX_SCALE: f64 = 20.0;

/// Keyboard nudge step in canvas pixels.
pub const NUDGE_STEP: i32 = 1;

/// Placement of the image on the canvas.
///
/// `scale` is kept inside `[MIN_SCALE, MAX_SCALE]` by every constructor and
/// mutator, which is why it is only readable through [`Transform::scale`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    scale: f64,
    pub rotation_degrees: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation_degrees: 0.0,
        }
    }
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return MIN_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

impl Transform {
    pub fn new(x: f64, y: f64, scale: f64, rotation_degrees: f64) -> Self {
        Self {
            x,
            y,
            scale: clamp_scale(scale),
            rotation_degrees,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Cover-fit the image to the crop window with no rotation.
    ///
    /// The scale is the larger of the two axis ratios, so the scaled image
    /// covers the crop window and touches it on at least one axis. The
    /// image is centered on the crop window.
    pub fn fit_to_crop(image_size: (f64, f64), crop: &CropWindow) -> Self {
        let mut transform = Self::default();
        transform.refit(image_size, crop);
        transform
    }

    /// Re-apply the cover fit in place, keeping the current rotation.
    pub fn refit(&mut self, image_size: (f64, f64), crop: &CropWindow) {
        let (w, h) = image_size;
        if w <= 0.0 || h <= 0.0 {
            return;
        }

        self.scale = clamp_scale((crop.width / w).max(crop.height / h));
        self.x = crop.x + (crop.width - w * self.scale) / 2.0;
        self.y = crop.y + (crop.height - h * self.scale) / 2.0;
    }

    /// Translate by a canvas-space delta. Unconstrained.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Move the top-left corner to an absolute canvas position.
    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    /// Scale by `factor` keeping the canvas point `pivot` fixed over the
    /// same image content.
    ///
    /// The requested scale is clamped first and the position update uses the
    /// factor that was actually applied, so a saturated zoom does not drift.
    /// Non-positive or non-finite factors are ignored.
    pub fn zoom_about(&mut self, factor: f64, pivot: Point) {
        if !(factor.is_finite() && factor > 0.0) {
            log::debug!("ignoring zoom factor {factor}");
            return;
        }

        let new_scale = clamp_scale(self.scale * factor);
        let real_factor = new_scale / self.scale;
        self.x = pivot.x - (pivot.x - self.x) * real_factor;
        self.y = pivot.y - (pivot.y - self.y) * real_factor;
        self.scale = new_scale;
    }

    /// Additive rotation, unbounded.
    pub fn rotate_by(&mut self, delta_degrees: f64) {
        self.rotation_degrees += delta_degrees;
    }

    /// Whole-pixel pan used for fine keyboard adjustment.
    pub fn nudge(&mut self, dx: i32, dy: i32) {
        self.pan(dx as f64, dy as f64);
    }

    /// Canvas position of the image center.
    pub fn image_center(&self, image_size: (f64, f64)) -> Point {
        Point::new(
            self.x + image_size.0 * self.scale / 2.0,
            self.y + image_size.1 * self.scale / 2.0,
        )
    }

    /// Map an image-space point to canvas space.
    pub fn to_canvas(&self, point: Point, image_size: (f64, f64)) -> Point {
        let (w, h) = image_size;
        let (sin, cos) = self.rotation_degrees.to_radians().sin_cos();

        let u = point.x - w / 2.0;
        let v = point.y - h / 2.0;
        let ru = u * cos - v * sin;
        let rv = u * sin + v * cos;

        let center = self.image_center(image_size);
        Point::new(center.x + ru * self.scale, center.y + rv * self.scale)
    }

    /// Map a canvas-space point back to image space (exact inverse of
    /// [`Transform::to_canvas`]).
    pub fn to_image(&self, point: Point, image_size: (f64, f64)) -> Point {
        let (w, h) = image_size;
        let (sin, cos) = self.rotation_degrees.to_radians().sin_cos();
        let center = self.image_center(image_size);

        let du = (point.x - center.x) / self.scale;
        let dv = (point.y - center.y) / self.scale;
        let u = du * cos + dv * sin;
        let v = -du * sin + dv * cos;

        Point::new(u + w / 2.0, v + h / 2.0)
    }

    /// Axis-aligned canvas bounds of the placed (possibly rotated) image.
    pub fn canvas_bounds(&self, image_size: (f64, f64)) -> Rect {
        let (w, h) = image_size;
        let corners = [
            self.to_canvas(Point::new(0.0, 0.0), image_size),
            self.to_canvas(Point::new(w, 0.0), image_size),
            self.to_canvas(Point::new(0.0, h), image_size),
            self.to_canvas(Point::new(w, h), image_size),
        ];
        Rect::bounding(&corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn crop(x: f64, y: f64, width: f64, height: f64) -> CropWindow {
        CropWindow {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_fit_matching_aspect() {
        // 800x600 image into a 400x300 window: exact half scale, no letterbox.
        let c = crop(50.0, 25.0, 400.0, 300.0);
        let t = Transform::fit_to_crop((800.0, 600.0), &c);
        assert!((t.scale() - 0.5).abs() < EPS);
        assert!((t.x - 50.0).abs() < EPS);
        assert!((t.y - 25.0).abs() < EPS);
        assert_eq!(t.rotation_degrees, 0.0);
    }

    #[test]
    fn test_fit_is_cover_not_contain() {
        // Tall image into a wide window: width drives the scale.
        let c = crop(0.0, 0.0, 400.0, 200.0);
        let t = Transform::fit_to_crop((100.0, 300.0), &c);
        assert!((t.scale() - 4.0).abs() < EPS);
        assert!(300.0 * t.scale() >= 200.0);
        let center = t.image_center((100.0, 300.0));
        assert!((center.x - 200.0).abs() < EPS);
        assert!((center.y - 100.0).abs() < EPS);
    }

    #[test]
    fn test_fit_zero_window_clamps_scale() {
        let c = crop(10.0, 10.0, 0.0, 0.0);
        let t = Transform::fit_to_crop((800.0, 600.0), &c);
        assert_eq!(t.scale(), MIN_SCALE);
    }

    #[test]
    fn test_refit_keeps_rotation() {
        let c = crop(0.0, 0.0, 400.0, 300.0);
        let mut t = Transform::new(123.0, -40.0, 3.0, 12.0);
        t.refit((800.0, 600.0), &c);
        assert!((t.scale() - 0.5).abs() < EPS);
        assert_eq!(t.rotation_degrees, 12.0);
    }

    #[test]
    fn test_zoom_about_scenario() {
        let mut t = Transform::default();
        t.zoom_about(2.0, Point::new(200.0, 150.0));
        assert!((t.scale() - 2.0).abs() < EPS);
        assert!((t.x + 200.0).abs() < EPS);
        assert!((t.y + 150.0).abs() < EPS);
    }

    #[test]
    fn test_zoom_saturates_at_max() {
        let mut t = Transform::default();
        for _ in 0..1000 {
            t.zoom_about(1.5, Point::new(10.0, 10.0));
        }
        assert_eq!(t.scale(), MAX_SCALE);
    }

    #[test]
    fn test_zoom_saturates_at_min() {
        let mut t = Transform::default();
        for _ in 0..1000 {
            t.zoom_about(0.5, Point::new(10.0, 10.0));
        }
        assert_eq!(t.scale(), MIN_SCALE);
    }

    #[test]
    fn test_saturated_zoom_does_not_move() {
        let mut t = Transform::new(30.0, 40.0, MAX_SCALE, 0.0);
        t.zoom_about(2.0, Point::new(500.0, 500.0));
        assert!((t.x - 30.0).abs() < EPS);
        assert!((t.y - 40.0).abs() < EPS);
    }

    #[test]
    fn test_invalid_zoom_factor_ignored() {
        let mut t = Transform::new(1.0, 2.0, 1.5, 0.0);
        let before = t;
        t.zoom_about(0.0, Point::new(0.0, 0.0));
        t.zoom_about(-2.0, Point::new(0.0, 0.0));
        t.zoom_about(f64::NAN, Point::new(0.0, 0.0));
        t.zoom_about(f64::INFINITY, Point::new(0.0, 0.0));
        assert_eq!(t, before);
    }

    #[test]
    fn test_pan_nudge_rotate() {
        let mut t = Transform::default();
        t.pan(5.5, -2.0);
        t.nudge(-1, 3);
        t.rotate_by(370.0);
        t.rotate_by(-10.0);
        assert!((t.x - 4.5).abs() < EPS);
        assert!((t.y - 1.0).abs() < EPS);
        assert!((t.rotation_degrees - 360.0).abs() < EPS);
    }

    #[test]
    fn test_new_clamps_scale() {
        assert_eq!(Transform::new(0.0, 0.0, 100.0, 0.0).scale(), MAX_SCALE);
        assert_eq!(Transform::new(0.0, 0.0, 0.0, 0.0).scale(), MIN_SCALE);
        assert_eq!(Transform::new(0.0, 0.0, f64::NAN, 0.0).scale(), MIN_SCALE);
    }

    #[test]
    fn test_to_canvas_unrotated() {
        let t = Transform::new(10.0, 20.0, 2.0, 0.0);
        let p = t.to_canvas(Point::new(0.0, 0.0), (100.0, 50.0));
        assert!((p.x - 10.0).abs() < EPS);
        assert!((p.y - 20.0).abs() < EPS);
        let p = t.to_canvas(Point::new(100.0, 50.0), (100.0, 50.0));
        assert!((p.x - 210.0).abs() < EPS);
        assert!((p.y - 120.0).abs() < EPS);
    }

    #[test]
    fn test_rotation_is_about_center() {
        let size = (100.0, 50.0);
        let t = Transform::new(0.0, 0.0, 1.0, 90.0);
        let center = t.to_canvas(Point::new(50.0, 25.0), size);
        assert!((center.x - 50.0).abs() < EPS);
        assert!((center.y - 25.0).abs() < EPS);

        // Clockwise on a y-down canvas: the right edge midpoint moves below center.
        let right = t.to_canvas(Point::new(100.0, 25.0), size);
        assert!((right.x - 50.0).abs() < EPS);
        assert!((right.y - 75.0).abs() < EPS);
    }

    #[test]
    fn test_to_image_inverts_to_canvas() {
        let size = (640.0, 480.0);
        let t = Transform::new(-37.0, 12.5, 1.7, 33.0);
        let p = Point::new(123.0, 456.0);
        let back = t.to_image(t.to_canvas(p, size), size);
        assert!((back.x - p.x).abs() < 1e-6);
        assert!((back.y - p.y).abs() < 1e-6);
    }

    #[test]
    fn test_canvas_bounds_rotated_square() {
        let t = Transform::new(0.0, 0.0, 1.0, 45.0);
        let bounds = t.canvas_bounds((100.0, 100.0));
        let diagonal = 100.0 * 2f64.sqrt();
        assert!((bounds.width - diagonal).abs() < 1e-6);
        assert!((bounds.height - diagonal).abs() < 1e-6);
    }

    #[test]
    fn test_serializes_camel_case() {
        let t = Transform::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0,"scale":3.0,"rotationDegrees":4.0}"#);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn transform_strategy() -> impl Strategy<Value = Transform> {
        (
            -2000.0f64..2000.0,
            -2000.0f64..2000.0,
            MIN_SCALE..MAX_SCALE,
            -720.0f64..720.0,
        )
            .prop_map(|(x, y, scale, rotation)| Transform::new(x, y, scale, rotation))
    }

    proptest! {
        /// Property: the image point under the pivot stays under the pivot.
        #[test]
        fn prop_zoom_is_pivot_invariant(
            mut t in transform_strategy(),
            factor in 0.01f64..50.0,
            (px, py) in (-1000.0f64..1000.0, -1000.0f64..1000.0),
            (w, h) in (1.0f64..5000.0, 1.0f64..5000.0),
        ) {
            let size = (w, h);
            let pivot = Point::new(px, py);
            let before = t.to_image(pivot, size);
            t.zoom_about(factor, pivot);
            let after = t.to_canvas(before, size);

            prop_assert!((after.x - pivot.x).abs() < 1e-6, "x drifted: {} vs {}", after.x, pivot.x);
            prop_assert!((after.y - pivot.y).abs() < 1e-6, "y drifted: {} vs {}", after.y, pivot.y);
        }

        /// Property: any sequence of zooms keeps the scale in bounds.
        #[test]
        fn prop_scale_always_clamped(
            factors in prop::collection::vec(0.001f64..1000.0, 1..200),
        ) {
            let mut t = Transform::default();
            for factor in factors {
                t.zoom_about(factor, Point::new(100.0, 100.0));
                prop_assert!(t.scale() >= MIN_SCALE);
                prop_assert!(t.scale() <= MAX_SCALE);
            }
        }

        /// Property: the fit covers the crop window, touches one axis and is centered.
        #[test]
        fn prop_fit_covers_and_centers(
            (w, h) in (10.0f64..4000.0, 10.0f64..4000.0),
            (cx, cy) in (-500.0f64..500.0, -500.0f64..500.0),
            (cw, ch) in (20.0f64..1500.0, 20.0f64..1500.0),
        ) {
            let crop = CropWindow { x: cx, y: cy, width: cw, height: ch };
            let t = Transform::fit_to_crop((w, h), &crop);
            let cover = (cw / w).max(ch / h);
            prop_assume!((MIN_SCALE..=MAX_SCALE).contains(&cover));

            let sw = w * t.scale();
            let sh = h * t.scale();
            prop_assert!(sw >= cw - 1e-6);
            prop_assert!(sh >= ch - 1e-6);
            prop_assert!((sw - cw).abs() < 1e-6 || (sh - ch).abs() < 1e-6);

            let center = t.image_center((w, h));
            prop_assert!((center.x - (cx + cw / 2.0)).abs() < 1e-6);
            prop_assert!((center.y - (cy + ch / 2.0)).abs() < 1e-6);
        }

        /// Property: to_image is the inverse of to_canvas.
        #[test]
        fn prop_mapping_round_trips(
            t in transform_strategy(),
            (px, py) in (0.0f64..1000.0, 0.0f64..1000.0),
        ) {
            let size = (1000.0, 1000.0);
            let p = Point::new(px, py);
            let back = t.to_image(t.to_canvas(p, size), size);
            prop_assert!((back.x - p.x).abs() < 1e-6);
            prop_assert!((back.y - p.y).abs() < 1e-6);
        }
    }
}
