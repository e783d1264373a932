//! Software drawing surface backed by an `image::RgbaImage`.
//!
//! The surface is addressed in canvas coordinates. A [`Viewport`] maps the
//! canvas onto surface pixels: the identity for an on-screen frame, or the
//! crop window stretched over the whole raster for an export. Drawing is
//! done by inverse mapping each destination pixel center back into image
//! space and sampling there, so the export is exactly the on-screen frame
//! restricted to the crop window, just at a different resolution.

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

use super::Surface;
use crate::geometry::{Point, Rect};
use crate::handle::ImageHandle;
use crate::transform::{sample, InterpolationFilter, Transform};

/// Average glyph advance, as a fraction of the font size, used to measure
/// text when no font is available.
const FALLBACK_ADVANCE: f64 = 0.6;

/// Maps canvas coordinates to surface pixel coordinates:
/// `surface = (canvas - origin) * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin: Point,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

impl Viewport {
    pub fn identity() -> Self {
        Self {
            origin: Point::new(0.0, 0.0),
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Stretch the canvas rectangle `rect` over a `width x height` raster.
    pub fn fit_rect(rect: Rect, width: u32, height: u32) -> Self {
        Self {
            origin: Point::new(rect.x, rect.y),
            scale_x: width as f64 / rect.width,
            scale_y: height as f64 / rect.height,
        }
    }

    pub fn to_surface(&self, canvas: Point) -> Point {
        Point::new(
            (canvas.x - self.origin.x) * self.scale_x,
            (canvas.y - self.origin.y) * self.scale_y,
        )
    }

    pub fn to_canvas(&self, surface: Point) -> Point {
        Point::new(
            surface.x / self.scale_x + self.origin.x,
            surface.y / self.scale_y + self.origin.y,
        )
    }

    /// Scale used for text, which cannot be stretched anisotropically.
    fn text_scale(&self) -> f64 {
        (self.scale_x + self.scale_y) / 2.0
    }
}

/// An RGBA raster that implements [`Surface`].
pub struct RasterSurface {
    pixels: RgbaImage,
    viewport: Viewport,
    filter: InterpolationFilter,
    font: Option<FontArc>,
}

impl RasterSurface {
    /// A transparent surface with an identity viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            viewport: Viewport::identity(),
            filter: InterpolationFilter::Bilinear,
            font: None,
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_filter(mut self, filter: InterpolationFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_font(mut self, font: Option<FontArc>) -> Self {
        self.font = font;
        self
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Surface pixel range covered by a canvas rectangle, clipped.
    fn pixel_span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let min = self.viewport.to_surface(Point::new(rect.x, rect.y));
        let max = self.viewport.to_surface(Point::new(rect.right(), rect.bottom()));

        let x0 = min.x.min(max.x).floor().max(0.0);
        let y0 = min.y.min(max.y).floor().max(0.0);
        let x1 = min.x.max(max.x).ceil().min(self.width() as f64);
        let y1 = min.y.max(max.y).ceil().min(self.height() as f64);

        if !(x0 < x1 && y0 < y1) {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn blend(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let dst = self.pixels.get_pixel_mut(x, y);
        dst.0 = blend_over(dst.0, src);
    }
}

/// Source-over compositing of straight (non-premultiplied) RGBA.
fn blend_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = src[3] as f64 / 255.0;
    if sa >= 1.0 {
        return src;
    }
    if sa <= 0.0 {
        return dst;
    }

    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (src[i] as f64 * sa + dst[i] as f64 * da * (1.0 - sa)) / out_a;
        out[i] = c.clamp(0.0, 255.0).round() as u8;
    }
    out[3] = (out_a * 255.0).clamp(0.0, 255.0).round() as u8;
    out
}

impl Surface for RasterSurface {
    fn clear(&mut self) {
        for p in self.pixels.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
    }

    fn draw_image(&mut self, image: &ImageHandle, transform: &Transform) {
        let size = image.size();
        let Some((x0, y0, x1, y1)) = self.pixel_span(transform.canvas_bounds(size)) else {
            return;
        };

        for py in y0..y1 {
            for px in x0..x1 {
                let canvas = self
                    .viewport
                    .to_canvas(Point::new(px as f64 + 0.5, py as f64 + 0.5));
                let source = transform.to_image(canvas, size);
                if let Some(color) = sample(image.pixels(), source.x, source.y, self.filter) {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(rect) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                let canvas = self
                    .viewport
                    .to_canvas(Point::new(px as f64 + 0.5, py as f64 + 0.5));
                if canvas.x >= rect.x
                    && canvas.x < rect.right()
                    && canvas.y >= rect.y
                    && canvas.y < rect.bottom()
                {
                    self.blend(px, py, color.0);
                }
            }
        }
    }

    fn measure_text(&self, text: &str, font_size: f64) -> f64 {
        let Some(font) = &self.font else {
            return text.chars().count() as f64 * font_size * FALLBACK_ADVANCE;
        };

        let scaled = font.as_scaled(PxScale::from(font_size as f32));
        let mut width = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            let gid = font.glyph_id(ch);
            if let Some(prev_id) = prev {
                width += scaled.kern(prev_id, gid);
            }
            width += scaled.h_advance(gid);
            prev = Some(gid);
        }
        width as f64
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Rgba<u8>) {
        let Some(font) = self.font.clone() else {
            log::debug!("no font loaded, skipping caption glyphs");
            return;
        };

        let size = (font_size * self.viewport.text_scale()) as f32;
        let scaled = font.as_scaled(PxScale::from(size));
        let start = self.viewport.to_surface(origin);
        let baseline = start.y as f32 + scaled.ascent();

        let (width, height) = (self.width() as i64, self.height() as i64);
        let mut cursor = start.x as f32;
        let mut prev = None;
        for ch in text.chars() {
            let gid = font.glyph_id(ch);
            if let Some(prev_id) = prev {
                cursor += scaled.kern(prev_id, gid);
            }
            let glyph = gid.with_scale_and_position(PxScale::from(size), point(cursor, baseline));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let x = bounds.min.x as i64 + gx as i64;
                    let y = bounds.min.y as i64 + gy as i64;
                    if x < 0 || y < 0 || x >= width || y >= height || coverage <= 0.0 {
                        return;
                    }
                    let alpha = (coverage.min(1.0) * color.0[3] as f32).round() as u8;
                    let src = [color.0[0], color.0[1], color.0[2], alpha];
                    let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
                    dst.0 = blend_over(dst.0, src);
                });
            }
            cursor += scaled.h_advance(gid);
            prev = Some(gid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> ImageHandle {
        let pixels = rgba.repeat((width * height) as usize);
        ImageHandle::from_rgba(width, height, pixels).unwrap()
    }

    #[test]
    fn test_blend_over() {
        assert_eq!(blend_over([0, 0, 0, 0], [10, 20, 30, 255]), [10, 20, 30, 255]);
        assert_eq!(blend_over([10, 20, 30, 255], [0, 0, 0, 0]), [10, 20, 30, 255]);
        // Half-transparent black over opaque white.
        assert_eq!(blend_over([255, 255, 255, 255], [0, 0, 0, 128]), [127, 127, 127, 255]);
        // Half-transparent over transparent keeps the source color.
        assert_eq!(blend_over([0, 0, 0, 0], [200, 100, 50, 128]), [200, 100, 50, 128]);
    }

    #[test]
    fn test_viewport_round_trip() {
        let vp = Viewport::fit_rect(Rect::new(50.0, 25.0, 400.0, 300.0), 1200, 900);
        let canvas = Point::new(250.0, 100.0);
        let back = vp.to_canvas(vp.to_surface(canvas));
        assert!((back.x - canvas.x).abs() < 1e-9);
        assert!((back.y - canvas.y).abs() < 1e-9);
        assert_eq!(vp.to_surface(Point::new(50.0, 25.0)), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_draw_image_identity() {
        let mut surface = RasterSurface::new(20, 20);
        let image = solid(10, 10, [255, 0, 0, 255]);
        surface.draw_image(&image, &Transform::new(5.0, 5.0, 1.0, 0.0));

        assert_eq!(surface.pixels().get_pixel(4, 4).0, [0, 0, 0, 0]);
        assert_eq!(surface.pixels().get_pixel(5, 5).0, [255, 0, 0, 255]);
        assert_eq!(surface.pixels().get_pixel(14, 14).0, [255, 0, 0, 255]);
        assert_eq!(surface.pixels().get_pixel(15, 15).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_draw_image_offscreen_is_noop() {
        let mut surface = RasterSurface::new(10, 10);
        let image = solid(4, 4, [1, 2, 3, 255]);
        surface.draw_image(&image, &Transform::new(500.0, 500.0, 1.0, 0.0));
        assert!(surface.pixels().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut surface = RasterSurface::new(10, 10);
        surface.fill_rect(Rect::new(-5.0, 8.0, 100.0, 100.0), Rgba([9, 9, 9, 255]));
        assert_eq!(surface.pixels().get_pixel(0, 8).0, [9, 9, 9, 255]);
        assert_eq!(surface.pixels().get_pixel(9, 9).0, [9, 9, 9, 255]);
        assert_eq!(surface.pixels().get_pixel(0, 7).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_fill_rect_through_viewport() {
        // Canvas rect (10,10)-(20,20) on a 2x viewport lands on pixels 20..40.
        let vp = Viewport::fit_rect(Rect::new(0.0, 0.0, 50.0, 50.0), 100, 100);
        let mut surface = RasterSurface::new(100, 100).with_viewport(vp);
        surface.fill_rect(Rect::new(10.0, 10.0, 10.0, 10.0), Rgba([0, 0, 0, 255]));
        assert_eq!(surface.pixels().get_pixel(19, 19).0[3], 0);
        assert_eq!(surface.pixels().get_pixel(20, 20).0[3], 255);
        assert_eq!(surface.pixels().get_pixel(39, 39).0[3], 255);
        assert_eq!(surface.pixels().get_pixel(40, 40).0[3], 0);
    }

    #[test]
    fn test_fallback_text_measure() {
        let surface = RasterSurface::new(1, 1);
        assert!((surface.measure_text("abcd", 10.0) - 24.0).abs() < 1e-9);
        assert_eq!(surface.measure_text("", 10.0), 0.0);
    }

    #[test]
    fn test_fill_text_without_font_is_noop() {
        let mut surface = RasterSurface::new(20, 20);
        surface.fill_text("hi", Point::new(0.0, 0.0), 12.0, Rgba([255, 255, 255, 255]));
        assert!(surface.pixels().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_clear() {
        let mut surface = RasterSurface::new(3, 3);
        surface.fill_rect(Rect::new(0.0, 0.0, 3.0, 3.0), Rgba([1, 1, 1, 255]));
        surface.clear();
        assert!(surface.pixels().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }
}
