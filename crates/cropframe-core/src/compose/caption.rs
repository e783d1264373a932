//! Credit caption text and placement.
//!
//! The caption is a single line of white text on a half-transparent dark
//! box tucked into the bottom-right corner of the crop window. Its font size
//! follows the crop window height so it reads the same at any surface size.

use image::Rgba;
use serde::Serialize;

use crate::geometry::{Point, Rect};
use crate::transform::CropWindow;

/// Inset from the crop window edges and inner padding around the text.
pub const CAPTION_PADDING: f64 = 8.0;

/// Smallest caption font size, in canvas pixels.
pub const MIN_CAPTION_FONT_SIZE: f64 = 12.0;

/// Caption font size as a fraction of the crop window height.
pub const CAPTION_FONT_RATIO: f64 = 0.03;

pub const CAPTION_BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 128]);
pub const CAPTION_TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Caption text. Empty means no caption is drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Caption {
    text: String,
}

impl Caption {
    /// No caption.
    pub fn none() -> Self {
        Self::default()
    }

    /// Compose a photo credit. A blank contributor yields no caption.
    ///
    /// ```text
    /// Photo: <contributor> / <licence> (modified)
    /// ```
    pub fn credit(contributor: &str, licence: &str) -> Self {
        let contributor = contributor.trim();
        if contributor.is_empty() {
            return Self::none();
        }
        Self {
            text: format!("Photo: {} / {} (modified)", contributor, licence.trim()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Where the caption box and its text go, in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionLayout {
    pub font_size: f64,
    pub background: Rect,
    /// Top-left of the text run (text is drawn with a top baseline).
    pub text_origin: Point,
}

impl CaptionLayout {
    /// `max(12, round(crop.height * 0.03))`.
    pub fn font_size_for(crop: &CropWindow) -> f64 {
        (crop.height * CAPTION_FONT_RATIO)
            .round()
            .max(MIN_CAPTION_FONT_SIZE)
    }

    /// Lay out a caption whose text measures `text_width` at `font_size`.
    ///
    /// The box's right and bottom edges sit `CAPTION_PADDING` inside the
    /// crop window's right and bottom edges.
    pub fn compute(crop: &CropWindow, font_size: f64, text_width: f64) -> Self {
        let width = text_width + CAPTION_PADDING * 2.0;
        let height = font_size + CAPTION_PADDING * 2.0;
        let x = crop.right() - CAPTION_PADDING - width;
        let y = crop.bottom() - CAPTION_PADDING - height;

        Self {
            font_size,
            background: Rect::new(x, y, width, height),
            text_origin: Point::new(x + CAPTION_PADDING, y + CAPTION_PADDING),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crop(height: f64) -> CropWindow {
        CropWindow {
            x: 100.0,
            y: 50.0,
            width: height * 2.0,
            height,
        }
    }

    #[test]
    fn test_credit_text() {
        let caption = Caption::credit("  Alice ", "CC-BY");
        assert_eq!(caption.text(), "Photo: Alice / CC-BY (modified)");
        assert!(!caption.is_empty());
    }

    #[test]
    fn test_blank_contributor_is_no_caption() {
        assert!(Caption::credit("   ", "CC-BY").is_empty());
        assert!(Caption::credit("", "CC0").is_empty());
        assert_eq!(Caption::none(), Caption::default());
    }

    #[test]
    fn test_font_size_minimum() {
        assert_eq!(CaptionLayout::font_size_for(&crop(100.0)), 12.0);
        assert_eq!(CaptionLayout::font_size_for(&crop(0.0)), 12.0);
    }

    #[test]
    fn test_font_size_scales_with_crop() {
        // 0.03 * 850 = 25.5 -> 26
        assert_eq!(CaptionLayout::font_size_for(&crop(850.0)), 26.0);
        assert_eq!(CaptionLayout::font_size_for(&crop(1000.0)), 30.0);
    }

    #[test]
    fn test_layout_inset_bottom_right() {
        let c = crop(300.0);
        let layout = CaptionLayout::compute(&c, 12.0, 180.0);

        assert_eq!(layout.background.width, 196.0);
        assert_eq!(layout.background.height, 28.0);
        assert_eq!(layout.background.right(), c.right() - CAPTION_PADDING);
        assert_eq!(layout.background.bottom(), c.bottom() - CAPTION_PADDING);
        assert_eq!(
            layout.text_origin,
            Point::new(layout.background.x + 8.0, layout.background.y + 8.0)
        );
        assert!(c.rect().contains_rect(&layout.background));
    }
}
