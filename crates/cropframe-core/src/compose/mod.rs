//! Compositor: image + crop window + caption into pixels.
//!
//! [`render_frame`] draws the full on-screen frame onto any [`Surface`].
//! [`render_export`] produces the same composition restricted to the crop
//! window and resampled to the requested output size, by running
//! [`render_frame`] against a [`RasterSurface`] whose viewport maps the crop
//! window onto the whole raster.
//!
//! Parts of the crop window the image does not cover (the image can be
//! panned freely) stay transparent. That is not an error.

mod caption;
mod raster;

pub use caption::{
    Caption, CaptionLayout, CAPTION_BACKGROUND, CAPTION_FONT_RATIO, CAPTION_PADDING,
    CAPTION_TEXT_COLOR, MIN_CAPTION_FONT_SIZE,
};
pub use raster::{RasterSurface, Viewport};

use ab_glyph::FontArc;
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::geometry::{Point, Rect};
use crate::handle::ImageHandle;
use crate::transform::{CropWindow, InterpolationFilter, Transform};

/// Errors that can occur while producing pixel output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    /// Pixel output was requested with no image loaded.
    #[error("No image loaded")]
    NoImage,

    /// Width or height is zero.
    #[error("Invalid output size: width ({width}) and height ({height}) must be non-zero")]
    InvalidOutputSize { width: u32, height: u32 },

    /// The crop window has no area, so there is nothing to export.
    #[error("Crop window has no area")]
    DegenerateCropWindow,
}

/// A drawing target addressed in canvas coordinates.
pub trait Surface {
    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Draw the image placed by `transform` (see the transform module for
    /// the composition order).
    fn draw_image(&mut self, image: &ImageHandle, transform: &Transform);

    /// Fill a canvas rectangle, blending by the color's alpha.
    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>);

    /// Advance width of `text` at `font_size`, in canvas pixels.
    fn measure_text(&self, text: &str, font_size: f64) -> f64;

    /// Draw one line of text with its top-left at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Rgba<u8>);
}

/// Everything a frame is composed from.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub image: Option<&'a ImageHandle>,
    pub transform: &'a Transform,
    pub crop: &'a CropWindow,
    pub caption: &'a Caption,
}

/// Render the visible frame. With no image loaded only the caption (if
/// any) is drawn.
pub fn render_frame(surface: &mut dyn Surface, scene: &Scene<'_>) {
    surface.clear();

    if let Some(image) = scene.image {
        surface.draw_image(image, scene.transform);
    }

    if !scene.caption.is_empty() {
        let font_size = CaptionLayout::font_size_for(scene.crop);
        let text_width = surface.measure_text(scene.caption.text(), font_size);
        let layout = CaptionLayout::compute(scene.crop, font_size, text_width);

        surface.fill_rect(layout.background, CAPTION_BACKGROUND);
        surface.fill_text(
            scene.caption.text(),
            layout.text_origin,
            layout.font_size,
            CAPTION_TEXT_COLOR,
        );
    }
}

/// Render the crop window region at `output_width x output_height`.
///
/// # Errors
///
/// - [`ComposeError::NoImage`] when no image is loaded
/// - [`ComposeError::InvalidOutputSize`] for a zero output dimension
/// - [`ComposeError::DegenerateCropWindow`] when the crop window has no area
pub fn render_export(
    scene: &Scene<'_>,
    output_width: u32,
    output_height: u32,
    font: Option<&FontArc>,
) -> Result<RgbaImage, ComposeError> {
    if scene.image.is_none() {
        return Err(ComposeError::NoImage);
    }
    if output_width == 0 || output_height == 0 {
        return Err(ComposeError::InvalidOutputSize {
            width: output_width,
            height: output_height,
        });
    }
    if scene.crop.is_degenerate() {
        return Err(ComposeError::DegenerateCropWindow);
    }

    let viewport = Viewport::fit_rect(scene.crop.rect(), output_width, output_height);
    let mut surface = RasterSurface::new(output_width, output_height)
        .with_viewport(viewport)
        .with_filter(InterpolationFilter::Lanczos3)
        .with_font(font.cloned());

    render_frame(&mut surface, scene);
    log::debug!(
        "rendered {}x{} export of crop window {:.1}x{:.1}",
        output_width,
        output_height,
        scene.crop.width,
        scene.crop.height
    );
    Ok(surface.into_image())
}
