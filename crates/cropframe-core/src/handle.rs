//! Decoded image handles.
//!
//! Decoding is done by the host. The engine only ever sees RGBA pixel data
//! that has already been decoded and orientation-corrected, wrapped in an
//! [`ImageHandle`]. Handles are immutable and cheap to clone: switching
//! between the original and enhanced variant swaps handles, it never
//! touches pixels.

use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;

/// Error types for image handle construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match expected dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },
}

/// An immutable reference to decoded RGBA pixel data.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    pixels: Arc<RgbaImage>,
}

impl ImageHandle {
    /// Wrap an RGBA buffer (4 bytes per pixel, row-major order).
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions { width, height });
        }

        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected {
            return Err(ImageError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }

        let image = RgbaImage::from_raw(width, height, pixels).ok_or(
            ImageError::InvalidPixelData {
                expected,
                actual: 0,
            },
        )?;
        Ok(Self {
            pixels: Arc::new(image),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Intrinsic size as floats, the form the transform math works in.
    pub fn size(&self) -> (f64, f64) {
        (self.width() as f64, self.height() as f64)
    }

    /// Borrow the underlying RGBA buffer.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether two handles share the same pixel buffer.
    pub fn same_pixels(&self, other: &ImageHandle) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}
