//! WASM-compatible wrapper types.
//!
//! Pixel buffers cross the boundary as flat RGBA `Vec<u8>`s (a
//! `Uint8Array` on the JavaScript side), which can be wrapped directly in
//! an `ImageData` and drawn onto a canvas.

use cropframe_core::naming::output_file_name;
use cropframe_core::session::{EnhanceTicket, ExportJob};
use image::RgbaImage;
use wasm_bindgen::prelude::*;

/// An RGBA raster for JavaScript.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. `pixels()` copies it out into a
/// `Uint8Array`; call it once per frame, not per pixel.
#[wasm_bindgen]
pub struct JsRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRaster {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4).
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// RGBA pixel data, row-major. Copies.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl From<RgbaImage> for JsRaster {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }
}

/// Handle for an outstanding enhancement request.
///
/// Pass it back to `complete_enhancement` / `fail_enhancement` together
/// with the server's answer. A handle issued before the current image was
/// loaded is recognised and ignored.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsEnhanceTicket {
    pub(crate) ticket: EnhanceTicket,
}

/// A rendered export waiting for the host to save it.
#[wasm_bindgen]
pub struct JsExportJob {
    pub(crate) job: ExportJob,
}

#[wasm_bindgen]
impl JsExportJob {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.job.raster.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.job.raster.height()
    }

    /// RGBA pixels of the export raster. Copies.
    pub fn pixels(&self) -> Vec<u8> {
        self.job.raster.as_raw().clone()
    }

    /// Export parameters (crop window, transform, naming, place tag) as a
    /// plain object for the save and upload calls.
    pub fn request(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.job.request)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// File name to save under, given the current time in Unix seconds.
    pub fn file_name(&self, unix_seconds: u64) -> String {
        output_file_name(
            &self.job.request.output_name,
            &self.job.request.source_stem,
            unix_seconds,
        )
    }
}
