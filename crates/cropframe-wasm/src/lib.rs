//! Cropframe WASM - WebAssembly bindings for Cropframe
//!
//! This crate exposes a cropframe-core editing session to a browser or
//! webview page. The page keeps the file dialog, the enhancement server and
//! the save/upload calls; the session does placement, gestures, rendering
//! and lifecycle bookkeeping.
//!
//! # Module Structure
//!
//! - `session` - the `JsSession` wrapper
//! - `types` - rasters and request handles passed across the boundary
//! - `logging` - `log` backend for the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { init_logging, JsSession } from '@cropframe/wasm';
//!
//! await init();
//! init_logging('info');
//!
//! const session = new JsSession(await readConfig());
//! session.resize(canvas.width, canvas.height);
//! session.load_image(file.name, bitmap.width, bitmap.height, rgba);
//! const frame = session.render_frame();
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(frame.pixels()), frame.width), 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod logging;
mod session;
mod types;

pub use logging::init_logging;
pub use session::JsSession;
pub use types::{JsEnhanceTicket, JsExportJob, JsRaster};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Logging stays off until the page calls init_logging with a level.
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
