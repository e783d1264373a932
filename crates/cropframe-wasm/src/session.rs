//! WASM bindings for an editing session.
//!
//! The page owns the file dialog, the enhancement server and the save and
//! upload calls; everything else runs here. Typical wiring:
//!
//! ```typescript
//! const session = new JsSession(configJson);
//! session.resize(canvas.width, canvas.height);
//! canvas.onpointerdown = (e) => { if (session.dispatch({ type: 'pointer_down', x: e.clientX, y: e.clientY })) redraw(); };
//!
//! const ticket = session.toggle_enhancement();
//! if (ticket) {
//!   try {
//!     const enhanced = await enhance(file);
//!     session.complete_enhancement(ticket, enhanced.width, enhanced.height, enhanced.data);
//!   } catch (err) {
//!     session.fail_enhancement(ticket, String(err));
//!   }
//! }
//! statusLine.textContent = session.status;
//! ```

use std::fmt;

use ab_glyph::FontArc;
use cropframe_core::compose::RasterSurface;
use cropframe_core::config::{ConfigUpdate, EditorConfig};
use cropframe_core::geometry::Point;
use cropframe_core::gesture::InputEvent;
use cropframe_core::handle::{ImageError, ImageHandle};
use cropframe_core::session::{
    AcquireError, AcquiredImage, EnhanceStep, EnhanceTicket, ExportReceipt, Place, Session,
    Variant,
};
use wasm_bindgen::prelude::*;

use crate::types::{JsEnhanceTicket, JsExportJob, JsRaster};

fn to_js_error(err: impl fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One editing session, driven from JavaScript.
///
/// Every operation that produces a user-facing notice also stores it in
/// [`JsSession::status`], so the page can mirror it in its status line.
#[wasm_bindgen]
pub struct JsSession {
    inner: Session,
    status: String,
}

#[wasm_bindgen]
impl JsSession {
    /// Create a session from the host's JSON configuration, or with the
    /// defaults when none is given.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<JsSession, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(to_js_error)?,
            None => EditorConfig::default(),
        };
        Ok(Self {
            inner: Session::new(config),
            status: String::new(),
        })
    }

    /// Latest status notice.
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        self.status.clone()
    }

    /// Lifecycle state: `"empty"`, `"loaded"`, `"manipulating"` or
    /// `"exporting"`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state().as_str().to_string()
    }

    /// Names of the operations the UI should enable right now.
    pub fn allowed_operations(&self) -> js_sys::Array {
        self.inner
            .allowed_operations()
            .into_iter()
            .map(|op| JsValue::from_str(op.as_str()))
            .collect()
    }

    /// Current configuration as pretty-printed JSON, for the host to save.
    pub fn config_json(&self) -> Result<String, JsValue> {
        self.inner.config().to_json_pretty().map_err(to_js_error)
    }

    /// Apply a partial configuration update (`{ crop_width: 800 }`).
    pub fn update_config(&mut self, update: JsValue) -> Result<(), JsValue> {
        let update: ConfigUpdate = serde_wasm_bindgen::from_value(update).map_err(to_js_error)?;
        self.inner.update_config(update).map_err(to_js_error)
    }

    /// The canvas was resized.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.inner.resize_surface(width, height);
    }

    /// Client-space position of the canvas' top-left corner.
    pub fn set_canvas_origin(&mut self, x: f64, y: f64) {
        self.inner.set_canvas_origin(Point::new(x, y));
    }

    /// Font (TTF/OTF bytes) used for caption glyphs.
    pub fn set_font(&mut self, bytes: Vec<u8>) -> Result<(), JsValue> {
        let font = FontArc::try_from_vec(bytes).map_err(to_js_error)?;
        self.inner.set_font(Some(font));
        Ok(())
    }

    /// Load a decoded image (RGBA, 4 bytes per pixel). Returns the status
    /// notice, e.g. `"photo.jpg (800x600)"`.
    pub fn load_image(
        &mut self,
        display_name: String,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<String, JsValue> {
        let image = ImageHandle::from_rgba(width, height, pixels).map_err(to_js_error)?;
        let outcome = self.inner.load_image(Ok(AcquiredImage {
            image,
            display_name,
        }));
        Ok(self.report(outcome))
    }

    /// The user dismissed the file dialog.
    pub fn load_cancelled(&mut self) -> String {
        let outcome = self.inner.load_image(Err(AcquireError::Cancelled));
        self.report(outcome)
    }

    /// The chosen file could not be read or decoded.
    pub fn load_failed(&mut self, reason: String) -> String {
        let outcome = self.inner.load_image(Err(AcquireError::Failed(reason)));
        self.report(outcome)
    }

    /// Dispatch one input event (see `InputEvent` for the shape). Returns
    /// `true` when the frame should be redrawn.
    pub fn dispatch(&mut self, event: JsValue) -> Result<bool, JsValue> {
        let event: InputEvent = serde_wasm_bindgen::from_value(event)
            .map_err(|e| JsValue::from_str(&format!("Invalid input event: {}", e)))?;
        Ok(self.inner.handle_input(&event))
    }

    /// Re-center the image at cover scale.
    pub fn center(&mut self) -> bool {
        self.inner.center()
    }

    /// Toggle the enhanced view. Returns a ticket when the page must fetch
    /// the enhanced variant and report back.
    pub fn toggle_enhancement(&mut self) -> Option<JsEnhanceTicket> {
        let step = self.inner.toggle_enhancement();
        if step != EnhanceStep::Ignored {
            self.status = step.to_string();
        }
        match step {
            EnhanceStep::Requested(ticket) => Some(JsEnhanceTicket { ticket }),
            _ => None,
        }
    }

    /// The enhancement server answered. Returns `true` when the view
    /// switched to the enhanced image.
    ///
    /// A pixel buffer that does not match `width` and `height` counts as a
    /// failed request: the view stays on the original and a later toggle
    /// asks again.
    pub fn complete_enhancement(
        &mut self,
        ticket: &JsEnhanceTicket,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<bool, JsValue> {
        self.apply_enhanced_pixels(ticket.ticket, width, height, pixels)
            .map_err(to_js_error)
    }

    /// The enhancement request failed.
    pub fn fail_enhancement(&mut self, ticket: &JsEnhanceTicket, reason: String) -> String {
        let outcome = self.inner.complete_enhancement(ticket.ticket, Err(reason));
        self.enhancement_step(outcome);
        self.status.clone()
    }

    /// `"original"` or `"enhanced"`; undefined with no image.
    pub fn variant(&self) -> Option<String> {
        self.inner.variant().map(|variant| match variant {
            Variant::Original => "original".to_string(),
            Variant::Enhanced => "enhanced".to_string(),
        })
    }

    /// Set the credit caption. An empty contributor removes it.
    pub fn set_credit(&mut self, contributor: &str, licence: &str) -> bool {
        self.inner.apply_credit(contributor, licence)
    }

    #[wasm_bindgen(getter)]
    pub fn caption(&self) -> String {
        self.inner.caption().text().to_string()
    }

    pub fn set_output_name(&mut self, name: &str) -> bool {
        self.inner.set_output_name(name)
    }

    pub fn output_name(&self) -> Option<String> {
        self.inner.output_name().map(str::to_string)
    }

    /// Install the place catalog (`[{ id, name }]`).
    pub fn set_places(&mut self, places: JsValue) -> Result<(), JsValue> {
        let places: Vec<Place> = serde_wasm_bindgen::from_value(places).map_err(to_js_error)?;
        self.inner.receive_places(Ok(places));
        Ok(())
    }

    /// The place listing could not be fetched.
    pub fn places_unavailable(&mut self, reason: String) {
        self.inner.receive_places(Err(reason));
    }

    /// Place names starting with `prefix`.
    pub fn place_suggestions(&self, prefix: &str) -> js_sys::Array {
        self.inner
            .place_suggestions(prefix)
            .into_iter()
            .map(|place| JsValue::from_str(&place.name))
            .collect()
    }

    /// The place field changed. Returns the selected place id on an exact
    /// match.
    pub fn set_place(&mut self, text: &str) -> Option<String> {
        self.inner.set_place_input(text).map(|place| place.id.clone())
    }

    /// Current transform as `{ x, y, scale, rotationDegrees }`.
    pub fn transform(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.transform()).map_err(to_js_error)
    }

    /// Current crop window as `{ x, y, width, height }`.
    pub fn crop_window(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.crop_window()).map_err(to_js_error)
    }

    /// Render the frame at the canvas size.
    pub fn render_frame(&self) -> JsRaster {
        let (width, height) = self.inner.surface_size();
        let mut surface =
            RasterSurface::new(width.ceil().max(0.0) as u32, height.ceil().max(0.0) as u32)
                .with_font(self.inner.font().cloned());
        self.inner.render_frame(&mut surface);
        surface.into_image().into()
    }

    /// Render the export raster. The page saves it (see
    /// `JsExportJob.file_name` and `JsExportJob.request`) and then calls
    /// `finish_export` or `fail_export`.
    pub fn begin_export(&mut self) -> Result<JsExportJob, JsValue> {
        match self.inner.begin_export() {
            Ok(job) => Ok(JsExportJob { job }),
            Err(err) => {
                self.status = err.to_string();
                Err(to_js_error(err))
            }
        }
    }

    /// The export was saved. `upload_error` is set when indexing failed.
    pub fn finish_export(
        &mut self,
        job: &JsExportJob,
        saved_path: String,
        uploaded: bool,
        upload_error: Option<String>,
    ) -> String {
        let outcome = self.inner.finish_export(
            job.job.ticket,
            Ok(ExportReceipt {
                saved_path,
                uploaded,
                upload_error,
            }),
        );
        self.report(outcome)
    }

    /// Saving the export failed.
    pub fn fail_export(&mut self, job: &JsExportJob, reason: String) -> String {
        let outcome = self.inner.finish_export(job.job.ticket, Err(reason));
        self.report(outcome)
    }
}

impl JsSession {
    /// Store and return the notice for a lifecycle outcome.
    fn report<T: fmt::Display, E: fmt::Display>(&mut self, outcome: Result<T, E>) -> String {
        self.status = match outcome {
            Ok(report) => report.to_string(),
            Err(err) => err.to_string(),
        };
        self.status.clone()
    }

    fn apply_enhanced_pixels(
        &mut self,
        ticket: EnhanceTicket,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<bool, ImageError> {
        match ImageHandle::from_rgba(width, height, pixels) {
            Ok(image) => {
                let outcome = self.inner.complete_enhancement(ticket, Ok(image));
                Ok(matches!(self.enhancement_step(outcome), EnhanceStep::Switched(_)))
            }
            Err(err) => {
                let outcome = self.inner.complete_enhancement(ticket, Err(err.to_string()));
                self.enhancement_step(outcome);
                Err(err)
            }
        }
    }

    fn enhancement_step<E: fmt::Display>(&mut self, outcome: Result<EnhanceStep, E>) -> EnhanceStep {
        match outcome {
            Ok(EnhanceStep::Ignored) => EnhanceStep::Ignored,
            Ok(step) => {
                self.status = step.to_string();
                step
            }
            Err(err) => {
                self.status = err.to_string();
                EnhanceStep::Ignored
            }
        }
    }
}
