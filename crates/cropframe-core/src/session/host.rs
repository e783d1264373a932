//! Contract with the host application.
//!
//! The host decodes files, talks to the enhancement server and writes
//! exports. None of that blocks the session: the session hands out a ticket
//! when it needs something, keeps handling input, and the host later feeds
//! the outcome back in together with the ticket. Tickets carry the image
//! generation they were issued for, so an outcome that arrives after a new
//! image was loaded is recognised as stale and dropped.

use std::fmt;

use image::RgbaImage;
use serde::Serialize;

use super::error::UploadWarning;
use crate::handle::ImageHandle;
use crate::transform::{CropWindow, Transform};

/// A decoded image delivered by the host's file-open flow.
#[derive(Debug, Clone)]
pub struct AcquiredImage {
    pub image: ImageHandle,
    /// File name shown to the user, e.g. `"IMG_0042.jpg"`.
    pub display_name: String,
}

/// Why the host could not deliver an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireError {
    /// The user dismissed the dialog.
    Cancelled,
    /// Reading or decoding failed.
    Failed(String),
}

/// Which image variant is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Original,
    Enhanced,
}

/// Outstanding enhancement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnhanceTicket {
    pub(crate) generation: u64,
}

/// Outstanding export persistence request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportTicket {
    pub(crate) generation: u64,
}

/// Everything the host needs to persist and index an export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub output_width: u32,
    pub output_height: u32,
    pub crop_window: CropWindow,
    pub transform: Transform,
    pub using_enhanced_variant: bool,
    /// Name field contents without extension; empty means "derive one".
    pub output_name: String,
    /// Stem of the source file, for the derived name.
    pub source_stem: String,
    pub rotation_degrees: f64,
    pub caption_text: String,
    pub place_tag: Option<String>,
}

/// A rendered export waiting to be persisted by the host.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub ticket: ExportTicket,
    pub request: ExportRequest,
    /// The composed crop-window region at output resolution.
    pub raster: RgbaImage,
}

/// What the host reports after persisting an export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReceipt {
    pub saved_path: String,
    /// The export was also indexed in the remote store.
    pub uploaded: bool,
    /// The file was saved but indexing failed.
    pub upload_error: Option<String>,
}

/// Successful image load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub display_name: String,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{})", self.display_name, self.width, self.height)
    }
}

/// Outcome of toggling the enhanced view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnhanceStep {
    /// No image loaded; nothing happened.
    Ignored,
    /// The shown variant changed immediately.
    Switched(Variant),
    /// The host must produce the enhanced variant and report back.
    Requested(EnhanceTicket),
    /// A request is already outstanding; this toggle was coalesced into it.
    Pending,
}

impl fmt::Display for EnhanceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnhanceStep::Ignored => Ok(()),
            EnhanceStep::Switched(Variant::Enhanced) => f.write_str("Enhanced view"),
            EnhanceStep::Switched(Variant::Original) => f.write_str("Original view"),
            EnhanceStep::Requested(_) | EnhanceStep::Pending => f.write_str("Enhancing..."),
        }
    }
}

/// Successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub saved_path: String,
    pub uploaded: bool,
    pub upload_warning: Option<UploadWarning>,
}

impl From<ExportReceipt> for ExportReport {
    fn from(receipt: ExportReceipt) -> Self {
        Self {
            saved_path: receipt.saved_path,
            uploaded: receipt.uploaded && receipt.upload_error.is_none(),
            upload_warning: receipt.upload_error.map(UploadWarning),
        }
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.upload_warning, self.uploaded) {
            (Some(warning), _) => write!(f, "Saved: {} ({})", self.saved_path, warning),
            (None, true) => write!(f, "Saved & uploaded: {}", self.saved_path),
            (None, false) => write!(f, "Saved: {}", self.saved_path),
        }
    }
}
