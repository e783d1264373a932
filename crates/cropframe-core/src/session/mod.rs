//! Session controller.
//!
//! A [`Session`] owns everything one editing session needs: the loaded
//! image (and its enhanced variant, once produced), the transform placing
//! it on the canvas, the crop window, the caption and the export naming
//! state. It drives the `Empty -> Loaded <-> Manipulating -> Exporting`
//! lifecycle and is the only place the active image or the transform is
//! replaced.
//!
//! Work that needs the host (decoding, enhancement, persistence) is never
//! awaited here. See [`host`] for the request/ticket contract.

mod error;
mod host;
mod places;

pub use error::{SessionError, UploadWarning};
pub use host::{
    AcquireError, AcquiredImage, EnhanceStep, EnhanceTicket, ExportJob, ExportReceipt,
    ExportReport, ExportRequest, ExportTicket, LoadReport, Variant,
};
pub use places::{Place, PlaceCatalog};

use std::collections::BTreeSet;

use ab_glyph::FontArc;
use serde::Serialize;

use crate::compose::{self, Caption, Scene, Surface};
use crate::config::{ConfigError, ConfigUpdate, EditorConfig};
use crate::geometry::Point;
use crate::gesture::{GestureController, GestureTarget, InputEvent};
use crate::handle::ImageHandle;
use crate::naming::{file_stem, slugify};
use crate::transform::{CropWindow, Transform};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No image loaded.
    #[default]
    Empty,
    /// An image is loaded and placed, untouched since load or the last
    /// variant switch.
    Loaded,
    /// The user has moved, zoomed or rotated the image.
    Manipulating,
    /// An export is waiting for the host to persist it.
    Exporting,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Empty => "empty",
            SessionState::Loaded => "loaded",
            SessionState::Manipulating => "manipulating",
            SessionState::Exporting => "exporting",
        }
    }
}

/// User-facing operations whose availability depends on the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Open,
    ChooseOutputFolder,
    Manipulate,
    Center,
    ToggleEnhancement,
    EditCaption,
    EditOutputName,
    SelectPlace,
    Export,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Open,
        Operation::ChooseOutputFolder,
        Operation::Manipulate,
        Operation::Center,
        Operation::ToggleEnhancement,
        Operation::EditCaption,
        Operation::EditOutputName,
        Operation::SelectPlace,
        Operation::Export,
    ];

    /// Wire name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Open => "open",
            Operation::ChooseOutputFolder => "choose_output_folder",
            Operation::Manipulate => "manipulate",
            Operation::Center => "center",
            Operation::ToggleEnhancement => "toggle_enhancement",
            Operation::EditCaption => "edit_caption",
            Operation::EditOutputName => "edit_output_name",
            Operation::SelectPlace => "select_place",
            Operation::Export => "export",
        }
    }
}

/// Operations the UI should enable in `state`.
pub fn allowed_operations(state: SessionState) -> BTreeSet<Operation> {
    match state {
        SessionState::Empty => [Operation::Open, Operation::ChooseOutputFolder]
            .into_iter()
            .collect(),
        SessionState::Loaded | SessionState::Manipulating => Operation::ALL.into_iter().collect(),
        SessionState::Exporting => Operation::ALL
            .into_iter()
            .filter(|op| *op != Operation::Export)
            .collect(),
    }
}

/// Per-image state, replaced wholesale on every load.
#[derive(Debug, Clone)]
struct Document {
    original: ImageHandle,
    enhanced: Option<ImageHandle>,
    variant: Variant,
    enhancement_pending: bool,
    display_name: String,
    source_stem: String,
    output_name: String,
    place_id: Option<String>,
}

impl Document {
    fn active(&self) -> &ImageHandle {
        match (self.variant, &self.enhanced) {
            (Variant::Enhanced, Some(enhanced)) => enhanced,
            _ => &self.original,
        }
    }
}

/// One editing session.
#[derive(Debug, Clone)]
pub struct Session {
    config: EditorConfig,
    state: SessionState,
    /// State to return to when the outstanding export finishes.
    resume_state: SessionState,
    surface_size: (f64, f64),
    crop: CropWindow,
    transform: Transform,
    caption: Caption,
    document: Option<Document>,
    gestures: GestureController,
    places: Option<PlaceCatalog>,
    font: Option<FontArc>,
    /// Bumped on every successful load; tags outstanding requests.
    generation: u64,
}

impl Session {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            state: SessionState::Empty,
            resume_state: SessionState::Empty,
            surface_size: (0.0, 0.0),
            crop: CropWindow::default(),
            transform: Transform::default(),
            caption: Caption::none(),
            document: None,
            gestures: GestureController::new(),
            places: None,
            font: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn surface_size(&self) -> (f64, f64) {
        self.surface_size
    }

    pub fn crop_window(&self) -> &CropWindow {
        &self.crop
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn caption(&self) -> &Caption {
        &self.caption
    }

    /// The image currently shown, if any.
    pub fn image(&self) -> Option<&ImageHandle> {
        self.document.as_ref().map(Document::active)
    }

    pub fn variant(&self) -> Option<Variant> {
        self.document.as_ref().map(|doc| doc.variant)
    }

    /// An enhancement request is outstanding.
    pub fn is_enhancing(&self) -> bool {
        self.document
            .as_ref()
            .is_some_and(|doc| doc.enhancement_pending)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.document.as_ref().map(|doc| doc.display_name.as_str())
    }

    pub fn output_name(&self) -> Option<&str> {
        self.document.as_ref().map(|doc| doc.output_name.as_str())
    }

    /// Id of the place the next export will be tagged with.
    pub fn selected_place(&self) -> Option<&str> {
        self.document.as_ref().and_then(|doc| doc.place_id.as_deref())
    }

    pub fn place_catalog(&self) -> Option<&PlaceCatalog> {
        self.places.as_ref()
    }

    pub fn allowed_operations(&self) -> BTreeSet<Operation> {
        allowed_operations(self.state)
    }

    /// Font used to rasterize captions into exports. Without one the
    /// caption box is still drawn but carries no glyphs.
    pub fn set_font(&mut self, font: Option<FontArc>) {
        self.font = font;
    }

    pub fn font(&self) -> Option<&FontArc> {
        self.font.as_ref()
    }

    /// Apply a partial configuration update. A new aspect ratio relays the
    /// crop window and refits the image.
    pub fn update_config(&mut self, update: ConfigUpdate) -> Result<(), ConfigError> {
        let previous = self.config.aspect();
        self.config.merge(update)?;
        if self.config.aspect() != previous {
            self.relayout();
        }
        Ok(())
    }

    /// The drawing surface changed size.
    ///
    /// Recomputes the crop window and, with an image loaded, refits the
    /// image to it (rotation is kept).
    pub fn resize_surface(&mut self, width: f64, height: f64) {
        self.surface_size = (width, height);
        self.relayout();
    }

    fn relayout(&mut self) {
        let (width, height) = self.surface_size;
        self.crop = CropWindow::layout(width, height, self.config.aspect());
        if let Some(doc) = &self.document {
            self.transform.refit(doc.active().size(), &self.crop);
        }
        log::debug!(
            "crop window {:.1}x{:.1} at ({:.1}, {:.1})",
            self.crop.width,
            self.crop.height,
            self.crop.x,
            self.crop.y
        );
    }

    /// Where the canvas sits in client coordinates, for wheel pivots.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.gestures.set_canvas_origin(origin);
    }

    /// Take the outcome of the host's file-open flow.
    ///
    /// On success every piece of per-image state is reset: the transform is
    /// fit to the crop window with no rotation, the caption, selected place
    /// and enhanced variant are dropped, and outstanding requests for the
    /// previous image become stale. On failure nothing changes.
    pub fn load_image(
        &mut self,
        acquired: Result<AcquiredImage, AcquireError>,
    ) -> Result<LoadReport, SessionError> {
        let AcquiredImage {
            image,
            display_name,
        } = match acquired {
            Ok(acquired) => acquired,
            Err(AcquireError::Cancelled) => {
                log::info!("image selection cancelled");
                return Err(SessionError::UserCancelled);
            }
            Err(AcquireError::Failed(reason)) => {
                log::warn!("image acquisition failed: {reason}");
                return Err(SessionError::Acquisition(reason));
            }
        };

        self.generation += 1;
        self.transform = Transform::fit_to_crop(image.size(), &self.crop);
        self.caption = Caption::none();
        self.gestures.reset();

        let source_stem = file_stem(&display_name).to_string();
        let report = LoadReport {
            display_name: display_name.clone(),
            width: image.width(),
            height: image.height(),
        };
        self.document = Some(Document {
            original: image,
            enhanced: None,
            variant: Variant::Original,
            enhancement_pending: false,
            display_name,
            output_name: source_stem.clone(),
            source_stem,
            place_id: None,
        });
        self.state = SessionState::Loaded;
        self.resume_state = SessionState::Loaded;

        log::info!("loaded {report} (generation {})", self.generation);
        Ok(report)
    }

    /// Dispatch one input event. Returns `true` when the frame needs to be
    /// re-rendered.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let crop = &self.crop;
        let target = self.document.as_ref().map(|_| GestureTarget {
            transform: &mut self.transform,
            crop,
        });
        let changed = self.gestures.handle(event, target);
        if changed {
            self.transition(SessionState::Manipulating);
        }
        changed
    }

    /// Re-center the image on the crop window at cover scale, keeping the
    /// rotation. No-op without an image.
    pub fn center(&mut self) -> bool {
        let Some(doc) = &self.document else {
            return false;
        };
        self.transform.refit(doc.active().size(), &self.crop);
        self.transition(SessionState::Manipulating);
        true
    }

    /// Move to `next`, or record it as the state to resume once the
    /// outstanding export finishes.
    fn transition(&mut self, next: SessionState) {
        if self.state == SessionState::Exporting {
            self.resume_state = next;
        } else {
            self.state = next;
        }
    }

    /// Toggle between the original and the enhanced variant.
    ///
    /// The transform is left untouched either way. When the enhanced
    /// variant does not exist yet the host is asked for it exactly once;
    /// further toggles while that request is out are coalesced into it.
    ///
    /// A switch always settles in [`SessionState::Loaded`]. During an
    /// export that becomes the state to resume, replacing a pending
    /// `Manipulating`, just as it would outside an export.
    pub fn toggle_enhancement(&mut self) -> EnhanceStep {
        let Some(doc) = self.document.as_mut() else {
            return EnhanceStep::Ignored;
        };

        if doc.enhancement_pending {
            return EnhanceStep::Pending;
        }

        let step = match (doc.variant, &doc.enhanced) {
            (Variant::Enhanced, _) => {
                doc.variant = Variant::Original;
                EnhanceStep::Switched(Variant::Original)
            }
            (Variant::Original, Some(_)) => {
                doc.variant = Variant::Enhanced;
                EnhanceStep::Switched(Variant::Enhanced)
            }
            (Variant::Original, None) => {
                doc.enhancement_pending = true;
                log::info!("requesting enhanced variant of {}", doc.display_name);
                return EnhanceStep::Requested(EnhanceTicket {
                    generation: self.generation,
                });
            }
        };

        log::info!("{step}");
        self.transition(SessionState::Loaded);
        step
    }

    /// Feed back the host's answer to an enhancement request.
    ///
    /// The swap happens under whatever transform is current now, so any
    /// panning or zooming done while waiting is kept. Answers for a
    /// previous image are dropped and yield [`EnhanceStep::Ignored`].
    /// A successful swap settles in `Loaded` the same way a toggle does.
    pub fn complete_enhancement(
        &mut self,
        ticket: EnhanceTicket,
        outcome: Result<ImageHandle, String>,
    ) -> Result<EnhanceStep, SessionError> {
        let current = ticket.generation == self.generation;
        let doc = match self.document.as_mut() {
            Some(doc) if current && doc.enhancement_pending => doc,
            _ => {
                log::debug!(
                    "discarding enhancement result for generation {}",
                    ticket.generation
                );
                return Ok(EnhanceStep::Ignored);
            }
        };
        doc.enhancement_pending = false;

        match outcome {
            Ok(enhanced) => {
                doc.enhanced = Some(enhanced);
                doc.variant = Variant::Enhanced;
                log::info!("enhanced variant ready for {}", doc.display_name);
                self.transition(SessionState::Loaded);
                Ok(EnhanceStep::Switched(Variant::Enhanced))
            }
            Err(reason) => {
                doc.variant = Variant::Original;
                log::warn!("enhancement failed: {reason}");
                Err(SessionError::Enhancement(reason))
            }
        }
    }

    /// Set the caption from a photo credit. No-op without an image.
    pub fn apply_credit(&mut self, contributor: &str, licence: &str) -> bool {
        if self.document.is_none() {
            return false;
        }
        self.caption = Caption::credit(contributor, licence);
        true
    }

    /// Replace the output name (without extension). No-op without an image.
    pub fn set_output_name(&mut self, name: &str) -> bool {
        match self.document.as_mut() {
            Some(doc) => {
                doc.output_name = name.trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Install (or clear) the place catalog.
    pub fn set_place_catalog(&mut self, catalog: Option<PlaceCatalog>) {
        self.places = catalog;
    }

    /// Take the outcome of the host's place listing. A failure leaves the
    /// session without a catalog and is otherwise ignored.
    pub fn receive_places(&mut self, listing: Result<Vec<Place>, String>) {
        self.places = match listing {
            Ok(places) => {
                log::debug!("place catalog with {} entries", places.len());
                Some(PlaceCatalog::new(places))
            }
            Err(reason) => {
                log::warn!("place catalog unavailable: {reason}");
                None
            }
        };
    }

    /// Autocomplete entries for the place field.
    pub fn place_suggestions(&self, prefix: &str) -> Vec<&Place> {
        self.places
            .as_ref()
            .map(|catalog| catalog.suggestions(prefix))
            .unwrap_or_default()
    }

    /// The place field changed. An exact catalog match selects that place
    /// and renames the output after it; anything else clears the selection.
    pub fn set_place_input(&mut self, text: &str) -> Option<&Place> {
        let doc = self.document.as_mut()?;
        let Some(place) = self
            .places
            .as_ref()
            .and_then(|catalog| catalog.find_by_name(text))
        else {
            doc.place_id = None;
            return None;
        };

        doc.place_id = Some(place.id.clone());
        doc.output_name = slugify(&place.name);
        log::debug!("selected place {} ({})", place.name, place.id);
        Some(place)
    }

    /// Everything the compositor needs for the current frame.
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            image: self.image(),
            transform: &self.transform,
            crop: &self.crop,
            caption: &self.caption,
        }
    }

    /// Draw the current frame.
    pub fn render_frame(&self, surface: &mut dyn Surface) {
        compose::render_frame(surface, &self.scene());
    }

    /// Render the export raster and hand it to the host for persistence.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Busy`] while a previous export is outstanding
    /// - [`SessionError::InvalidState`] with no image loaded
    /// - [`SessionError::Export`] when the raster cannot be produced
    pub fn begin_export(&mut self) -> Result<ExportJob, SessionError> {
        if self.state == SessionState::Exporting {
            return Err(SessionError::Busy("Export"));
        }
        let doc = self.document.as_ref().ok_or(SessionError::InvalidState)?;

        let (width, height) = self.config.output_size();
        let raster = compose::render_export(&self.scene(), width, height, self.font.as_ref())?;

        let request = ExportRequest {
            output_width: width,
            output_height: height,
            crop_window: self.crop,
            transform: self.transform,
            using_enhanced_variant: doc.variant == Variant::Enhanced,
            output_name: doc.output_name.clone(),
            source_stem: doc.source_stem.clone(),
            rotation_degrees: self.transform.rotation_degrees,
            caption_text: self.caption.text().to_string(),
            place_tag: doc.place_id.clone(),
        };

        self.resume_state = self.state;
        self.state = SessionState::Exporting;
        log::info!("exporting {width}x{height} ({:?})", doc.variant);

        Ok(ExportJob {
            ticket: ExportTicket {
                generation: self.generation,
            },
            request,
            raster,
        })
    }

    /// Feed back the host's persistence outcome.
    ///
    /// The session returns to the state it was in before the export
    /// whatever the outcome. A failed upload is a warning inside a
    /// successful report, not an error.
    pub fn finish_export(
        &mut self,
        ticket: ExportTicket,
        outcome: Result<ExportReceipt, String>,
    ) -> Result<ExportReport, SessionError> {
        if ticket.generation == self.generation && self.state == SessionState::Exporting {
            self.state = self.resume_state;
        } else {
            log::debug!(
                "export completion for generation {} arrived after a reload",
                ticket.generation
            );
        }

        match outcome {
            Ok(receipt) => {
                let report = ExportReport::from(receipt);
                if let Some(warning) = &report.upload_warning {
                    log::warn!("{}: {warning}", report.saved_path);
                }
                log::info!("{report}");
                Ok(report)
            }
            Err(reason) => {
                log::warn!("export failed: {reason}");
                Err(SessionError::Export(reason))
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
