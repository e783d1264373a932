//! Transform model: where the image sits relative to the crop window.
//!
//! This module owns the coordinate model relating image space to canvas
//! space and the pure mutations on it.
//!
//! # Coordinate System
//!
//! - Canvas space is y-down, origin at the top-left of the drawing surface
//! - Image space is y-down, origin at the top-left of the source image
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Scale is uniform and clamped to `[MIN_SCALE, MAX_SCALE]`

mod crop_window;
mod placement;
mod sampling;

pub use crop_window::{CropAspect, CropWindow, CROP_FILL};
pub use placement::{Transform, MAX_SCALE, MIN_SCALE, NUDGE_STEP};
pub use sampling::{sample, InterpolationFilter};
