//! Cropframe Core - interactive crop and compose engine
//!
//! This crate provides the platform-independent part of Cropframe: the
//! transform placing a photo under a fixed-aspect crop window, the gesture
//! controller driving it from raw input, the compositor producing frames
//! and export rasters, and the session tying them to the host's file,
//! enhancement and persistence services.

pub mod compose;
pub mod config;
pub mod geometry;
pub mod gesture;
pub mod handle;
pub mod naming;
pub mod session;
pub mod transform;

pub use compose::{render_export, render_frame, Caption, ComposeError, RasterSurface, Scene, Surface};
pub use config::{ConfigError, ConfigUpdate, EditorConfig};
pub use geometry::{Point, Rect};
pub use gesture::{GestureController, InputEvent};
pub use handle::{ImageError, ImageHandle};
pub use session::{Session, SessionError, SessionState};
pub use transform::{CropAspect, CropWindow, InterpolationFilter, Transform};
