//! Editor configuration.
//!
//! The host keeps the configuration as a JSON document and hands its text
//! to the engine. Unknown keys are ignored and missing keys take their
//! defaults, so older files keep loading.
//!
//! ```json
//! {
//!   "crop_width": 1200,
//!   "crop_height": 600,
//!   "output_folder": "./output",
//!   "webp_quality": 80
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transform::CropAspect;

/// Errors from loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Crop width or height is zero.
    #[error("Invalid crop size: width ({width}) and height ({height}) must be non-zero")]
    InvalidCropSize { width: u32, height: u32 },

    /// Output quality outside 1..=100.
    #[error("Invalid WebP quality {0}: must be between 1 and 100")]
    InvalidQuality(u8),
}

/// Editor settings shared with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Export width in pixels; with `crop_height`, the crop aspect ratio.
    pub crop_width: u32,
    /// Export height in pixels.
    pub crop_height: u32,
    /// Folder the host writes exports into.
    pub output_folder: String,
    /// Lossy WebP quality used by the host when saving (1-100).
    pub webp_quality: u8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            crop_width: 1200,
            crop_height: 600,
            output_folder: "./output".to_string(),
            webp_quality: 80,
        }
    }
}

/// A partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    pub crop_width: Option<u32>,
    pub crop_height: Option<u32>,
    pub output_folder: Option<String>,
    pub webp_quality: Option<u8>,
}

impl EditorConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as indented JSON, the format the host writes to disk.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crop_width == 0 || self.crop_height == 0 {
            return Err(ConfigError::InvalidCropSize {
                width: self.crop_width,
                height: self.crop_height,
            });
        }
        if !(1..=100).contains(&self.webp_quality) {
            return Err(ConfigError::InvalidQuality(self.webp_quality));
        }
        Ok(())
    }

    /// Apply a partial update. The result is validated before it replaces
    /// `self`; on error `self` is unchanged.
    pub fn merge(&mut self, update: ConfigUpdate) -> Result<(), ConfigError> {
        let mut next = self.clone();
        if let Some(width) = update.crop_width {
            next.crop_width = width;
        }
        if let Some(height) = update.crop_height {
            next.crop_height = height;
        }
        if let Some(folder) = update.output_folder {
            next.output_folder = folder;
        }
        if let Some(quality) = update.webp_quality {
            next.webp_quality = quality;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Aspect ratio of the crop window.
    pub fn aspect(&self) -> CropAspect {
        CropAspect::new(self.crop_width, self.crop_height)
    }

    /// Export raster size.
    pub fn output_size(&self) -> (u32, u32) {
        (self.crop_width, self.crop_height)
    }
}
