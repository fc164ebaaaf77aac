// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AutocropError, Result};

/// Default file-name pattern for camera photos.
pub const DEFAULT_GLOB: &str = "IMG_*.JPG";
/// Default grayscale cutoff separating foreground from background.
pub const DEFAULT_THRESHOLD: u8 = 120;
/// Default JPEG quality for cropped output.
pub const DEFAULT_JPEG_QUALITY: u8 = 60;

/// Settings for a batch crop run.
///
/// Missing fields in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Glob matched against file names inside the input folder.
    pub glob_pattern: String,
    /// Pixels brighter than this (after blur) count as foreground.
    pub threshold: u8,
    /// JPEG quality (1-100). `None` leaves the encoder default.
    pub jpeg_quality: Option<u8>,
    /// Rotate images according to their EXIF orientation tag on load.
    pub auto_orient: bool,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            glob_pattern: DEFAULT_GLOB.to_string(),
            threshold: DEFAULT_THRESHOLD,
            jpeg_quality: Some(DEFAULT_JPEG_QUALITY),
            auto_orient: true,
        }
    }
}

impl CropConfig {
    /// Read a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Map a command-line quality value to the stored form: 0 disables the
    /// quality setting.
    pub fn quality_from_cli(quality: u8) -> Option<u8> {
        (quality != 0).then_some(quality)
    }

    /// Reject values the encoder cannot use.
    pub fn validate(&self) -> Result<()> {
        if let Some(quality) = self.jpeg_quality {
            validate_jpeg_quality(quality)?;
        }
        if self.glob_pattern.is_empty() {
            return Err(AutocropError::invalid_parameter("glob_pattern", "\"\""));
        }
        Ok(())
    }
}

/// JPEG quality must lie in 1..=100.
pub fn validate_jpeg_quality(quality: u8) -> Result<()> {
    if (1..=100).contains(&quality) {
        Ok(())
    } else {
        Err(AutocropError::invalid_parameter("jpeg_quality", quality))
    }
}
