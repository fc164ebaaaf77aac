// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// autocrop-image — Image handling for the Autocrop tool.
//
// Provides the in-memory image wrapper (load, EXIF orientation, save), threshold
// based contour detection, bounding-box cropping, contour overlays, and the
// folder batch driver.

pub mod batch;
pub mod contour;
pub mod image;

// Re-export the primary types so callers can use `autocrop_image::CropImage` etc.
pub use batch::{BatchSummary, FileReport};
pub use contour::Contour;
pub use crate::image::wrapper::CropImage;
