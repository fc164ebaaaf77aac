// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch driver — crop every matching photo in a folder and write
// `<stem>_mod<ext>` next to it.

use std::path::{Path, PathBuf};

use autocrop_core::{AutocropError, CropConfig, Result};
use glob::Pattern;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::image::CropImage;

/// Suffix inserted between the file stem and the extension of outputs.
pub const OUTPUT_SUFFIX: &str = "_mod";

/// Outcome of cropping one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Dimensions before cropping, `(width, height)`.
    pub original_size: (u32, u32),
    /// Dimensions after cropping, `(width, height)`.
    pub cropped_size: (u32, u32),
    /// Number of contours found at the configured threshold.
    pub contour_count: usize,
}

/// Every file processed by one [`run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub files: Vec<FileReport>,
}

impl BatchSummary {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Output path for `input`: same folder, `_mod` appended to the stem.
///
/// `photos/IMG_1.JPG` becomes `photos/IMG_1_mod.JPG`. An input without an
/// extension gets an output without one.
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}{OUTPUT_SUFFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}{OUTPUT_SUFFIX}"),
    };
    input.with_file_name(name)
}

/// Regular files directly inside `folder` whose names match `pattern`,
/// sorted by path.
pub fn find_inputs(folder: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Pattern::new(pattern).map_err(|err| AutocropError::Pattern(err.to_string()))?;

    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        // Follows symlinks, so linked photos are picked up too.
        if !path.is_file() {
            continue;
        }
        if matcher.matches(&entry.file_name().to_string_lossy()) {
            inputs.push(path);
        }
    }
    inputs.sort();

    debug!(folder = %folder.display(), pattern, count = inputs.len(), "Inputs collected");
    Ok(inputs)
}

/// Load, detect, crop to the largest contour, and save one file.
#[instrument(skip(config), fields(path = %input.display()))]
pub fn process_file(input: &Path, config: &CropConfig) -> Result<FileReport> {
    let mut image = CropImage::new();
    image.load(input, config.auto_orient)?;
    let original_size = (image.width()?, image.height()?);

    let contour_count = image.find_contours(config.threshold)?.len();
    image.crop_by_contour_in_place(0)?;
    let cropped_size = (image.width()?, image.height()?);

    let output = output_path(input);
    image.save(&output, config.jpeg_quality)?;

    info!(
        output = %output.display(),
        from = ?original_size,
        to = ?cropped_size,
        "File cropped"
    );
    Ok(FileReport {
        input: input.to_path_buf(),
        output,
        original_size,
        cropped_size,
        contour_count,
    })
}

/// Crop every file in `folder` matching `config.glob_pattern`.
///
/// Files are processed one at a time in path order. The first failure aborts
/// the run and is returned; outputs already written stay on disk.
#[instrument(skip(config), fields(folder = %folder.display(), pattern = %config.glob_pattern))]
pub fn run(folder: &Path, config: &CropConfig) -> Result<BatchSummary> {
    config.validate()?;
    let inputs = find_inputs(folder, &config.glob_pattern)?;
    info!(count = inputs.len(), "Starting batch");

    let mut summary = BatchSummary::default();
    for input in &inputs {
        summary.files.push(process_file(input, config)?);
    }

    info!(processed = summary.len(), "Batch complete");
    Ok(summary)
}

// -- Tests --------------------------------------------------------------------
