// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::AutocropError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change something (a flag, a file, a folder).
    ActionRequired,
    /// The input cannot be processed as it is.
    Permanent,
    /// A bug in the calling code rather than in the input.
    Internal,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert an `AutocropError` into a `HumanError`.
pub fn humanize_error(err: &AutocropError) -> HumanError {
    match err {
        AutocropError::NoImage => HumanError {
            message: "No image was loaded before processing.".into(),
            suggestion: "Load an image first, then detect contours and crop.".into(),
            severity: Severity::Internal,
        },

        AutocropError::ContourIndex { count: 0, .. } => HumanError {
            message: "No shape was found to crop to.".into(),
            suggestion: "Try a lower --thres value so more of the image counts as foreground.".into(),
            severity: Severity::ActionRequired,
        },

        AutocropError::ContourIndex { index, count } => HumanError {
            message: format!("Shape number {index} does not exist."),
            suggestion: format!("Only {count} shapes were found. Pick an index below {count}."),
            severity: Severity::Internal,
        },

        AutocropError::Decode(detail) => HumanError {
            message: "An image couldn't be opened.".into(),
            suggestion: format!(
                "The file may be damaged or in an unsupported format. Try saving it as JPEG or PNG. ({detail})"
            ),
            severity: Severity::Permanent,
        },

        AutocropError::Encode(detail) => HumanError {
            message: "The cropped image couldn't be saved.".into(),
            suggestion: format!("Check the output folder is writable and has free space. ({detail})"),
            severity: Severity::ActionRequired,
        },

        AutocropError::InvalidParameter { parameter, value } => HumanError {
            message: format!("The setting '{parameter}' has an unusable value ({value})."),
            suggestion: "JPEG quality must be between 1 and 100, or 0 on the command line to leave it unset.".into(),
            severity: Severity::ActionRequired,
        },

        AutocropError::Pattern(detail) => HumanError {
            message: "The file pattern isn't valid.".into(),
            suggestion: format!("Use a pattern like IMG_*.JPG. ({detail})"),
            severity: Severity::ActionRequired,
        },

        AutocropError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The folder or file couldn't be found.".into(),
                suggestion: "Check the path and try again.".into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Permission was denied.".into(),
                suggestion: "Check the folder permissions, or copy the photos somewhere you can write to.".into(),
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                severity: Severity::Permanent,
            },
        },

        AutocropError::Serialization(_) => HumanError {
            message: "The config file couldn't be read.".into(),
            suggestion: "Make sure it is valid JSON with the fields glob_pattern, threshold, jpeg_quality and auto_orient.".into(),
            severity: Severity::ActionRequired,
        },
    }
}
