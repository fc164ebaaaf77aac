// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Autocrop.

use thiserror::Error;

/// Top-level error type for all Autocrop operations.
#[derive(Debug, Error)]
pub enum AutocropError {
    // -- State errors --
    #[error("no image loaded")]
    NoImage,

    #[error("contour index {index} is out of range (found {count} contours)")]
    ContourIndex { index: usize, count: usize },

    // -- Codec errors --
    #[error("image decoding failed: {0}")]
    Decode(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    // -- Input validation --
    #[error("invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    #[error("invalid file pattern: {0}")]
    Pattern(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AutocropError {
    /// Build an `InvalidParameter` error from any displayable value.
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AutocropError>;
