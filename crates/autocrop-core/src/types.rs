// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Autocrop.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Axis-aligned rectangle in pixel coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Smallest box containing every point, or `None` for an empty set.
    ///
    /// Both ends are inclusive, so a single point yields a 1x1 box. Negative
    /// coordinates are clamped to zero.
    pub fn enclosing(points: impl IntoIterator<Item = (i32, i32)>) -> Option<Self> {
        let mut points = points.into_iter();
        let (x0, y0) = points.next()?;
        let (min_x, min_y, max_x, max_y) = points.fold(
            (x0, y0, x0, y0),
            |(min_x, min_y, max_x, max_y), (x, y)| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        );
        let left = min_x.max(0);
        let top = min_y.max(0);
        Some(Self {
            x: left as u32,
            y: top as u32,
            width: (max_x - left + 1).max(0) as u32,
            height: (max_y - top + 1).max(0) as u32,
        })
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Image file kinds that change how output is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKind {
    Jpeg,
    Png,
    /// Any other format the codec library can infer from the extension.
    Other,
}

impl ImageKind {
    /// Infer the kind from a file extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            _ => Self::Other,
        }
    }

    /// Infer the kind from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Other)
    }
}
