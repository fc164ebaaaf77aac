// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — the crop wrapper and EXIF orientation handling.

pub mod orient;
pub mod wrapper;

pub use wrapper::CropImage;
