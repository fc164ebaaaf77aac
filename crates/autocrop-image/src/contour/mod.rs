// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour module — grayscale thresholding, external border extraction, chain
// compression, area ordering, and outline drawing.

pub mod detect;
pub mod draw;

pub use detect::{Contour, detect_contours};
pub use draw::draw_outlines;
