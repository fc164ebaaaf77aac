// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour overlays — closed polylines with a 2 px stroke.

use image::{Rgb, RgbImage};
use imageproc::drawing::{BresenhamLineIter, draw_filled_rect_mut};
use imageproc::rect::Rect;

use super::detect::Contour;

/// Stroke width of contour outlines, in pixels.
pub const STROKE_WIDTH: u32 = 2;

/// Draw the outline of every contour onto `canvas`.
///
/// Each polygon is closed back to its first vertex. Pixels outside the canvas
/// are skipped.
pub fn draw_outlines(canvas: &mut RgbImage, contours: &[Contour], color: Rgb<u8>) {
    for contour in contours {
        let points = contour.points();
        match points {
            [] => {}
            [only] => stamp(canvas, only.x, only.y, color),
            _ => {
                for (i, start) in points.iter().enumerate() {
                    let end = points[(i + 1) % points.len()];
                    let line = BresenhamLineIter::new(
                        (start.x as f32, start.y as f32),
                        (end.x as f32, end.y as f32),
                    );
                    for (x, y) in line {
                        stamp(canvas, x, y, color);
                    }
                }
            }
        }
    }
}

/// Paint a square brush whose bottom-right pixel is `(x, y)`.
fn stamp(canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    let offset = STROKE_WIDTH as i32 - 1;
    let brush = Rect::at(x - offset, y - offset).of_size(STROKE_WIDTH, STROKE_WIDTH);
    draw_filled_rect_mut(canvas, brush, color);
}
