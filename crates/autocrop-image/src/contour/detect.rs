// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour detection — grayscale conversion, 5x5 Gaussian blur, global binary
// threshold, external border following, chain compression, and area sort.

use autocrop_core::BoundingBox;
use image::{GrayImage, ImageBuffer, Luma, RgbImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::contrast::{ThresholdType, threshold as global_threshold};
use imageproc::filter::separable_filter_equal;
use imageproc::point::Point;
use tracing::{debug, instrument};

/// Binomial approximation of a 5-tap Gaussian, `[1, 4, 6, 4, 1] / 16`.
const GAUSSIAN_5: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Closed polygon around one connected foreground region.
///
/// Points are in pixel coordinates and run along the region's outer border.
/// Straight runs are compressed to their endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point<i32>>,
    area: f64,
}

impl Contour {
    /// Build a contour from border points, computing its enclosed area.
    pub fn new(points: Vec<Point<i32>>) -> Self {
        let area = polygon_area(&points);
        Self { points, area }
    }

    /// Polygon vertices in traversal order.
    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    /// Area enclosed by the polygon (shoelace formula).
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Smallest axis-aligned rectangle containing every vertex.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.points.iter().map(|p| (p.x, p.y)))
    }
}

/// Run the full detection pipeline on an RGB buffer.
///
/// Returns the external contours of the thresholded image, largest enclosed
/// area first. Contours of equal area keep their scan order.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn detect_contours(image: &RgbImage, threshold: u8) -> Vec<Contour> {
    let gray = to_gray(image);
    let blurred = gaussian_blur_5x5(&gray);
    let binary = binarize(&blurred, threshold);

    let mut contours = external_contours(&binary);
    contours.sort_by(|a, b| b.area().total_cmp(&a.area()));

    debug!(
        count = contours.len(),
        largest_area = contours.first().map(Contour::area),
        "Contours detected"
    );
    contours
}

/// Convert RGB to 8-bit luma with the BT.601 weights used by most vision
/// libraries (0.299 R + 0.587 G + 0.114 B).
pub fn to_gray(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// Separable 5x5 Gaussian blur with edge pixels replicated.
///
/// Both passes run in `f32`; the result is rounded once.
pub fn gaussian_blur_5x5(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let float: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(width, height, |x, y| Luma([gray.get_pixel(x, y).0[0] as f32]));
    let blurred = separable_filter_equal(&float, &GAUSSIAN_5);

    GrayImage::from_fn(width, height, |x, y| {
        let value = blurred.get_pixel(x, y).0[0];
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// Global binary threshold: pixels strictly above `threshold` become 255,
/// everything else 0.
pub fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    global_threshold(gray, threshold, ThresholdType::Binary)
}

/// Outer borders that are not nested inside another region.
///
/// Holes, and regions sitting inside holes, are dropped. Everything outside
/// the image counts as background, so regions touching the frame are still
/// outer borders.
pub fn external_contours(binary: &GrayImage) -> Vec<Contour> {
    let (width, height) = binary.dimensions();
    let mut padded = GrayImage::new(width + 2, height + 2);
    image::imageops::replace(&mut padded, binary, 1, 1);

    find_contours::<i32>(&padded)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            let points: Vec<_> = c.points.iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect();
            Contour::new(compress_chain(&points))
        })
        .collect()
}

/// Drop every point whose incoming and outgoing steps point the same way,
/// leaving only the endpoints of horizontal, vertical and diagonal runs.
///
/// The polygon is treated as closed, so the first and last points are
/// neighbours.
pub fn compress_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let here = points[i];
            let next = points[(i + 1) % n];
            let incoming = (here.x - prev.x, here.y - prev.y);
            let outgoing = (next.x - here.x, next.y - here.y);
            incoming != outgoing
        })
        .map(|i| points[i])
        .collect()
}

/// Unsigned polygon area by the shoelace formula. Fewer than three vertices
/// enclose nothing.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x as i64 * points[j].y as i64;
        twice_area -= points[j].x as i64 * points[i].y as i64;
    }
    twice_area.abs() as f64 / 2.0
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn pt(x: i32, y: i32) -> Point<i32> {
        Point::new(x, y)
    }

    fn fill(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                img.put_pixel(x, y, color);
            }
        }
    }

    #[test]
    fn gray_uses_bt601_weights() {
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 128, 0]));
        img.put_pixel(2, 0, Rgb([255, 255, 255]));

        let gray = to_gray(&img);
        assert_eq!(gray.get_pixel(0, 0).0[0], 76);
        assert_eq!(gray.get_pixel(1, 0).0[0], 75);
        assert_eq!(gray.get_pixel(2, 0).0[0], 255);
    }

    #[test]
    fn blur_keeps_flat_regions_flat() {
        let gray = GrayImage::from_pixel(10, 10, Luma([90u8]));
        let blurred = gaussian_blur_5x5(&gray);
        assert!(blurred.pixels().all(|p| p.0[0] == 90));
    }

    #[test]
    fn blur_softens_a_step_edge() {
        let gray = GrayImage::from_fn(20, 5, |x, _| Luma([if x >= 10 { 200 } else { 0 }]));
        let blurred = gaussian_blur_5x5(&gray);
        let left = blurred.get_pixel(9, 2).0[0];
        let right = blurred.get_pixel(10, 2).0[0];
        assert!(left > 0 && left < 100, "left = {left}");
        assert!(right > 100 && right < 200, "right = {right}");
    }

    #[test]
    fn threshold_is_strictly_greater() {
        let gray = GrayImage::from_fn(3, 1, |x, _| Luma([[49u8, 50, 51][x as usize]]));
        let binary = binarize(&gray, 50);
        assert_eq!(binary.get_pixel(0, 0).0[0], 0);
        assert_eq!(binary.get_pixel(1, 0).0[0], 0);
        assert_eq!(binary.get_pixel(2, 0).0[0], 255);
    }

    #[test]
    fn compress_keeps_rectangle_corners() {
        let mut border = Vec::new();
        for x in 0..4 {
            border.push(pt(x, 0));
        }
        for y in 1..3 {
            border.push(pt(3, y));
        }
        for x in (0..4).rev() {
            border.push(pt(x, 3));
        }
        for y in (1..3).rev() {
            border.push(pt(0, y));
        }

        let compressed = compress_chain(&border);
        assert_eq!(compressed, vec![pt(0, 0), pt(3, 0), pt(3, 3), pt(0, 3)]);
    }

    #[test]
    fn compress_collapses_diagonal_runs() {
        let diamond = vec![
            pt(2, 0),
            pt(3, 1),
            pt(4, 2),
            pt(3, 3),
            pt(2, 4),
            pt(1, 3),
            pt(0, 2),
            pt(1, 1),
        ];
        let compressed = compress_chain(&diamond);
        assert_eq!(compressed, vec![pt(2, 0), pt(4, 2), pt(2, 4), pt(0, 2)]);
    }

    #[test]
    fn compress_leaves_tiny_chains() {
        assert_eq!(compress_chain(&[pt(1, 1)]), vec![pt(1, 1)]);
        assert_eq!(compress_chain(&[pt(1, 1), pt(2, 1)]), vec![pt(1, 1), pt(2, 1)]);
    }

    #[test]
    fn shoelace_area_of_rectangle() {
        let rect = [pt(0, 0), pt(10, 0), pt(10, 5), pt(0, 5)];
        assert_eq!(polygon_area(&rect), 50.0);
        let reversed: Vec<_> = rect.iter().rev().copied().collect();
        assert_eq!(polygon_area(&reversed), 50.0);
        assert_eq!(polygon_area(&rect[..2]), 0.0);
    }

    #[test]
    fn two_rectangles_give_two_contours_largest_first() {
        let mut img = RgbImage::from_pixel(500, 200, Rgb([0, 0, 0]));
        fill(&mut img, 50, 50, 100, 180, Rgb([0, 128, 0]));
        fill(&mut img, 250, 80, 450, 160, Rgb([255, 0, 0]));

        let contours = detect_contours(&img, 50);
        assert_eq!(contours.len(), 2);
        assert!(contours[0].area() > contours[1].area());

        let big = contours[0].bounding_box().unwrap();
        assert_eq!((big.x, big.y, big.width, big.height), (250, 80, 201, 81));
        let small = contours[1].bounding_box().unwrap();
        assert_eq!((small.x, small.y, small.width, small.height), (50, 50, 51, 131));
    }

    #[test]
    fn holes_are_ignored() {
        // A white ring: the inner hole and a dot inside it must not show up.
        let mut img = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        fill(&mut img, 10, 10, 89, 89, Rgb([255, 255, 255]));
        fill(&mut img, 30, 30, 69, 69, Rgb([0, 0, 0]));
        fill(&mut img, 45, 45, 54, 54, Rgb([255, 255, 255]));

        let contours = detect_contours(&img, 120);
        assert_eq!(contours.len(), 1);
        let bbox = contours[0].bounding_box().unwrap();
        assert_eq!((bbox.x, bbox.y), (10, 10));
    }

    #[test]
    fn blur_rounds_instead_of_truncating() {
        // 255 * 11/16 * 11/16 = 120.5 at the corner of a bright block.
        let gray = GrayImage::from_fn(10, 10, |x, y| Luma([if x < 5 && y < 5 { 255 } else { 0 }]));
        let blurred = gaussian_blur_5x5(&gray);
        assert_eq!(blurred.get_pixel(4, 4).0[0], 121);
        assert_eq!(blurred.get_pixel(4, 0).0[0], 175);
    }

    #[test]
    fn region_touching_the_left_edge_is_found() {
        let mut img = RgbImage::from_pixel(60, 40, Rgb([0, 0, 0]));
        fill(&mut img, 0, 0, 19, 39, Rgb([255, 255, 255]));

        let contours = detect_contours(&img, 120);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].bounding_box().unwrap().to_string(), "20x40+0+0");
    }

    #[test]
    fn card_in_the_corner_beats_a_speck() {
        let mut img = RgbImage::from_pixel(60, 40, Rgb([0, 0, 0]));
        fill(&mut img, 0, 0, 29, 24, Rgb([255, 255, 255]));
        fill(&mut img, 40, 30, 44, 34, Rgb([255, 255, 255]));

        let contours = detect_contours(&img, 120);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].bounding_box().unwrap().to_string(), "30x25+0+0");
        assert_eq!(contours[1].bounding_box().unwrap().to_string(), "5x5+40+30");
    }

    #[test]
    fn fully_bright_frame_is_one_contour() {
        let img = RgbImage::from_pixel(30, 10, Rgb([255, 255, 255]));
        let contours = detect_contours(&img, 120);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].bounding_box().unwrap().to_string(), "30x10+0+0");
        assert_eq!(contours[0].area(), 29.0 * 9.0);
    }

    #[test]
    fn blank_image_has_no_contours() {
        let img = RgbImage::from_pixel(40, 30, Rgb([20, 20, 20]));
        assert!(detect_contours(&img, 120).is_empty());
    }
}
