// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// EXIF orientation — reads tag 0x0112 from raw file bytes and turns it into a
// lossless rotation of the decoded image.

use std::io::Cursor;

use image::DynamicImage;
use tracing::debug;

/// Orientation value used when the file has no EXIF block or no tag.
pub const ORIENTATION_NORMAL: u32 = 1;

/// Read the EXIF orientation tag from raw image bytes.
///
/// Returns [`ORIENTATION_NORMAL`] if the container carries no EXIF data or the
/// tag is absent.
pub fn read_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    let metadata = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(metadata) => metadata,
        Err(err) => {
            debug!(error = %err, "No EXIF data");
            return ORIENTATION_NORMAL;
        }
    };

    metadata
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .unwrap_or(ORIENTATION_NORMAL)
}

/// Counter-clockwise rotation in degrees that puts an image with the given
/// orientation tag upright.
///
/// Only the pure rotations are handled; mirrored orientations (2, 4, 5, 7)
/// map to no rotation.
pub fn rotation_for_orientation(orientation: u32) -> u16 {
    match orientation {
        3 => 180,
        6 => 270,
        8 => 90,
        _ => 0,
    }
}

/// Rotate an image counter-clockwise by a multiple of 90 degrees.
///
/// Any other angle leaves the image unchanged.
pub fn apply_rotation(image: DynamicImage, ccw_degrees: u16) -> DynamicImage {
    match ccw_degrees % 360 {
        90 => image.rotate270(),
        180 => image.rotate180(),
        270 => image.rotate90(),
        _ => image,
    }
}

/// Read the orientation from `bytes` and apply it to `image`.
pub fn auto_orient(bytes: &[u8], image: DynamicImage) -> DynamicImage {
    let orientation = read_orientation(bytes);
    let degrees = rotation_for_orientation(orientation);
    if degrees != 0 {
        debug!(orientation, degrees, "Applying EXIF rotation");
    }
    apply_rotation(image, degrees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn orientation_lookup_table() {
        assert_eq!(rotation_for_orientation(1), 0);
        assert_eq!(rotation_for_orientation(3), 180);
        assert_eq!(rotation_for_orientation(6), 270);
        assert_eq!(rotation_for_orientation(8), 90);
        assert_eq!(rotation_for_orientation(2), 0);
        assert_eq!(rotation_for_orientation(0), 0);
        assert_eq!(rotation_for_orientation(42), 0);
    }

    #[test]
    fn bytes_without_exif_read_as_normal() {
        assert_eq!(read_orientation(&[]), ORIENTATION_NORMAL);
        assert_eq!(read_orientation(b"not an image"), ORIENTATION_NORMAL);
    }

    /// A 2x1 image with a red pixel on the left; track where it ends up.
    fn marker_image() -> DynamicImage {
        let mut img = RgbImage::from_pixel(2, 1, Rgb([0, 0, 0]));
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn ninety_degrees_is_counter_clockwise() {
        let rotated = apply_rotation(marker_image(), 90).to_rgb8();
        assert_eq!(rotated.dimensions(), (1, 2));
        // Left edge moves to the bottom when turning counter-clockwise.
        assert_eq!(*rotated.get_pixel(0, 1), Rgb([255, 0, 0]));
    }

    #[test]
    fn two_seventy_degrees_is_clockwise_quarter() {
        let rotated = apply_rotation(marker_image(), 270).to_rgb8();
        assert_eq!(rotated.dimensions(), (1, 2));
        assert_eq!(*rotated.get_pixel(0, 0), Rgb([255, 0, 0]));
    }

    #[test]
    fn half_turn_keeps_dimensions() {
        let rotated = apply_rotation(marker_image(), 180).to_rgb8();
        assert_eq!(rotated.dimensions(), (2, 1));
        assert_eq!(*rotated.get_pixel(1, 0), Rgb([255, 0, 0]));
    }

    #[test]
    fn zero_is_identity() {
        let rotated = apply_rotation(marker_image(), 0).to_rgb8();
        assert_eq!(rotated, marker_image().to_rgb8());
    }
}
