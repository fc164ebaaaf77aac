// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop image — owns one RGB pixel buffer and the contours detected in it.
// Loads with EXIF orientation, detects threshold contours, crops to a contour's
// bounding box, draws contour overlays, and saves with optional JPEG quality.

use std::io::Cursor;
use std::path::Path;

use autocrop_core::config::validate_jpeg_quality;
use autocrop_core::{AutocropError, BoundingBox, ImageKind, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tracing::{debug, info, instrument};

use crate::contour::{Contour, detect_contours, draw_outlines};
use crate::image::orient;

/// An image buffer plus the contours detected in it.
///
/// A fresh `CropImage::new()` holds no buffer; accessors and operations on it
/// fail with [`AutocropError::NoImage`]. Contours start empty and are filled by
/// [`find_contours`](Self::find_contours). Every operation that changes the
/// buffer geometry clears them, since their coordinates no longer apply.
///
/// Operations come in pairs: `op` leaves `self` untouched and returns a new
/// image, `op_in_place` mutates `self` and returns it for chaining.
///
/// ```ignore
/// let mut photo = CropImage::open("IMG_0001.JPG")?;
/// photo.find_contours(120)?;
/// photo.crop_by_contour_in_place(0)?.save("IMG_0001_mod.JPG", Some(60))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct CropImage {
    raw: Option<RgbImage>,
    contours: Vec<Contour>,
}

impl CropImage {
    // -- Construction ---------------------------------------------------------

    /// An empty wrapper with no buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an image from a file, applying its EXIF orientation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut image = Self::new();
        image.load(path, true)?;
        Ok(image)
    }

    /// Wrap an RGB buffer.
    pub fn from_rgb(buffer: RgbImage) -> Self {
        Self {
            raw: Some(buffer),
            contours: Vec::new(),
        }
    }

    /// Wrap an already decoded image. Alpha is dropped; gray is expanded.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::from_rgb(image.to_rgb8())
    }

    /// Decode a file into the buffer, replacing any previous image and
    /// clearing the contours.
    ///
    /// With `auto_orient`, the EXIF orientation tag is read and the image is
    /// rotated upright before it is stored.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), auto_orient = auto_orient))]
    pub fn load(&mut self, path: impl AsRef<Path>, auto_orient: bool) -> Result<&mut Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let mut decoded = image::load_from_memory(&bytes).map_err(|err| {
            AutocropError::Decode(format!("failed to decode {}: {}", path.display(), err))
        })?;
        if auto_orient {
            decoded = orient::auto_orient(&bytes, decoded);
        }

        let rgb = decoded.to_rgb8();
        info!(width = rgb.width(), height = rgb.height(), "Image loaded");
        self.raw = Some(rgb);
        self.contours.clear();
        Ok(self)
    }

    // -- Accessors ------------------------------------------------------------

    fn buffer(&self) -> Result<&RgbImage> {
        self.raw.as_ref().ok_or(AutocropError::NoImage)
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> Result<u32> {
        Ok(self.buffer()?.height())
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> Result<u32> {
        Ok(self.buffer()?.width())
    }

    /// Pixel at column `x`, row `y`, or `None` when out of bounds or unloaded.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.raw
            .as_ref()
            .and_then(|raw| raw.get_pixel_checked(x, y))
            .copied()
    }

    /// Detected contours, largest area first.
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Take the pixel buffer, if any.
    pub fn into_rgb(self) -> Option<RgbImage> {
        self.raw
    }

    // -- Detection ------------------------------------------------------------

    /// Detect the external contours of everything brighter than `threshold`
    /// and store them sorted by enclosed area, largest first.
    ///
    /// Replaces any previously stored contours.
    #[instrument(skip(self))]
    pub fn find_contours(&mut self, threshold: u8) -> Result<&[Contour]> {
        let contours = detect_contours(self.buffer()?, threshold);
        info!(count = contours.len(), "Contours found");
        self.contours = contours;
        Ok(&self.contours)
    }

    /// Bounding box of the contour at `index` in the sorted list.
    pub fn contour_bounds(&self, index: usize) -> Result<BoundingBox> {
        let out_of_range = AutocropError::ContourIndex {
            index,
            count: self.contours.len(),
        };
        self.contours
            .get(index)
            .and_then(Contour::bounding_box)
            .ok_or(out_of_range)
    }

    // -- Cropping -------------------------------------------------------------

    fn cropped_buffer(&self, index: usize) -> Result<RgbImage> {
        let bounds = self.contour_bounds(index)?;
        let raw = self.buffer()?;

        debug!(%bounds, "Cropping to contour bounds");
        let view = image::imageops::crop_imm(raw, bounds.x, bounds.y, bounds.width, bounds.height);
        Ok(view.to_image())
    }

    /// Crop to the bounding box of contour `index`, returning a new image
    /// without contours. `self` is left unchanged.
    #[instrument(skip(self))]
    pub fn crop_by_contour(&self, index: usize) -> Result<CropImage> {
        let cropped = self.cropped_buffer(index)?;
        info!(width = cropped.width(), height = cropped.height(), "Image cropped");
        Ok(Self::from_rgb(cropped))
    }

    /// Crop `self` to the bounding box of contour `index`.
    ///
    /// The stored contours are cleared afterwards. On error the buffer is left
    /// untouched.
    #[instrument(skip(self))]
    pub fn crop_by_contour_in_place(&mut self, index: usize) -> Result<&mut Self> {
        let cropped = self.cropped_buffer(index)?;
        info!(width = cropped.width(), height = cropped.height(), "Image cropped in place");
        self.raw = Some(cropped);
        self.contours.clear();
        Ok(self)
    }

    // -- Overlays -------------------------------------------------------------

    /// Return a copy with every stored contour outlined in `color`.
    #[instrument(skip(self))]
    pub fn draw_contours(&self, color: Rgb<u8>) -> Result<CropImage> {
        let mut canvas = self.buffer()?.clone();
        draw_outlines(&mut canvas, &self.contours, color);
        Ok(Self::from_rgb(canvas))
    }

    /// Outline every stored contour in `color` directly on `self`.
    ///
    /// The contours stay valid since the geometry is unchanged.
    #[instrument(skip(self))]
    pub fn draw_contours_in_place(&mut self, color: Rgb<u8>) -> Result<&mut Self> {
        let canvas = self.raw.as_mut().ok_or(AutocropError::NoImage)?;
        draw_outlines(canvas, &self.contours, color);
        Ok(self)
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image to a file. The format is inferred from the extension.
    ///
    /// For JPEG targets, `jpg_quality` (1-100) sets the compression quality.
    /// Other formats ignore it.
    ///
    /// The image is encoded in memory and written in one go, so a failed write
    /// surfaces as [`AutocropError::Io`].
    #[instrument(skip_all, fields(path = %path.as_ref().display(), jpg_quality = ?jpg_quality))]
    pub fn save(&self, path: impl AsRef<Path>, jpg_quality: Option<u8>) -> Result<()> {
        let path = path.as_ref();
        let raw = self.buffer()?;
        let encode_err = |err: image::ImageError| {
            AutocropError::Encode(format!("failed to save image to {}: {}", path.display(), err))
        };

        let mut bytes = Vec::new();
        match (ImageKind::from_path(path), jpg_quality) {
            (ImageKind::Jpeg, Some(quality)) => {
                validate_jpeg_quality(quality)?;
                let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
                raw.write_with_encoder(encoder).map_err(encode_err)?;
            }
            _ => {
                let format = ImageFormat::from_path(path).map_err(encode_err)?;
                raw.write_to(&mut Cursor::new(&mut bytes), format).map_err(encode_err)?;
            }
        }
        std::fs::write(path, &bytes)?;

        debug!(bytes = bytes.len(), "Image saved");
        Ok(())
    }
}

// -- Tests --------------------------------------------------------------------
