// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera frame: converts packed host pixel buffers into the RGB working
// image the detectors operate on, and back.

use holodoc_core::error::{HoloDocError, Result};
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use tracing::{debug, info, instrument, warn};

/// Bytes per pixel of the packed buffers handed over by the host.
pub const HOST_BYTES_PER_PIXEL: usize = 4;

/// A single captured frame in RGB, top-left origin.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    // -- Construction ---------------------------------------------------------

    /// Wrap a packed RGBA buffer (`width * height * 4` bytes, row-major).
    ///
    /// The alpha channel is discarded.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_rgba_bytes(data: &[u8], width: u32, height: u32) -> Result<Self> {
        if data.is_empty() || width == 0 || height == 0 {
            warn!(width, height, "Rejected empty frame");
            return Err(HoloDocError::EmptyInput(format!(
                "{} bytes for a {}x{} frame",
                data.len(),
                width,
                height
            )));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(HOST_BYTES_PER_PIXEL));
        if expected != Some(data.len()) {
            warn!(width, height, "Rejected frame with mismatched buffer length");
            return Err(HoloDocError::UnsupportedFormat(format!(
                "{} bytes is not {}x{} at {} bytes per pixel",
                data.len(),
                width,
                height,
                HOST_BYTES_PER_PIXEL
            )));
        }

        let rgba = RgbaImage::from_raw(width, height, data.to_vec()).ok_or_else(|| {
            HoloDocError::UnsupportedFormat(format!("cannot view buffer as {width}x{height} RGBA"))
        })?;
        debug!(width, height, "Frame converted from RGBA");
        Ok(Self {
            image: DynamicImage::ImageRgba8(rgba).to_rgb8(),
        })
    }

    /// Load a frame from an image file (PNG, JPEG, etc.).
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            HoloDocError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Frame loaded");
        Ok(Self::from_dynamic(img))
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }

    pub fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    /// Luma conversion of the frame.
    pub fn to_gray(&self) -> GrayImage {
        image::imageops::grayscale(&self.image)
    }

    // -- Output ---------------------------------------------------------------

    /// Packed RGB bytes, 3 per pixel, row-major.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.image.as_raw().clone()
    }

    /// Write the frame to a file. The format is inferred from the extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.image.save(path.as_ref()).map_err(|err| {
            HoloDocError::ImageError(format!(
                "failed to save frame to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}
