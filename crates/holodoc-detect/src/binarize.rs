// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colour-range binarization: marks pixels whose colour lies within a band
// around the reference background.

use holodoc_core::Color;
use holodoc_core::config::MAX_COLOR_RANGE;
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::map::map_colors;
use tracing::{debug, instrument};

/// Per-channel inclusive bounds of the background colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBand {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ColorBand {
    /// Build the band `[background - tolerance, background + tolerance]`.
    ///
    /// The tolerance is clamped to [`MAX_COLOR_RANGE`]. When one bound is
    /// clipped at 0 or 255 the overflow is added to the opposite bound, so the
    /// band keeps its full width of `2 * tolerance`.
    pub fn around(background: Color, tolerance: u8) -> Self {
        let range = tolerance.min(MAX_COLOR_RANGE) as i16;
        let mut lower = [0u8; 3];
        let mut upper = [0u8; 3];

        for (i, channel) in background.channels().into_iter().enumerate() {
            let mut lo = channel as i16 - range;
            let mut hi = channel as i16 + range;
            if lo < 0 {
                hi -= lo;
                lo = 0;
            }
            if hi > 255 {
                lo -= hi - 255;
                hi = 255;
            }
            lower[i] = lo as u8;
            upper[i] = hi as u8;
        }

        Self { lower, upper }
    }

    pub fn contains(&self, pixel: &Rgb<u8>) -> bool {
        (0..3).all(|i| self.lower[i] <= pixel[i] && pixel[i] <= self.upper[i])
    }
}

/// Produce a mask with background-coloured pixels set to 255 and all others 0.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn binarize(image: &RgbImage, band: &ColorBand) -> GrayImage {
    debug!(lower = ?band.lower, upper = ?band.upper, "Binarizing against colour band");
    map_colors(image, |pixel| {
        if band.contains(&pixel) {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
