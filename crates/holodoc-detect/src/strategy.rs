// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared contract for the detection strategies: produce a single-channel
// mask from a frame, trace its boundaries, and select documents from the
// traced contour set.

use holodoc_core::Document;
use holodoc_core::error::Result;
use image::GrayImage;
use imageproc::contours::find_contours;
use tracing::debug;

use crate::frame::Frame;
use crate::geometry::{Contour, Pt};

/// One accepted document together with the outline that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub document: Document,
    pub outline: Vec<Pt>,
}

/// A complete "frame -> documents" detector.
pub trait DocumentStrategy {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Reduce the frame to a mask whose non-zero pixels are traced.
    fn prepare(&self, frame: &Frame) -> Result<GrayImage>;

    /// Select documents from the traced contours of a `width x height` frame.
    fn select(&self, contours: Vec<Contour>, width: u32, height: u32) -> Result<Vec<Detection>>;

    /// Trace the prepared mask and select documents from it.
    fn detect(&self, frame: &Frame) -> Result<Vec<Detection>> {
        let mask = self.prepare(frame)?;
        let contours = trace_boundaries(&mask);
        debug!(strategy = self.name(), contours = contours.len(), "Boundaries traced");
        self.select(contours, frame.width(), frame.height())
    }
}

/// Trace every outer and hole border of the non-zero regions of `mask`.
pub fn trace_boundaries(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(mask)
        .into_iter()
        .map(|contour| contour.points)
        .collect()
}
