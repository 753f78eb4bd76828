// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Primary detector: binarizes the frame against the background colour,
// traces the mask, and screens the boundaries down to validated documents.
// Corners are reported in pixel coordinates with a top-left origin.

use holodoc_core::error::Result;
use holodoc_core::{Color, DetectorConfig, Document, ScreeningParams};
use image::GrayImage;
use tracing::{info, instrument};

use crate::binarize::{ColorBand, binarize};
use crate::frame::Frame;
use crate::geometry::Contour;
use crate::screening::screen_contours;
use crate::strategy::{Detection, DocumentStrategy};

/// Heuristic corner-extraction detector.
#[derive(Debug, Clone)]
pub struct CornerStrategy {
    band: ColorBand,
    config: DetectorConfig,
}

impl CornerStrategy {
    pub fn new(background: Color, config: DetectorConfig) -> Self {
        let band = ColorBand::around(background, config.effective_tolerance());
        Self { band, config }
    }
}

impl DocumentStrategy for CornerStrategy {
    fn name(&self) -> &'static str {
        "corners"
    }

    fn prepare(&self, frame: &Frame) -> Result<GrayImage> {
        Ok(binarize(frame.as_rgb(), &self.band))
    }

    fn select(&self, contours: Vec<Contour>, width: u32, height: u32) -> Result<Vec<Detection>> {
        let params = ScreeningParams::for_image(width, height, &self.config);
        let candidates = screen_contours(contours, &params)?;
        Ok(candidates
            .iter()
            .map(|candidate| Detection {
                document: candidate.to_document(),
                outline: candidate.corners.to_vec(),
            })
            .collect())
    }
}

/// Detect documents lying on a uniform `background`.
///
/// Returns `NoDocumentsFound` when every boundary is filtered out.
#[instrument(skip(frame, config), fields(width = frame.width(), height = frame.height()))]
pub fn detect_documents(
    frame: &Frame,
    background: Color,
    config: &DetectorConfig,
) -> Result<Vec<Document>> {
    config.validate()?;
    let strategy = CornerStrategy::new(background, config.clone());
    let detections = strategy.detect(frame)?;
    info!(documents = detections.len(), "Document detection complete");
    Ok(detections.into_iter().map(|d| d.document).collect())
}
