// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// holodoc-detect: Quadrilateral document detection for captured frames.
//
// Provides the primary heuristic detector (colour-band binarization, contour
// screening, corner extraction, nested suppression, side-ratio validation)
// and the polygon-approximation detector used for visual overlays.

pub mod binarize;
pub mod corners;
pub mod detector;
pub mod frame;
pub mod geometry;
pub mod polygon;
pub mod quad;
pub mod screening;
pub mod strategy;

// Re-export the primary entry points so callers can use `holodoc_detect::Frame` etc.
pub use detector::{CornerStrategy, detect_documents};
pub use frame::Frame;
pub use polygon::{OverlayDetection, PolygonStrategy, detect_with_overlay};
pub use strategy::{Detection, DocumentStrategy};
