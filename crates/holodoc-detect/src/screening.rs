// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour screening: turns traced boundaries into validated four-corner
// candidates through successive filtering passes:
//
// 1. perimeter / point-count filter
// 2. corner extraction
// 3. nested and duplicate suppression (largest area wins)
// 4. opposite-side ratio validation
//
// Every pass is a pure `Vec -> Vec` transformation; the pipeline stops with
// `NoDocumentsFound` as soon as a pass leaves nothing.

use holodoc_core::error::{HoloDocError, Result};
use holodoc_core::{Document, ScreeningParams};
use tracing::{debug, instrument, trace};

use crate::corners::extract_corners;
use crate::geometry::{Contour, Pt, centroid, enclosed_area, in_range, perimeter, squared_distance};

/// A contour reduced to four ordered corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub corners: [Pt; 4],
    pub perimeter: f64,
    pub centroid: Pt,
    pub area: f64,
}

impl Candidate {
    pub fn new(corners: [Pt; 4]) -> Self {
        let perimeter = perimeter(&corners);
        let area = enclosed_area(&corners);
        let centroid = centroid(&corners).unwrap_or(corners[0]);
        Self {
            corners,
            perimeter,
            centroid,
            area,
        }
    }

    pub fn to_document(&self) -> Document {
        Document::new(self.corners.map(|p| [p.x, p.y]))
    }

    /// Squared side lengths `[d(0,1), d(2,3), d(1,2), d(3,0)]`.
    fn squared_sides(&self) -> [i64; 4] {
        let c = &self.corners;
        [
            squared_distance(c[0], c[1]),
            squared_distance(c[2], c[3]),
            squared_distance(c[1], c[2]),
            squared_distance(c[3], c[0]),
        ]
    }
}

/// Run every screening pass over `contours`.
///
/// Accepted candidates come back in descending order of enclosed area.
#[instrument(skip(contours, params), fields(contours = contours.len()))]
pub fn screen_contours(contours: Vec<Contour>, params: &ScreeningParams) -> Result<Vec<Candidate>> {
    if contours.is_empty() {
        return Err(HoloDocError::NoDocumentsFound);
    }

    let contours = filter_by_length(contours, params);
    debug!(remaining = contours.len(), "Length filter applied");
    non_empty(&contours)?;

    let candidates = reduce_to_corners(contours, params);
    debug!(remaining = candidates.len(), "Corner extraction applied");
    non_empty(&candidates)?;

    let candidates = suppress_nested(candidates, params);
    debug!(remaining = candidates.len(), "Nested suppression applied");

    let candidates = validate_shape(candidates, params.side_tolerance);
    debug!(remaining = candidates.len(), "Shape validation applied");
    non_empty(&candidates)?;

    Ok(candidates)
}

fn non_empty<T>(items: &[T]) -> Result<()> {
    if items.is_empty() {
        Err(HoloDocError::NoDocumentsFound)
    } else {
        Ok(())
    }
}

/// Drop contours with fewer than four points or a perimeter out of bounds.
pub fn filter_by_length(contours: Vec<Contour>, params: &ScreeningParams) -> Vec<Contour> {
    contours
        .into_iter()
        .filter(|contour| contour.len() >= 4 && params.accepts_length(perimeter(contour)))
        .collect()
}

/// Reduce each contour to four corners, dropping those that cannot be reduced.
pub fn reduce_to_corners(contours: Vec<Contour>, params: &ScreeningParams) -> Vec<Candidate> {
    contours
        .iter()
        .filter_map(|contour| match extract_corners(contour, params) {
            Ok(corners) => Some(Candidate::new(corners)),
            Err(reason) => {
                trace!(?reason, points = contour.len(), "Corner extraction failed");
                None
            }
        })
        .collect()
}

/// Remove duplicate and nested candidates.
///
/// Candidates are sorted by area, largest first. Each surviving candidate `i`
/// removes every smaller survivor `j` whose centroid lies closer to `i`'s
/// centroid than `center_dist`, or closer than `i`'s own first corner.
pub fn suppress_nested(mut candidates: Vec<Candidate>, params: &ScreeningParams) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.area.total_cmp(&a.area));

    let mut keep = vec![true; candidates.len()];
    for i in 0..candidates.len() {
        if !keep[i] || !params.accepts_length(candidates[i].perimeter) {
            continue;
        }
        let outer = &candidates[i];
        let radius_sq = squared_distance(outer.centroid, outer.corners[0]);
        for j in (i + 1)..candidates.len() {
            if !keep[j] {
                continue;
            }
            let dist = squared_distance(outer.centroid, candidates[j].centroid);
            if (dist as f64) < params.center_dist || dist < radius_sq {
                trace!(kept = i, dropped = j, dist, "Nested candidate suppressed");
                keep[j] = false;
            }
        }
    }

    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(candidate, kept)| kept.then_some(candidate))
        .collect()
}

/// Keep candidates whose opposite sides have similar lengths.
///
/// Both `d(0,1) / d(2,3)` and `d(1,2) / d(3,0)` (squared lengths) must lie in
/// `[1 - tolerance, 1 + tolerance]`.
pub fn validate_shape(candidates: Vec<Candidate>, tolerance: f64) -> Vec<Candidate> {
    let (min, max) = (1.0 - tolerance, 1.0 + tolerance);
    candidates
        .into_iter()
        .filter(|candidate| {
            let [s01, s23, s12, s30] = candidate.squared_sides();
            if s23 == 0 || s30 == 0 {
                return false;
            }
            let ratio_1 = s01 as f64 / s23 as f64;
            let ratio_2 = s12 as f64 / s30 as f64;
            in_range(ratio_1, min, max) && in_range(ratio_2, min, max)
        })
        .collect()
}
