// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner extraction: collapses a closed boundary into the four points most
// likely to be the corners of a quadrilateral.
//
// The search first widens a diagonal greedily (farthest point from the
// centroid, then farthest point from that), then takes on each side of the
// diagonal the point spanning the largest triangle with it.

use std::collections::BTreeSet;

use holodoc_core::ScreeningParams;
use tracing::trace;

use crate::geometry::{Pt, centroid, cross, distance, farthest_from, perimeter};

/// Why a contour could not be reduced to four corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerRejection {
    TooFewPoints,
    /// One side of the diagonal has no point off the line.
    Collinear,
    /// The four selected indices are not pairwise distinct.
    Degenerate,
    /// The four-corner outline falls outside the perimeter bounds.
    PerimeterOutOfRange,
}

/// Reduce `contour` to `[diag1, wing_a, diag2, wing_b]`.
///
/// A contour of exactly four points is returned as-is. Alternating diagonal
/// and wing points always yields a simple quadrilateral.
pub fn extract_corners(
    contour: &[Pt],
    params: &ScreeningParams,
) -> Result<[Pt; 4], CornerRejection> {
    if contour.len() < 4 {
        return Err(CornerRejection::TooFewPoints);
    }
    if contour.len() == 4 {
        return Ok([contour[0], contour[1], contour[2], contour[3]]);
    }

    let center = centroid(contour).ok_or(CornerRejection::TooFewPoints)?;
    let diag1 = farthest_from(contour, center);
    let diag2 = farthest_from(contour, contour[diag1]);

    let (wing_a, wing_b) = widest_wings(contour, diag1, diag2);
    let (Some(wing_a), Some(wing_b)) = (wing_a, wing_b) else {
        return Err(CornerRejection::Collinear);
    };

    let distinct: BTreeSet<usize> = [diag1, wing_a, diag2, wing_b].into_iter().collect();
    if distinct.len() != 4 {
        return Err(CornerRejection::Degenerate);
    }

    let quad = [
        contour[diag1],
        contour[wing_a],
        contour[diag2],
        contour[wing_b],
    ];
    let reduced = perimeter(&quad);
    if !params.accepts_length(reduced) {
        trace!(reduced, "Corner outline perimeter out of range");
        return Err(CornerRejection::PerimeterOutOfRange);
    }
    Ok(quad)
}

/// For each side of the diagonal `diag1 -> diag2`, the index of the point
/// spanning the largest triangle with the diagonal.
///
/// Side A holds points with a positive cross product, side B those with a
/// negative one; points on the diagonal line belong to neither.
fn widest_wings(points: &[Pt], diag1: usize, diag2: usize) -> (Option<usize>, Option<usize>) {
    let a = points[diag1];
    let b = points[diag2];
    let ab = distance(a, b);

    let mut best: [(Option<usize>, f64); 2] = [(None, 0.0), (None, 0.0)];
    for (i, c) in points.iter().enumerate() {
        let d = cross(a, b, *c);
        if d == 0 {
            continue;
        }
        let side = if d > 0 { 0 } else { 1 };
        let score = heron_surrogate(ab, distance(a, *c), distance(b, *c));
        if score > best[side].1 {
            best[side] = (Some(i), score);
        }
    }
    (best[0].0, best[1].0)
}

/// Heron's formula without the final square root: monotone in triangle area.
fn heron_surrogate(ab: f64, ac: f64, bc: f64) -> f64 {
    let s = (ab + ac + bc) / 2.0;
    s * (s - ab) * (s - ac) * (s - bc)
}
