// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Point-in-quadrilateral containment for convex quads of either winding.

use crate::geometry::{Pt, cross};

/// True when `point` lies inside or on the boundary of the convex quad.
///
/// The point is inside when it sits on the same side of all four edges,
/// which holds for clockwise and counter-clockwise corner order alike.
/// A degenerate quad (all corners collinear) contains only points on its line.
pub fn contains(quad: &[Pt; 4], point: Pt) -> bool {
    let mut has_positive = false;
    let mut has_negative = false;
    for i in 0..4 {
        let side = cross(quad[i], quad[(i + 1) % 4], point);
        has_positive |= side > 0;
        has_negative |= side < 0;
        if has_positive && has_negative {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::point::Point;

    fn square() -> [Pt; 4] {
        [
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ]
    }

    #[test]
    fn interior_and_exterior() {
        let q = square();
        assert!(contains(&q, Point::new(5, 5)));
        assert!(!contains(&q, Point::new(11, 5)));
        assert!(!contains(&q, Point::new(-1, -1)));
    }

    #[test]
    fn boundary_counts_as_inside() {
        let q = square();
        assert!(contains(&q, Point::new(0, 0)));
        assert!(contains(&q, Point::new(10, 4)));
    }

    #[test]
    fn winding_does_not_matter() {
        let mut q = square();
        q.reverse();
        assert!(contains(&q, Point::new(3, 7)));
        assert!(!contains(&q, Point::new(30, 7)));
    }

    #[test]
    fn skewed_quad() {
        let q = [
            Point::new(30, 40),
            Point::new(150, 20),
            Point::new(170, 140),
            Point::new(50, 160),
        ];
        assert!(contains(&q, Point::new(100, 90)));
        // Above the top edge, though within the bounding box.
        assert!(!contains(&q, Point::new(60, 30)));
    }
}
