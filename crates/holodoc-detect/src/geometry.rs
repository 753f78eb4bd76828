// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Integer-point geometry shared by the detectors: centroids, distances,
// perimeters, and enclosed areas.

use imageproc::point::Point;

/// Integer pixel coordinate.
pub type Pt = Point<i32>;

/// An ordered, closed boundary traced from a mask.
pub type Contour = Vec<Pt>;

/// Mean of all points, truncated toward zero. `None` for an empty slice.
pub fn centroid(points: &[Pt]) -> Option<Pt> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as i64;
    let (sx, sy) = points.iter().fold((0i64, 0i64), |(sx, sy), p| {
        (sx + p.x as i64, sy + p.y as i64)
    });
    Some(Point::new((sx / n) as i32, (sy / n) as i32))
}

/// Squared Euclidean distance. Widened to `i64` so large frames cannot overflow.
pub fn squared_distance(a: Pt, b: Pt) -> i64 {
    let dx = (b.x - a.x) as i64;
    let dy = (b.y - a.y) as i64;
    dx * dx + dy * dy
}

pub fn distance(a: Pt, b: Pt) -> f64 {
    (squared_distance(a, b) as f64).sqrt()
}

/// Index of the first point with the largest squared distance from `origin`.
///
/// Falls back to index 0 when every point coincides with `origin`.
pub fn farthest_from(points: &[Pt], origin: Pt) -> usize {
    let mut best = 0;
    let mut best_dist = 0;
    for (i, p) in points.iter().enumerate() {
        let d = squared_distance(*p, origin);
        if d > best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Inclusive range test.
pub fn in_range(x: f64, min: f64, max: f64) -> bool {
    min <= x && x <= max
}

/// Z component of `(a - origin) x (b - origin)`.
pub fn cross(origin: Pt, a: Pt, b: Pt) -> i64 {
    let (ax, ay) = ((a.x - origin.x) as i64, (a.y - origin.y) as i64);
    let (bx, by) = ((b.x - origin.x) as i64, (b.y - origin.y) as i64);
    ax * by - ay * bx
}

/// Length of the closed polyline through `points`.
pub fn perimeter(points: &[Pt]) -> f64 {
    imageproc::geometry::arc_length(points, true)
}

/// Unsigned area enclosed by `points`, whatever their winding.
pub fn enclosed_area(points: &[Pt]) -> f64 {
    imageproc::geometry::contour_area(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Pt> {
        vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ]
    }

    #[test]
    fn centroid_truncates() {
        let pts = vec![Point::new(0, 0), Point::new(3, 0), Point::new(0, 4)];
        assert_eq!(centroid(&pts), Some(Point::new(1, 1)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn distances() {
        let a = Point::new(1, 1);
        let b = Point::new(4, 5);
        assert_eq!(squared_distance(a, b), 25);
        assert!((distance(a, b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn farthest_prefers_first_maximum() {
        let pts = square();
        assert_eq!(farthest_from(&pts, Point::new(5, 5)), 0);
        assert_eq!(farthest_from(&pts, Point::new(0, 0)), 2);
        assert_eq!(farthest_from(&[Point::new(3, 3)], Point::new(3, 3)), 0);
    }

    #[test]
    fn range_is_inclusive() {
        assert!(in_range(0.75, 0.75, 1.25));
        assert!(in_range(1.25, 0.75, 1.25));
        assert!(!in_range(1.2501, 0.75, 1.25));
        assert!(!in_range(f64::NAN, 0.75, 1.25));
    }

    #[test]
    fn cross_sign_follows_orientation() {
        let o = Point::new(0, 0);
        assert!(cross(o, Point::new(1, 0), Point::new(0, 1)) > 0);
        assert!(cross(o, Point::new(0, 1), Point::new(1, 0)) < 0);
        assert_eq!(cross(o, Point::new(1, 1), Point::new(2, 2)), 0);
    }

    #[test]
    fn square_perimeter_and_area() {
        assert!((perimeter(&square()) - 40.0).abs() < 1e-9);
        assert!((enclosed_area(&square()) - 100.0).abs() < 1e-9);

        let mut reversed = square();
        reversed.reverse();
        assert!((enclosed_area(&reversed) - 100.0).abs() < 1e-9);
        assert_eq!(enclosed_area(&square()[..2]), 0.0);
    }
}
