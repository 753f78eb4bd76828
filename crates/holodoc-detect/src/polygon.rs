// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Polygon-approximation detector: edge detection, boundary tracing, and
// Douglas–Peucker simplification, keeping every boundary that simplifies to
// exactly four points. Used for visual overlays.
//
// Corners use a bottom-left origin: each y is reported as `height - y`.

use holodoc_core::error::{HoloDocError, Result};
use holodoc_core::{DetectorConfig, Document, EdgeConfig};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use imageproc::edges::canny;
use imageproc::filter::box_filter;
use imageproc::geometry::approximate_polygon_dp;
use tracing::{debug, info, instrument, trace};

use crate::frame::Frame;
use crate::geometry::{Contour, Pt, enclosed_area, farthest_from, perimeter};
use crate::strategy::{Detection, DocumentStrategy};

/// Stroke colour for accepted outlines.
pub const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
/// Stroke width for accepted outlines, in pixels.
pub const OUTLINE_WIDTH: u32 = 2;

/// Edge-map plus polygon-simplification detector.
#[derive(Debug, Clone)]
pub struct PolygonStrategy {
    config: DetectorConfig,
}

impl PolygonStrategy {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }
}

impl DocumentStrategy for PolygonStrategy {
    fn name(&self) -> &'static str {
        "polygon"
    }

    fn prepare(&self, frame: &Frame) -> Result<GrayImage> {
        edge_map(&frame.to_gray(), &self.config.edges)
    }

    /// Boundaries are visited largest enclosed area first.
    fn select(&self, mut contours: Vec<Contour>, _width: u32, height: u32) -> Result<Vec<Detection>> {
        contours.sort_by(|a, b| enclosed_area(b).total_cmp(&enclosed_area(a)));

        let detections: Vec<Detection> = contours
            .into_iter()
            .filter_map(|contour| {
                let quad = simplify_to_quad(&contour, self.config.approx_epsilon_ratio)?;
                Some(Detection {
                    document: order_corners(quad, height),
                    outline: contour,
                })
            })
            .collect();

        if detections.is_empty() {
            return Err(HoloDocError::NoDocumentsFound);
        }
        Ok(detections)
    }
}

/// Box blur (3x3) followed by Canny edge detection.
pub fn edge_map(gray: &GrayImage, edges: &EdgeConfig) -> Result<GrayImage> {
    if edges.aperture != 3 {
        return Err(HoloDocError::InvalidArgument(format!(
            "edge aperture {} is not supported",
            edges.aperture
        )));
    }
    let blurred = box_filter(gray, 1, 1);
    Ok(canny(&blurred, edges.low_threshold, edges.high_threshold))
}

/// Simplify a closed boundary with tolerance `epsilon_ratio * perimeter`;
/// `Some` only when exactly four vertices remain.
fn simplify_to_quad(contour: &[Pt], epsilon_ratio: f64) -> Option<[Pt; 4]> {
    if contour.len() < 4 {
        return None;
    }
    let epsilon = epsilon_ratio * perimeter(contour);
    if epsilon <= 0.0 {
        return None;
    }
    let approx = simplify_closed(contour, epsilon);
    trace!(points = contour.len(), vertices = approx.len(), "Boundary simplified");
    match approx.as_slice() {
        [a, b, c, d] => Some([*a, *b, *c, *d]),
        _ => None,
    }
}

/// Douglas–Peucker on a closed ring.
///
/// The ring is anchored at two extreme points (the farthest point from the
/// first one, and the farthest point from that) and each half is simplified
/// as an open curve, so the arbitrary trace start never becomes a vertex.
fn simplify_closed(contour: &[Pt], epsilon: f64) -> Vec<Pt> {
    let n = contour.len();
    let a = farthest_from(contour, contour[0]);
    let b = farthest_from(contour, contour[a]);
    if a == b {
        return vec![contour[a]];
    }

    let ring: Vec<Pt> = contour[a..].iter().chain(&contour[..a]).copied().collect();
    let split = (b + n - a) % n;

    let mut vertices = approximate_polygon_dp(&ring[..=split], epsilon, false);
    let closing: Vec<Pt> = ring[split..].iter().chain(&ring[..1]).copied().collect();
    let tail = approximate_polygon_dp(&closing, epsilon, false);

    vertices.pop();
    vertices.extend_from_slice(&tail[..tail.len() - 1]);
    vertices
}

/// Put four points into the overlay convention and flip y to a bottom-left
/// origin.
///
/// Points are sorted by x; the two middle points are then sorted by
/// descending y, and the result is emitted as `[p0, p1, p3, p2]`.
pub fn order_corners(points: [Pt; 4], height: u32) -> Document {
    let mut pts = points;
    pts.sort_by_key(|p| p.x);
    pts[1..3].sort_by(|a, b| b.y.cmp(&a.y));

    let flip = |p: Pt| [p.x, height as i32 - p.y];
    Document::new([flip(pts[0]), flip(pts[1]), flip(pts[3]), flip(pts[2])])
}

/// Draw each closed outline onto a copy of `image` with a 2-pixel green stroke.
///
/// Consecutive points are joined by line segments, the last back to the
/// first. The stroke is the segment swept by an `OUTLINE_WIDTH` square brush
/// anchored at its top-left corner.
pub fn annotate<'a>(image: &RgbImage, outlines: impl IntoIterator<Item = &'a [Pt]>) -> RgbImage {
    let mut out = image.clone();
    let width = OUTLINE_WIDTH as i32;
    for outline in outlines {
        for (i, p1) in outline.iter().enumerate() {
            let p2 = outline[(i + 1) % outline.len()];
            for dy in 0..width {
                for dx in 0..width {
                    draw_line_segment_mut(
                        &mut out,
                        ((p1.x + dx) as f32, (p1.y + dy) as f32),
                        ((p2.x + dx) as f32, (p2.y + dy) as f32),
                        OUTLINE_COLOR,
                    );
                }
            }
        }
    }
    out
}

/// Result of the overlay detector: documents plus the annotated frame.
#[derive(Debug, Clone)]
pub struct OverlayDetection {
    pub documents: Vec<Document>,
    pub overlay: RgbImage,
}

/// Run the polygon detector, keep at most `max_documents`, and draw them.
///
/// An empty document list is not an error here: the overlay is still
/// produced so the caller can display the frame.
#[instrument(skip(frame, config), fields(width = frame.width(), height = frame.height()))]
pub fn detect_with_overlay(
    frame: &Frame,
    max_documents: usize,
    config: &DetectorConfig,
) -> Result<OverlayDetection> {
    config.validate()?;
    let strategy = PolygonStrategy::new(config.clone());
    let mut detections = match strategy.detect(frame) {
        Ok(detections) => detections,
        Err(HoloDocError::NoDocumentsFound) => Vec::new(),
        Err(err) => return Err(err),
    };
    detections.truncate(max_documents);
    debug!(kept = detections.len(), max_documents, "Quadrilaterals capped");

    let overlay = annotate(
        frame.as_rgb(),
        detections.iter().map(|d| d.outline.as_slice()),
    );
    info!(documents = detections.len(), "Overlay detection complete");
    Ok(OverlayDetection {
        documents: detections.into_iter().map(|d| d.document).collect(),
        overlay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::point::Point;

    fn rectangle_outline(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Pt> {
        let mut pts = Vec::new();
        for x in x0..x1 {
            pts.push(Point::new(x, y0));
        }
        for y in y0..y1 {
            pts.push(Point::new(x1, y));
        }
        for x in (x0 + 1..=x1).rev() {
            pts.push(Point::new(x, y1));
        }
        for y in (y0 + 1..=y1).rev() {
            pts.push(Point::new(x0, y));
        }
        pts
    }

    #[test]
    fn order_flips_y_against_height() {
        let square = [
            Point::new(10, 10),
            Point::new(60, 10),
            Point::new(60, 60),
            Point::new(10, 60),
        ];
        let doc = order_corners(square, 100);
        let original_ys = [10, 60];
        for [_, y] in doc.corners {
            assert!(original_ys.iter().any(|oy| y == 100 - oy), "y {y}");
        }
    }

    #[test]
    fn order_convention() {
        // Leftmost first, then the lower middle point, the rightmost, the upper middle point.
        let pts = [
            Point::new(100, 10),
            Point::new(0, 50),
            Point::new(50, 0),
            Point::new(50, 90),
        ];
        let doc = order_corners(pts, 100);
        assert_eq!(doc.corners, [[0, 50], [50, 10], [100, 90], [50, 100]]);
    }

    #[test]
    fn rectangle_contour_simplifies_to_quad() {
        let outline = rectangle_outline(20, 30, 120, 90);
        let quad = simplify_to_quad(&outline, 0.02).expect("four vertices");
        for corner in [(20, 30), (120, 30), (120, 90), (20, 90)] {
            assert!(
                quad.iter().any(|p| (p.x, p.y) == corner),
                "missing {corner:?} in {quad:?}"
            );
        }
    }

    #[test]
    fn select_skips_non_quadrilaterals() {
        let strategy = PolygonStrategy::new(DetectorConfig::default());
        let triangle: Vec<Pt> = (0..40)
            .map(|i| Point::new(i, 0))
            .chain((0..40).map(|i| Point::new(40 - i, i)))
            .chain((0..40).map(|i| Point::new(0, 40 - i)))
            .collect();
        let square = rectangle_outline(10, 10, 70, 70);

        let found = strategy
            .select(vec![triangle, square.clone()], 100, 100)
            .expect("square accepted");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].outline, square);
        for [_, y] in found[0].document.corners {
            assert!(y == 100 - 10 || y == 100 - 70);
        }
    }

    #[test]
    fn select_visits_largest_area_first() {
        let strategy = PolygonStrategy::new(DetectorConfig::default());
        let small = rectangle_outline(5, 5, 25, 25);
        let big = rectangle_outline(30, 30, 90, 90);

        let found = strategy
            .select(vec![small.clone(), big.clone()], 100, 100)
            .expect("both squares accepted");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].outline, big);
        assert_eq!(found[1].outline, small);
    }

    #[test]
    fn select_reports_no_documents() {
        let strategy = PolygonStrategy::new(DetectorConfig::default());
        assert!(matches!(
            strategy.select(Vec::new(), 10, 10),
            Err(HoloDocError::NoDocumentsFound)
        ));
    }

    #[test]
    fn annotate_strokes_sparse_outline() {
        let image = RgbImage::new(20, 20);
        // Corners only: every edge pixel comes from a drawn segment.
        let outline = vec![
            Point::new(2, 2),
            Point::new(15, 2),
            Point::new(15, 15),
            Point::new(2, 15),
        ];
        let out = annotate(&image, [outline.as_slice()]);

        // Top edge, two pixels thick.
        assert_eq!(*out.get_pixel(8, 2), OUTLINE_COLOR);
        assert_eq!(*out.get_pixel(8, 3), OUTLINE_COLOR);
        // Right and bottom edges.
        assert_eq!(*out.get_pixel(15, 9), OUTLINE_COLOR);
        assert_eq!(*out.get_pixel(9, 15), OUTLINE_COLOR);
        // Closing edge from the last point back to the first.
        assert_eq!(*out.get_pixel(2, 8), OUTLINE_COLOR);
        assert_eq!(*out.get_pixel(3, 8), OUTLINE_COLOR);
        // Interior and exterior are untouched.
        assert_eq!(*out.get_pixel(8, 8), Rgb([0, 0, 0]));
        assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*out.get_pixel(18, 8), Rgb([0, 0, 0]));
    }

    #[test]
    fn annotate_leaves_source_image_unchanged() {
        let image = RgbImage::from_pixel(8, 8, Rgb([9, 9, 9]));
        let outline = vec![Point::new(1, 1), Point::new(6, 1), Point::new(6, 6)];
        let out = annotate(&image, [outline.as_slice()]);
        assert!(image.pixels().all(|p| *p == Rgb([9, 9, 9])));
        assert_ne!(out, image);
    }

    #[test]
    fn synthetic_document_is_found_and_outlined() {
        let (w, h) = (240u32, 200u32);
        let mut img = RgbImage::from_pixel(w, h, Rgb([30, 30, 30]));
        for y in 50..150 {
            for x in 60..180 {
                img.put_pixel(x, y, Rgb([240, 240, 240]));
            }
        }
        let frame = Frame::from_rgb(img);
        let result =
            detect_with_overlay(&frame, 4, &DetectorConfig::default()).expect("overlay result");

        assert!(!result.documents.is_empty());
        assert!(result.documents.len() <= 4);
        assert_eq!(result.overlay.dimensions(), (w, h));
        assert!(result.overlay.pixels().any(|p| *p == OUTLINE_COLOR));

        let expected = [[60, 150], [60, 50], [180, 50], [180, 150]];
        let doc = &result.documents[0];
        for [ex, ey] in expected {
            assert!(
                doc.corners
                    .iter()
                    .any(|[x, y]| (x - ex).abs() <= 4 && ((h as i32 - y) - ey).abs() <= 4),
                "corner ({ex}, {ey}) missing from {:?}",
                doc.corners
            );
        }
    }

    #[test]
    fn cap_keeps_the_larger_sheet() {
        let (w, h) = (300u32, 200u32);
        let mut img = RgbImage::from_pixel(w, h, Rgb([30, 30, 30]));
        // Large sheet on the left, small sheet on the right.
        for y in 30..170 {
            for x in 20..140 {
                img.put_pixel(x, y, Rgb([240, 240, 240]));
            }
        }
        for y in 60..120 {
            for x in 180..260 {
                img.put_pixel(x, y, Rgb([240, 240, 240]));
            }
        }
        let frame = Frame::from_rgb(img);
        let result =
            detect_with_overlay(&frame, 1, &DetectorConfig::default()).expect("overlay result");

        assert_eq!(result.documents.len(), 1);
        for [x, y] in result.documents[0].corners {
            assert!((16..=144).contains(&x), "x {x} is not on the large sheet");
            assert!((26..=174).contains(&(h as i32 - y)), "y {y} is not on the large sheet");
        }
    }

    #[test]
    fn zero_cap_keeps_overlay() {
        let frame = Frame::from_rgb(RgbImage::from_pixel(50, 40, Rgb([10, 10, 10])));
        let result = detect_with_overlay(&frame, 0, &DetectorConfig::default()).expect("overlay");
        assert!(result.documents.is_empty());
        assert_eq!(result.overlay, *frame.as_rgb());
    }
}
