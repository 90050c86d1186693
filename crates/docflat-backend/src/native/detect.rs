// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour-based document detection: blur, Canny, outer contours, polygon
// simplification and corner selection, with a histogram-equalized retry.

use docflat_core::geometry::{distance, shoelace_area};
use docflat_core::{Pixel, Point2D, Quadrilateral};
use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::contrast::equalize_histogram;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;
use tracing::{debug, instrument, trace};

/// Canny hysteresis low threshold.
pub const CANNY_LOW: f32 = 50.0;

/// Canny high thresholds, tried in order.
pub const CANNY_HIGH_SCHEDULE: [f32; 3] = [100.0, 150.0, 300.0];

/// Gaussian sigmas matching 3, 7, 11 and 15 pixel kernels, tried in order
/// for every Canny threshold.
pub const BLUR_SIGMA_SCHEDULE: [f32; 4] = [0.8, 1.4, 2.0, 2.6];

/// Douglas-Peucker tolerance as a fraction of the contour perimeter.
const APPROX_EPSILON_FRACTION: f64 = 0.01;

/// Find the document in a grayscale image.
///
/// Runs the full threshold/blur sweep; if nothing qualifies, runs it once
/// more on a histogram-equalized copy to rescue low-contrast photos.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn detect_document(gray: &GrayImage, min_document_fraction: f64) -> Option<Quadrilateral<Pixel>> {
    if let Some(quad) = sweep(gray, min_document_fraction) {
        return Some(quad);
    }
    debug!("no document on first pass, retrying with equalized histogram");
    sweep(&equalize_histogram(gray), min_document_fraction)
}

fn sweep(gray: &GrayImage, min_document_fraction: f64) -> Option<Quadrilateral<Pixel>> {
    for high in CANNY_HIGH_SCHEDULE {
        for sigma in BLUR_SIGMA_SCHEDULE {
            let blurred = gaussian_blur_f32(gray, sigma);
            let edges = canny(&blurred, CANNY_LOW, high);
            if let Some(quad) = quad_from_edges(&edges, min_document_fraction) {
                debug!(canny_high = high, sigma, "document outline found");
                return Some(quad);
            }
            trace!(canny_high = high, sigma, "no outline at this setting");
        }
    }
    None
}

/// Turn a binary edge map into document corners.
///
/// Takes the largest outer contour, simplifies it, keeps one extreme point
/// per quadrant and rejects outlines whose bounding box covers less than
/// `min_document_fraction` of the image.
pub fn quad_from_edges(edges: &GrayImage, min_document_fraction: f64) -> Option<Quadrilateral<Pixel>> {
    let contours = find_contours::<i32>(edges);
    let outline = contours
        .iter()
        .filter(|contour| contour.parent.is_none() && contour.border_type == BorderType::Outer)
        .map(|contour| (polygon_area(&contour.points), contour))
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, contour)| contour)?;

    let epsilon = APPROX_EPSILON_FRACTION * arc_length(&outline.points, true);
    let simplified = approximate_polygon_dp(&outline.points, epsilon, true);
    let points: Vec<Point2D> = simplified
        .iter()
        .map(|p| Point2D::new(f64::from(p.x), f64::from(p.y)))
        .collect();

    let corners = select_corners(&points)?;

    let image_area = f64::from(edges.width()) * f64::from(edges.height());
    let bbox_area = bounding_box_area(&corners);
    if bbox_area < image_area * min_document_fraction {
        trace!(bbox_area, image_area, "outline too small");
        return None;
    }

    Quadrilateral::from_unordered(corners)
}

// -- Corner selection ---------------------------------------------------------

/// Reduce a simplified outline to four corner candidates.
///
/// Four points are kept as-is. Longer outlines keep, for each quadrant
/// around the bounding-box centre, the point farthest from that centre;
/// an empty quadrant means the outline is not a quadrilateral.
fn select_corners(points: &[Point2D]) -> Option<[Point2D; 4]> {
    match points.len() {
        0..=3 => None,
        4 => Some([points[0], points[1], points[2], points[3]]),
        _ => {
            let (min, max) = bounds(points);
            let centre = Point2D::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
            let farthest_in = |in_quadrant: &dyn Fn(Point2D) -> bool| {
                points
                    .iter()
                    .copied()
                    .filter(|&p| in_quadrant(p))
                    .max_by(|a, b| {
                        distance(*a, centre).total_cmp(&distance(*b, centre))
                    })
            };
            Some([
                farthest_in(&|p| p.x < centre.x && p.y < centre.y)?,
                farthest_in(&|p| p.x > centre.x && p.y < centre.y)?,
                farthest_in(&|p| p.x < centre.x && p.y > centre.y)?,
                farthest_in(&|p| p.x > centre.x && p.y > centre.y)?,
            ])
        }
    }
}

fn bounds(points: &[Point2D]) -> (Point2D, Point2D) {
    points.iter().fold(
        (
            Point2D::new(f64::INFINITY, f64::INFINITY),
            Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        ),
        |(min, max), p| {
            (
                Point2D::new(min.x.min(p.x), min.y.min(p.y)),
                Point2D::new(max.x.max(p.x), max.y.max(p.y)),
            )
        },
    )
}

fn bounding_box_area(points: &[Point2D]) -> f64 {
    let (min, max) = bounds(points);
    (max.x - min.x) * (max.y - min.y)
}

fn polygon_area(points: &[Point<i32>]) -> f64 {
    let vertices: Vec<Point2D> = points
        .iter()
        .map(|p| Point2D::new(f64::from(p.x), f64::from(p.y)))
        .collect();
    shoelace_area(&vertices)
}
