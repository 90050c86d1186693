// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry kernel: point distance, segment/segment intersection and
// point-to-line side tests. Pure functions, no shared state.

use crate::types::Point2D;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Signed side of `p` relative to the line through `a` and `b`.
///
/// Evaluates `A*x + B*y + C` for the line equation `Ax + By + C = 0`.
/// Negative means left of `a → b`, positive means right, zero means on the
/// line. Only the sign is meaningful.
#[inline]
pub fn point_side(p: Point2D, a: Point2D, b: Point2D) -> f64 {
    let coef_a = b.y - a.y;
    let coef_b = a.x - b.x;
    let coef_c = b.x * a.y - a.x * b.y;
    coef_a * p.x + coef_b * p.y + coef_c
}

/// Intersection point of segment `(p1, p2)` with segment `(p3, p4)`.
///
/// Returns `Some` only when the point lies on both segments, endpoints
/// included. Parallel, collinear and disjoint segments yield `None` unless
/// they share an endpoint, which is returned exactly.
///
/// Vertical segments have no slope and are handled explicitly: two vertical
/// segments never intersect, one vertical segment is intersected by evaluating
/// the other line at its `x`. Parallelism is detected by exact slope equality,
/// so nearly parallel lines produce a far-away intersection that the
/// containment test then rejects.
pub fn segments_intersect(p1: Point2D, p2: Point2D, p3: Point2D, p4: Point2D) -> Option<Point2D> {
    // Slope arithmetic can round a shared endpoint just outside the bounds.
    if let Some(shared) = [p1, p2].into_iter().find(|&p| p == p3 || p == p4) {
        return Some(shared);
    }

    let dx1 = p1.x - p2.x;
    let dx2 = p3.x - p4.x;

    if dx1 == 0.0 && dx2 == 0.0 {
        return None;
    }

    let candidate = if dx1 == 0.0 {
        let k2 = (p3.y - p4.y) / dx2;
        let y = if k2 == 0.0 { p3.y } else { k2 * (p1.x - p4.x) + p4.y };
        Point2D::new(p1.x, y)
    } else if dx2 == 0.0 {
        let k1 = (p1.y - p2.y) / dx1;
        let y = if k1 == 0.0 { p1.y } else { k1 * (p3.x - p2.x) + p2.y };
        Point2D::new(p3.x, y)
    } else {
        let k1 = (p1.y - p2.y) / dx1;
        let k2 = (p3.y - p4.y) / dx2;
        if k1 == k2 {
            return None;
        }
        if k1 == 0.0 {
            let y = p1.y;
            Point2D::new((y - p4.y) / k2 + p4.x, y)
        } else if k2 == 0.0 {
            let y = p3.y;
            Point2D::new((y - p2.y) / k1 + p2.x, y)
        } else {
            let x = (k1 * p2.x - k2 * p4.x + p4.y - p2.y) / (k1 - k2);
            Point2D::new(x, k1 * (x - p2.x) + p2.y)
        }
    };

    (within_bounds(candidate, p1, p2) && within_bounds(candidate, p3, p4)).then_some(candidate)
}

/// Whether `p` lies inside the inclusive bounding box of segment `(a, b)`.
///
/// `p` is already known to be on the segment's supporting line.
#[inline]
fn within_bounds(p: Point2D, a: Point2D, b: Point2D) -> bool {
    a.x.min(b.x) <= p.x && p.x <= a.x.max(b.x) && a.y.min(b.y) <= p.y && p.y <= a.y.max(b.y)
}

/// Area enclosed by a closed polygon via the shoelace formula.
///
/// Vertices must be given in perimeter order (CW or CCW). Self-intersecting
/// polygons yield the difference of their lobes.
pub fn shoelace_area(vertices: &[Point2D]) -> f64 {
    let n = vertices.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += vertices[i].x * vertices[j].y;
        twice_area -= vertices[j].x * vertices[i].y;
    }
    twice_area.abs() / 2.0
}
