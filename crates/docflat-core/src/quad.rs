// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral model — four labeled corners in either pixel or normalized
// space, with conversions, edges, diagonals and settled-state validation.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::{DocflatError, Result};
use crate::geometry::{distance, point_side, segments_intersect, shoelace_area};
use crate::types::{CornerLabel, Point2D};

/// Coordinate space a [`Quadrilateral`] lives in.
pub trait CoordinateSpace: Copy + Default + std::fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Human-readable space name (for logs and errors).
    const NAME: &'static str;
    /// Smallest area a settled quadrilateral may enclose in this space.
    const MIN_AREA: f64;
}

/// Raw pixel coordinates of one particular image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel;

/// Fractions of image width/height, independent of resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Normalized;

impl CoordinateSpace for Pixel {
    const NAME: &'static str = "pixel";
    const MIN_AREA: f64 = 1.0;
}

impl CoordinateSpace for Normalized {
    const NAME: &'static str = "normalized";
    const MIN_AREA: f64 = 1e-6;
}

/// Named-field wire form of a quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corners {
    pub top_left: Point2D,
    pub top_right: Point2D,
    pub bottom_left: Point2D,
    pub bottom_right: Point2D,
}

/// Four corner points, one per [`CornerLabel`].
///
/// Values are immutable: every operation returns a new quadrilateral. The
/// space marker `S` keeps pixel and normalized quads apart at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Corners", into = "Corners", bound = "")]
pub struct Quadrilateral<S: CoordinateSpace> {
    points: [Point2D; 4],
    space: PhantomData<S>,
}

impl<S: CoordinateSpace> From<Corners> for Quadrilateral<S> {
    fn from(c: Corners) -> Self {
        Self::new(c.top_left, c.top_right, c.bottom_left, c.bottom_right)
    }
}

impl<S: CoordinateSpace> From<Quadrilateral<S>> for Corners {
    fn from(q: Quadrilateral<S>) -> Self {
        Corners {
            top_left: q.get(CornerLabel::TopLeft),
            top_right: q.get(CornerLabel::TopRight),
            bottom_left: q.get(CornerLabel::BottomLeft),
            bottom_right: q.get(CornerLabel::BottomRight),
        }
    }
}

impl<S: CoordinateSpace> std::ops::Index<CornerLabel> for Quadrilateral<S> {
    type Output = Point2D;

    fn index(&self, label: CornerLabel) -> &Point2D {
        &self.points[label.index()]
    }
}

impl<S: CoordinateSpace> Quadrilateral<S> {
    pub fn new(
        top_left: Point2D,
        top_right: Point2D,
        bottom_left: Point2D,
        bottom_right: Point2D,
    ) -> Self {
        Self {
            points: [top_left, top_right, bottom_left, bottom_right],
            space: PhantomData,
        }
    }

    /// Point currently owned by `label`.
    #[inline]
    pub fn get(&self, label: CornerLabel) -> Point2D {
        self.points[label.index()]
    }

    /// Copy with `label` moved to `point`.
    #[must_use]
    pub fn with(mut self, label: CornerLabel, point: Point2D) -> Self {
        self.points[label.index()] = point;
        self
    }

    /// Copy with the points of two roles exchanged.
    #[must_use]
    pub fn swap(mut self, a: CornerLabel, b: CornerLabel) -> Self {
        self.points.swap(a.index(), b.index());
        self
    }

    /// Points in perimeter order (TL → TR → BR → BL).
    pub fn perimeter(&self) -> [Point2D; 4] {
        CornerLabel::PERIMETER.map(|label| self.get(label))
    }

    /// Label pairs of the four edges in perimeter order.
    pub fn edges(&self) -> [(CornerLabel, CornerLabel); 4] {
        use CornerLabel::*;
        [
            (TopLeft, TopRight),
            (TopRight, BottomRight),
            (BottomRight, BottomLeft),
            (BottomLeft, TopLeft),
        ]
    }

    /// The TL–BR and TR–BL diagonals.
    pub fn diagonals(&self) -> [(Point2D, Point2D); 2] {
        use CornerLabel::*;
        [
            (self.get(TopLeft), self.get(BottomRight)),
            (self.get(TopRight), self.get(BottomLeft)),
        ]
    }

    /// Enclosed area in units of this space.
    pub fn area(&self) -> f64 {
        shoelace_area(&self.perimeter())
    }

    /// Whether the perimeter is free of self-intersections.
    ///
    /// A quadrilateral can only fold across itself through its opposite edge
    /// pairs, so those are the only pairs tested.
    pub fn is_simple(&self) -> bool {
        use CornerLabel::*;
        let top_meets_bottom = segments_intersect(
            self.get(TopLeft),
            self.get(TopRight),
            self.get(BottomRight),
            self.get(BottomLeft),
        );
        let right_meets_left = segments_intersect(
            self.get(TopRight),
            self.get(BottomRight),
            self.get(BottomLeft),
            self.get(TopLeft),
        );
        top_meets_bottom.is_none() && right_meets_left.is_none()
    }

    /// Reject quads that must not reach a correction backend.
    pub fn validate(&self) -> Result<()> {
        if self.points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(DocflatError::InvalidQuadrilateral(format!(
                "{} corners must be finite",
                S::NAME
            )));
        }
        let area = self.area();
        if area <= S::MIN_AREA {
            return Err(DocflatError::InvalidQuadrilateral(format!(
                "{} area {area} is not above {}",
                S::NAME,
                S::MIN_AREA
            )));
        }
        if !self.is_simple() {
            return Err(DocflatError::InvalidQuadrilateral(
                "opposite edges cross".into(),
            ));
        }
        Ok(())
    }

    fn scaled<T: CoordinateSpace>(&self, sx: f64, sy: f64) -> Quadrilateral<T> {
        Quadrilateral {
            points: self.points.map(|p| p.scale(sx, sy)),
            space: PhantomData,
        }
    }
}

impl Quadrilateral<Pixel> {
    /// Corners on the four image corners.
    pub fn full_frame(width: f64, height: f64) -> Self {
        Self::new(
            CornerLabel::TopLeft.home(width, height),
            CornerLabel::TopRight.home(width, height),
            CornerLabel::BottomLeft.home(width, height),
            CornerLabel::BottomRight.home(width, height),
        )
    }

    /// Express the corners as fractions of a `width` x `height` image.
    ///
    /// Both dimensions must be positive.
    pub fn to_normalized(&self, width: f64, height: f64) -> Quadrilateral<Normalized> {
        debug_assert!(width > 0.0 && height > 0.0, "image dimensions must be positive");
        self.scaled(1.0 / width, 1.0 / height)
    }

    /// Copy with every corner clamped into the image.
    #[must_use]
    pub fn clamp_to(&self, width: f64, height: f64) -> Self {
        Self {
            points: self.points.map(|p| p.clamp_to(width, height)),
            space: PhantomData,
        }
    }

    /// Size of the rectangle this quad flattens into.
    ///
    /// Width averages the top and bottom edges, height the left and right
    /// edges, each rounded to whole pixels.
    pub fn output_size(&self) -> (u32, u32) {
        use CornerLabel::*;
        let width = (distance(self.get(TopLeft), self.get(TopRight))
            + distance(self.get(BottomLeft), self.get(BottomRight)))
            * 0.5;
        let height = (distance(self.get(TopLeft), self.get(BottomLeft))
            + distance(self.get(TopRight), self.get(BottomRight)))
            * 0.5;
        (width.round() as u32, height.round() as u32)
    }

    /// Assign corner roles to four unordered detector points.
    ///
    /// The point closest to the origin becomes top-left; bottom-right is the
    /// point whose line from top-left separates the remaining two; top-right
    /// is the one on the positive side of that line. Returns `None` when no
    /// point separates the others (collinear or folded input).
    pub fn from_unordered(points: [Point2D; 4]) -> Option<Self> {
        let tl_index = (0..4).min_by(|&a, &b| {
            let da = points[a].x * points[a].x + points[a].y * points[a].y;
            let db = points[b].x * points[b].x + points[b].y * points[b].y;
            da.total_cmp(&db)
        })?;
        let top_left = points[tl_index];
        let rest: Vec<Point2D> = (0..4)
            .filter(|&i| i != tl_index)
            .map(|i| points[i])
            .collect();

        let br_slot = (0..3).find(|&i| {
            let others: Vec<Point2D> = (0..3).filter(|&j| j != i).map(|j| rest[j]).collect();
            point_side(others[0], top_left, rest[i]) * point_side(others[1], top_left, rest[i])
                < 0.0
        })?;
        let bottom_right = rest[br_slot];
        let remaining: Vec<Point2D> = (0..3)
            .filter(|&j| j != br_slot)
            .map(|j| rest[j])
            .collect();

        let (top_right, bottom_left) = if point_side(remaining[0], top_left, bottom_right) > 0.0 {
            (remaining[0], remaining[1])
        } else {
            (remaining[1], remaining[0])
        };
        Some(Self::new(top_left, top_right, bottom_left, bottom_right))
    }
}

impl Quadrilateral<Normalized> {
    /// The unit square.
    pub fn unit_square() -> Self {
        Self::new(
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(0.0, 1.0),
            Point2D::new(1.0, 1.0),
        )
    }

    /// Scale back to the pixel space of a `width` x `height` image.
    pub fn to_pixel(&self, width: f64, height: f64) -> Quadrilateral<Pixel> {
        self.scaled(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CornerLabel::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    fn skewed() -> Quadrilateral<Pixel> {
        Quadrilateral::new(p(12.5, 30.0), p(610.25, 8.0), p(40.0, 455.75), p(590.0, 470.0))
    }

    #[test]
    fn normalization_round_trips() {
        let quad = skewed();
        for (w, h) in [(640.0, 480.0), (3.0, 7.0), (4032.0, 3024.0)] {
            let back = quad.to_normalized(w, h).to_pixel(w, h);
            for label in CornerLabel::ALL {
                let (a, b) = (quad.get(label), back.get(label));
                assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn unqualified_full_frame_is_pixel_space() {
        let frame = Quadrilateral::full_frame(4.0, 2.0);
        assert_eq!(frame[BottomRight], p(4.0, 2.0));
        assert_eq!(frame.to_normalized(4.0, 2.0), Quadrilateral::unit_square());
    }

    #[test]
    fn full_frame_normalizes_to_unit_square() {
        let frame = Quadrilateral::<Pixel>::full_frame(1024.0, 512.0);
        assert_eq!(frame.to_normalized(1024.0, 512.0), Quadrilateral::<Normalized>::unit_square());
    }

    #[test]
    fn edges_and_diagonals_follow_perimeter() {
        let quad = skewed();
        assert_eq!(quad.edges()[1], (TopRight, BottomRight));
        assert_eq!(quad.edges()[3], (BottomLeft, TopLeft));
        let [first, second] = quad.diagonals();
        assert_eq!(first, (quad[TopLeft], quad[BottomRight]));
        assert_eq!(second, (quad[TopRight], quad[BottomLeft]));
    }

    #[test]
    fn swap_keeps_point_set() {
        let quad = skewed();
        let swapped = quad.swap(TopLeft, BottomRight);
        assert_eq!(swapped[TopLeft], quad[BottomRight]);
        assert_eq!(swapped[BottomRight], quad[TopLeft]);
        assert_eq!(swapped[TopRight], quad[TopRight]);
    }

    #[test]
    fn validate_accepts_convex_quad() {
        assert!(skewed().validate().is_ok());
        assert!(Quadrilateral::<Normalized>::unit_square().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bow_tie() {
        // Top-right and bottom-right exchanged: left and right edges cross.
        let bow_tie = Quadrilateral::<Pixel>::new(p(0.0, 0.0), p(100.0, 100.0), p(0.0, 100.0), p(100.0, 0.0));
        assert!(!bow_tie.is_simple());
        assert!(matches!(
            bow_tie.validate(),
            Err(DocflatError::InvalidQuadrilateral(_))
        ));
    }

    #[test]
    fn validate_rejects_collapsed_quad() {
        let line = Quadrilateral::<Normalized>::new(p(0.0, 0.0), p(0.5, 0.5), p(0.25, 0.25), p(1.0, 1.0));
        assert!(matches!(
            line.validate(),
            Err(DocflatError::InvalidQuadrilateral(_))
        ));
    }

    #[test]
    fn validate_rejects_non_finite() {
        let quad = Quadrilateral::<Normalized>::unit_square().with(TopLeft, p(f64::NAN, 0.0));
        assert!(quad.validate().is_err());
    }

    #[test]
    fn output_size_averages_opposite_edges() {
        let quad = Quadrilateral::<Pixel>::new(p(10.0, 0.0), p(110.0, 0.0), p(0.0, 50.0), p(120.0, 50.0));
        // Slanted sides are sqrt(10^2 + 50^2) ~ 50.99 long.
        assert_eq!(quad.output_size(), (110, 51));
    }

    #[test]
    fn from_unordered_assigns_roles() {
        let quad = Quadrilateral::<Pixel>::from_unordered([
            p(590.0, 470.0),
            p(40.0, 455.75),
            p(610.25, 8.0),
            p(12.5, 30.0),
        ])
        .expect("convex input must be ordered");
        assert_eq!(quad, skewed());
    }

    #[test]
    fn from_unordered_rejects_collinear_points() {
        let ordered = Quadrilateral::<Pixel>::from_unordered([
            p(0.0, 0.0),
            p(1.0, 1.0),
            p(2.0, 2.0),
            p(3.0, 3.0),
        ]);
        assert!(ordered.is_none());
    }

    #[test]
    fn serializes_with_named_corners() {
        let json = serde_json::to_value(Quadrilateral::<Normalized>::unit_square()).unwrap();
        assert_eq!(json["bottom_right"]["x"], 1.0);
        let back: Quadrilateral<Normalized> = serde_json::from_value(json).unwrap();
        assert_eq!(back, Quadrilateral::unit_square());
    }
}
