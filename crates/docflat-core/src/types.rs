// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Docflat.

use serde::{Deserialize, Serialize};

use crate::error::{DocflatError, Result};

/// A pair of real-valued coordinates.
///
/// Used both in pixel space and in normalized `[0, 1]` space; which one is
/// decided by the [`Quadrilateral`](crate::Quadrilateral) that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise scale.
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }

    /// Clamp into `[0, width] x [0, height]`.
    pub fn clamp_to(self, width: f64, height: f64) -> Self {
        Self::new(self.x.clamp(0.0, width), self.y.clamp(0.0, height))
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Point2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four fixed corner roles of a document quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerLabel {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl CornerLabel {
    /// All labels in storage order.
    pub const ALL: [CornerLabel; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Labels in polygon order (TL → TR → BR → BL).
    pub const PERIMETER: [CornerLabel; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomLeft => 2,
            Self::BottomRight => 3,
        }
    }

    /// The corner across the diagonal (TL↔BR, TR↔BL).
    pub fn diagonal_opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }

    /// The corner on the same top/bottom edge (TL↔TR, BL↔BR).
    pub fn horizontal_neighbour(self) -> Self {
        match self {
            Self::TopLeft => Self::TopRight,
            Self::TopRight => Self::TopLeft,
            Self::BottomLeft => Self::BottomRight,
            Self::BottomRight => Self::BottomLeft,
        }
    }

    /// The corner on the same left/right edge (TL↔BL, TR↔BR).
    pub fn vertical_neighbour(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomLeft,
            Self::TopRight => Self::BottomRight,
            Self::BottomLeft => Self::TopLeft,
            Self::BottomRight => Self::TopRight,
        }
    }

    /// The image corner this role gravitates to in a `width` x `height` frame.
    pub fn home(self, width: f64, height: f64) -> Point2D {
        match self {
            Self::TopLeft => Point2D::new(0.0, 0.0),
            Self::TopRight => Point2D::new(width, 0.0),
            Self::BottomLeft => Point2D::new(0.0, height),
            Self::BottomRight => Point2D::new(width, height),
        }
    }
}

impl std::fmt::Display for CornerLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        };
        f.write_str(name)
    }
}

/// Identity of a detection/correction backend in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanId {
    /// Contour-based pipeline on `imageproc`; the usual last resort.
    Native,
    /// On-device edge-map model feeding the native contour stage.
    Ml,
    /// Platform/vendor ML analyzer reached through a bridge.
    Vendor,
}

impl PlanId {
    pub const ALL: [PlanId; 3] = [Self::Native, Self::Ml, Self::Vendor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Ml => "ml",
            Self::Vendor => "vendor",
        }
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlanId {
    type Err = DocflatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "native" | "core" => Ok(Self::Native),
            "ml" | "model" => Ok(Self::Ml),
            "vendor" => Ok(Self::Vendor),
            other => Err(DocflatError::Config(format!("unknown plan: {other}"))),
        }
    }
}

/// Result of running one backend capability.
///
/// `NotFound` is distinct from `Failure`: the backend ran to completion but
/// saw no document.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    NotFound,
    Failure(DocflatError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Borrow the failure cause, if any.
    pub fn error(&self) -> Option<&DocflatError> {
        match self {
            Self::Failure(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::NotFound => Outcome::NotFound,
            Self::Failure(err) => Outcome::Failure(err),
        }
    }

    /// Collapse into a `Result`, mapping `NotFound` to `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>> {
        match self {
            Self::Success(value) => Ok(Some(value)),
            Self::NotFound => Ok(None),
            Self::Failure(err) => Err(err),
        }
    }
}

impl<T> From<Result<Option<T>>> for Outcome<T> {
    fn from(result: Result<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => Self::Success(value),
            Ok(None) => Self::NotFound,
            Err(err) => Self::Failure(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbour_relations_are_involutions() {
        for label in CornerLabel::ALL {
            assert_eq!(label.diagonal_opposite().diagonal_opposite(), label);
            assert_eq!(label.horizontal_neighbour().horizontal_neighbour(), label);
            assert_eq!(label.vertical_neighbour().vertical_neighbour(), label);
            assert_ne!(label.diagonal_opposite(), label);
        }
    }

    #[test]
    fn home_corners_follow_labels() {
        assert_eq!(CornerLabel::TopRight.home(4.0, 3.0), Point2D::new(4.0, 0.0));
        assert_eq!(CornerLabel::BottomLeft.home(4.0, 3.0), Point2D::new(0.0, 3.0));
    }

    #[test]
    fn plan_id_parses_and_serializes() {
        assert_eq!("ML".parse::<PlanId>().unwrap(), PlanId::Ml);
        assert_eq!("core".parse::<PlanId>().unwrap(), PlanId::Native);
        assert!("hms2".parse::<PlanId>().is_err());
        assert_eq!(serde_json::to_string(&PlanId::Vendor).unwrap(), "\"vendor\"");
    }

    #[test]
    fn outcome_into_result() {
        let found: Outcome<u8> = Outcome::Success(3);
        assert_eq!(found.into_result().unwrap(), Some(3));
        let missing: Outcome<u8> = Outcome::NotFound;
        assert_eq!(missing.into_result().unwrap(), None);
        let failed: Outcome<u8> = Outcome::Failure(DocflatError::NoPlanConfigured);
        assert!(failed.into_result().is_err());
    }
}
