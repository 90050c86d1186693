// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Point adjustment: moves one corner and, when the move would leave the
// roles inconsistent with the geometry, exchanges roles with a neighbour.

use docflat_core::geometry::{distance, segments_intersect};
use docflat_core::{CornerLabel, Pixel, Point2D, Quadrilateral};
use tracing::trace;

use CornerLabel::*;

/// Which rule caused a role exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapReason {
    /// Left and right edges met: the quad folded left/right.
    SideEdgesCrossed,
    /// Top and bottom edges met: the quad folded top/bottom.
    TopBottomCrossed,
    /// The point moved further from its home corner than the opposite corner.
    PastOppositeCorner,
}

/// Move `moving` to `target` and relabel if needed.
///
/// `target` is expected inside `[0, width] x [0, height]`. Returns the new
/// quad and the label that now owns the dragged point; later events of the
/// same drag must use that label. At most one exchange happens per call and
/// the set of four points is always preserved.
pub fn adjust(
    quad: Quadrilateral<Pixel>,
    moving: CornerLabel,
    target: Point2D,
    (width, height): (f64, f64),
) -> (Quadrilateral<Pixel>, CornerLabel) {
    let proposed = quad.with(moving, target);

    let Some((partner, reason)) = exchange_partner(&proposed, moving, (width, height)) else {
        return (proposed, moving);
    };

    trace!(from = %moving, to = %partner, ?reason, x = target.x, y = target.y, "corner roles exchanged");
    (proposed.swap(moving, partner), partner)
}

/// First matching exchange rule for `proposed`, in fixed priority order.
fn exchange_partner(
    proposed: &Quadrilateral<Pixel>,
    moving: CornerLabel,
    (width, height): (f64, f64),
) -> Option<(CornerLabel, SwapReason)> {
    let side_edges_meet = segments_intersect(
        proposed[TopLeft],
        proposed[BottomLeft],
        proposed[TopRight],
        proposed[BottomRight],
    )
    .is_some();
    if side_edges_meet {
        return Some((moving.horizontal_neighbour(), SwapReason::SideEdgesCrossed));
    }

    let top_bottom_meet = segments_intersect(
        proposed[TopLeft],
        proposed[TopRight],
        proposed[BottomLeft],
        proposed[BottomRight],
    )
    .is_some();
    if top_bottom_meet {
        return Some((moving.vertical_neighbour(), SwapReason::TopBottomCrossed));
    }

    let home = moving.home(width, height);
    let opposite = moving.diagonal_opposite();
    if distance(home, proposed[moving]) > distance(home, proposed[opposite]) {
        return Some((opposite, SwapReason::PastOppositeCorner));
    }

    None
}
