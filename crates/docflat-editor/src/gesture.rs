// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drag gesture state machine for corner editing.
//
// Idle --press on corner--> Dragging --release--> Idle
//                               |
//                               +---cancel (restore snapshot)--> Idle

use docflat_core::{CornerLabel, Pixel, Point2D, Quadrilateral};
use tracing::debug;

use crate::adjust::adjust;
use crate::hit_test::pick_corner;

/// Pointer event kinds fed to [`CornerGesture::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Press,
    Move,
    Release,
    Cancel,
}

/// An in-progress corner drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    /// Role currently owning the dragged point. Changes on relabeling.
    pub label: CornerLabel,
    /// Role that was grabbed at press time.
    pub pressed_label: CornerLabel,
    /// Quad as it was at press time; restored on cancel.
    pub snapshot: Quadrilateral<Pixel>,
    /// Corner position minus pointer position at press time.
    pub grab_offset: Point2D,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(Drag),
}

/// What the caller should do after an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureResponse {
    /// Quad to display from now on.
    pub quad: Quadrilateral<Pixel>,
    /// `false` when the event was not a corner edit and may be handled
    /// elsewhere (panning, zooming).
    pub consumed: bool,
    /// Role owning the dragged point after this event. A cancel hands back
    /// the role grabbed at press time.
    pub label: Option<CornerLabel>,
}

impl GestureResponse {
    fn ignored(quad: Quadrilateral<Pixel>) -> Self {
        Self {
            quad,
            consumed: false,
            label: None,
        }
    }

    fn edit(quad: Quadrilateral<Pixel>, label: CornerLabel) -> Self {
        Self {
            quad,
            consumed: true,
            label: Some(label),
        }
    }
}

/// Turns pointer events into quad edits for one image.
#[derive(Debug, Clone)]
pub struct CornerGesture {
    width: f64,
    height: f64,
    pick_radius: f64,
    state: GestureState,
}

impl CornerGesture {
    pub fn new(width: f64, height: f64, pick_radius: f64) -> Self {
        Self {
            width,
            height,
            pick_radius,
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Label currently being dragged, if any.
    pub fn active_label(&self) -> Option<CornerLabel> {
        match self.state {
            GestureState::Dragging(drag) => Some(drag.label),
            GestureState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    /// Dispatch one pointer event.
    pub fn handle(
        &mut self,
        phase: GesturePhase,
        quad: Quadrilateral<Pixel>,
        pointer: Point2D,
    ) -> GestureResponse {
        match phase {
            GesturePhase::Press => self.press(quad, pointer),
            GesturePhase::Move => self.drag_to(quad, pointer),
            GesturePhase::Release => self.release(quad),
            GesturePhase::Cancel => self.cancel(quad),
        }
    }

    pub fn press(&mut self, quad: Quadrilateral<Pixel>, pointer: Point2D) -> GestureResponse {
        let Some(label) = pick_corner(&quad, pointer, self.pick_radius) else {
            self.state = GestureState::Idle;
            return GestureResponse::ignored(quad);
        };

        let corner = quad[label];
        let grab_offset = Point2D::new(corner.x - pointer.x, corner.y - pointer.y);
        debug!(%label, x = pointer.x, y = pointer.y, "corner grabbed");
        self.state = GestureState::Dragging(Drag {
            label,
            pressed_label: label,
            snapshot: quad,
            grab_offset,
        });
        GestureResponse::edit(quad, label)
    }

    /// Follow the pointer. The corner keeps its grab offset and stays
    /// inside the image; nothing is recomputed when the clamped position
    /// has not changed.
    pub fn drag_to(&mut self, quad: Quadrilateral<Pixel>, pointer: Point2D) -> GestureResponse {
        let GestureState::Dragging(mut drag) = self.state else {
            return GestureResponse::ignored(quad);
        };

        let target = Point2D::new(pointer.x + drag.grab_offset.x, pointer.y + drag.grab_offset.y)
            .clamp_to(self.width, self.height);
        if target == quad[drag.label] {
            return GestureResponse::edit(quad, drag.label);
        }

        let (quad, label) = adjust(quad, drag.label, target, (self.width, self.height));
        drag.label = label;
        self.state = GestureState::Dragging(drag);
        GestureResponse::edit(quad, label)
    }

    pub fn release(&mut self, quad: Quadrilateral<Pixel>) -> GestureResponse {
        let response = match self.state {
            GestureState::Dragging(drag) => {
                debug!(pressed = %drag.pressed_label, settled = %drag.label, "corner released");
                GestureResponse::edit(quad, drag.label)
            }
            GestureState::Idle => GestureResponse::ignored(quad),
        };
        self.state = GestureState::Idle;
        response
    }

    /// Abort the drag and restore the quad from press time. The dragged
    /// point goes back to the role it was grabbed as.
    pub fn cancel(&mut self, quad: Quadrilateral<Pixel>) -> GestureResponse {
        let response = match self.state {
            GestureState::Dragging(drag) => {
                debug!(label = %drag.pressed_label, "corner drag cancelled");
                GestureResponse::edit(drag.snapshot, drag.pressed_label)
            }
            GestureState::Idle => GestureResponse::ignored(quad),
        };
        self.state = GestureState::Idle;
        response
    }
}
