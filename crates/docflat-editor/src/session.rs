// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editing session for one image: the current corners plus the gesture
// that is editing them.

use docflat_core::error::Result;
use docflat_core::{Normalized, Pixel, Point2D, Quadrilateral};
use tracing::{debug, instrument};

use crate::gesture::{CornerGesture, GesturePhase};

/// Corners being edited on a `width` x `height` image.
#[derive(Debug, Clone)]
pub struct DocumentSession {
    width: f64,
    height: f64,
    pick_radius: f64,
    quad: Quadrilateral<Pixel>,
    gesture: CornerGesture,
}

impl DocumentSession {
    /// Start with the corners on the image frame.
    pub fn new(width: u32, height: u32, pick_radius: f64) -> Self {
        let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));
        Self {
            width: w,
            height: h,
            pick_radius,
            quad: Quadrilateral::full_frame(w, h),
            gesture: CornerGesture::new(w, h, pick_radius),
        }
    }

    /// Start from a detected quad, falling back to the frame when nothing
    /// was detected.
    pub fn with_detection(
        width: u32,
        height: u32,
        pick_radius: f64,
        detected: Option<Quadrilateral<Normalized>>,
    ) -> Self {
        let mut session = Self::new(width, height, pick_radius);
        if let Some(quad) = detected {
            session.quad = quad
                .to_pixel(session.width, session.height)
                .clamp_to(session.width, session.height);
        }
        session
    }

    pub fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn quad(&self) -> Quadrilateral<Pixel> {
        self.quad
    }

    pub fn gesture(&self) -> &CornerGesture {
        &self.gesture
    }

    /// Current corners as fractions of the image, ready for correction.
    pub fn normalized(&self) -> Quadrilateral<Normalized> {
        self.quad.to_normalized(self.width, self.height)
    }

    /// Validated normalized corners. Fails while the quad is degenerate.
    pub fn corners_for_correction(&self) -> Result<Quadrilateral<Normalized>> {
        let normalized = self.normalized();
        normalized.validate()?;
        Ok(normalized)
    }

    /// Feed one pointer event. Returns whether it was a corner edit.
    pub fn handle(&mut self, phase: GesturePhase, pointer: Point2D) -> bool {
        let response = self.gesture.handle(phase, self.quad, pointer);
        self.quad = response.quad;
        response.consumed
    }

    /// Put the corners back on the image frame.
    pub fn reset(&mut self) {
        self.gesture.cancel(self.quad);
        self.quad = Quadrilateral::full_frame(self.width, self.height);
    }

    /// Keep the corners on the same document features when the displayed
    /// image changes resolution. An active drag is cancelled first.
    #[instrument(skip(self), fields(from_w = self.width, from_h = self.height))]
    pub fn resize(&mut self, width: u32, height: u32) {
        self.quad = self.gesture.cancel(self.quad).quad;
        let normalized = self.normalized();
        let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));
        self.width = w;
        self.height = h;
        self.quad = normalized.to_pixel(w, h);
        self.gesture = CornerGesture::new(w, h, self.pick_radius);
        debug!(width, height, "session resized");
    }
}
