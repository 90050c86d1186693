// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native backend — contour detection and projective warp on imageproc,
// available on every platform.

pub mod detect;
pub mod warp;

use docflat_core::{DocflatError, Normalized, Outcome, PlanId, Quadrilateral};
use image::DynamicImage;
use tracing::{info, instrument};

use crate::plan::DocumentBackend;

/// The always-available contour pipeline.
#[derive(Debug, Clone)]
pub struct NativeBackend {
    min_document_fraction: f64,
}

impl NativeBackend {
    pub fn new(min_document_fraction: f64) -> Self {
        Self {
            min_document_fraction,
        }
    }
}

impl Default for NativeBackend {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl DocumentBackend for NativeBackend {
    fn plan(&self) -> PlanId {
        PlanId::Native
    }

    #[instrument(skip_all, fields(plan = "native", width = image.width(), height = image.height()))]
    fn detect(&self, image: &DynamicImage) -> Outcome<Quadrilateral<Normalized>> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Outcome::Failure(DocflatError::ImageError("image has no pixels".into()));
        }
        match detect::detect_document(&image.to_luma8(), self.min_document_fraction) {
            Some(quad) => {
                info!(area = quad.area(), "document detected");
                Outcome::Success(quad.to_normalized(f64::from(width), f64::from(height)))
            }
            None => Outcome::NotFound,
        }
    }

    #[instrument(skip_all, fields(plan = "native", width = image.width(), height = image.height()))]
    fn correct(&self, image: &DynamicImage, quad: &Quadrilateral<Normalized>) -> Outcome<DynamicImage> {
        warp::correct_normalized(image, quad, PlanId::Native).map(Some).into()
    }
}
