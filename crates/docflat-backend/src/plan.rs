// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Backend capability contract and the fixed set of backends a plan id can
// name.

use docflat_core::{AppConfig, DocflatError, Normalized, Outcome, PlanId, Quadrilateral};
use image::DynamicImage;

use crate::ml::MlBackend;
use crate::native::NativeBackend;
use crate::vendor::{VendorBackend, platform_analyzer};

/// One way of finding and flattening a document.
///
/// Backends own their pixel-format and resolution constraints; callers only
/// ever pass full images and normalized corners.
pub trait DocumentBackend: Send + Sync {
    fn plan(&self) -> PlanId;

    /// Whether this backend can run on the current device.
    fn is_available(&self) -> bool {
        true
    }

    /// Find the document corners. `NotFound` means the backend ran but saw
    /// no document.
    fn detect(&self, image: &DynamicImage) -> Outcome<Quadrilateral<Normalized>> {
        let _ = image;
        Outcome::Failure(DocflatError::Unsupported {
            plan: self.plan(),
            capability: "detect documents",
        })
    }

    /// Flatten the region under `quad` into an upright rectangle.
    fn correct(
        &self,
        image: &DynamicImage,
        quad: &Quadrilateral<Normalized>,
    ) -> Outcome<DynamicImage> {
        let _ = (image, quad);
        Outcome::Failure(DocflatError::Unsupported {
            plan: self.plan(),
            capability: "correct documents",
        })
    }
}

/// Exactly one backend per [`PlanId`].
pub struct BackendSet {
    pub native: Box<dyn DocumentBackend>,
    pub ml: Box<dyn DocumentBackend>,
    pub vendor: Box<dyn DocumentBackend>,
}

impl BackendSet {
    /// Build the standard backends from configuration.
    ///
    /// The ML backend is unavailable unless a model path is configured and
    /// the `ml` feature is enabled; the vendor backend uses the platform
    /// analyzer (a stub on desktop).
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            native: Box::new(NativeBackend::new(config.min_document_fraction)),
            ml: Box::new(MlBackend::from_config(config)),
            vendor: Box::new(VendorBackend::new(
                platform_analyzer(),
                config.max_working_dimension,
            )),
        }
    }

    pub fn get(&self, plan: PlanId) -> &dyn DocumentBackend {
        match plan {
            PlanId::Native => self.native.as_ref(),
            PlanId::Ml => self.ml.as_ref(),
            PlanId::Vendor => self.vendor.as_ref(),
        }
    }
}

impl std::fmt::Debug for BackendSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSet")
            .field("native", &self.native.plan())
            .field("ml", &self.ml.plan())
            .field("vendor", &self.vendor.plan())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl DocumentBackend for Bare {
        fn plan(&self) -> PlanId {
            PlanId::Vendor
        }
    }

    #[test]
    fn default_capabilities_are_unsupported() {
        let image = DynamicImage::new_rgb8(4, 4);
        let backend = Bare;
        assert!(backend.is_available());
        assert!(matches!(
            backend.detect(&image),
            Outcome::Failure(DocflatError::Unsupported { plan: PlanId::Vendor, .. })
        ));
        assert!(matches!(
            backend.correct(&image, &Quadrilateral::unit_square()),
            Outcome::Failure(DocflatError::Unsupported { .. })
        ));
    }

    #[test]
    fn standard_set_dispatches_by_plan() {
        let set = BackendSet::from_config(&AppConfig::default());
        for plan in PlanId::ALL {
            assert_eq!(set.get(plan).plan(), plan);
        }
        assert!(set.get(PlanId::Native).is_available());
        // No model configured, and the desktop analyzer is a stub.
        assert!(!set.get(PlanId::Ml).is_available());
        assert!(!set.get(PlanId::Vendor).is_available());
    }
}
