// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ML backend — an on-device edge-probability model feeding the native
// contour stage.
//
// # Feature Gate
//
// Inference needs the `ml` feature:
//
// ```toml
// docflat-backend = { path = "crates/docflat-backend", features = ["ml"] }
// ```
//
// Without it (or without a configured model) the backend reports itself
// unavailable and the orchestrator skips it.
//
// # Model Contract
//
// The model takes a `[1, 3, 256, 256]` float tensor (RGB, scaled to 0..1)
// and returns a `[1, 1, H, W]` edge-probability map. Probabilities above
// `EDGE_THRESHOLD` count as edge pixels.

use docflat_core::{AppConfig, DocflatError, Normalized, Outcome, PlanId, Quadrilateral};
use image::DynamicImage;
use tracing::{instrument, warn};

use crate::native::warp;
use crate::plan::DocumentBackend;

/// Side length of the square model input.
pub const MODEL_INPUT_SIZE: u32 = 256;

/// Probability above which a pixel is treated as an edge.
pub const EDGE_THRESHOLD: f32 = 0.2;

/// Edge-model detection, native warp for correction.
pub struct MlBackend {
    #[cfg(feature = "ml")]
    model: Option<rten::Model>,
    min_document_fraction: f64,
}

impl std::fmt::Debug for MlBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MlBackend")
            .field("loaded", &self.has_model())
            .field("min_document_fraction", &self.min_document_fraction)
            .finish()
    }
}

impl MlBackend {
    /// A backend with no model; always unavailable.
    pub fn unavailable(min_document_fraction: f64) -> Self {
        Self {
            #[cfg(feature = "ml")]
            model: None,
            min_document_fraction,
        }
    }

    /// Load the configured model, or fall back to an unavailable backend.
    pub fn from_config(config: &AppConfig) -> Self {
        let Some(path) = config.ml_model_path.as_deref() else {
            return Self::unavailable(config.min_document_fraction);
        };
        match Self::load(path, config.min_document_fraction) {
            Ok(backend) => backend,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "edge model not loaded; ml plan disabled");
                Self::unavailable(config.min_document_fraction)
            }
        }
    }

    /// Load an edge model from a `.rten` file.
    #[cfg(feature = "ml")]
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &std::path::Path, min_document_fraction: f64) -> docflat_core::error::Result<Self> {
        if !path.exists() {
            return Err(DocflatError::ModelError(format!(
                "edge model not found at {}",
                path.display()
            )));
        }
        let model = rten::Model::load_file(path).map_err(|err| {
            DocflatError::ModelError(format!(
                "failed to load edge model from {}: {}",
                path.display(),
                err
            ))
        })?;
        tracing::info!("edge model loaded");
        Ok(Self {
            model: Some(model),
            min_document_fraction,
        })
    }

    #[cfg(not(feature = "ml"))]
    pub fn load(path: &std::path::Path, _min_document_fraction: f64) -> docflat_core::error::Result<Self> {
        Err(DocflatError::ModelError(format!(
            "cannot load {}: built without the `ml` feature",
            path.display()
        )))
    }

    fn has_model(&self) -> bool {
        #[cfg(feature = "ml")]
        {
            self.model.is_some()
        }
        #[cfg(not(feature = "ml"))]
        {
            false
        }
    }
}

impl DocumentBackend for MlBackend {
    fn plan(&self) -> PlanId {
        PlanId::Ml
    }

    fn is_available(&self) -> bool {
        self.has_model()
    }

    #[instrument(skip_all, fields(plan = "ml", width = image.width(), height = image.height()))]
    fn detect(&self, image: &DynamicImage) -> Outcome<Quadrilateral<Normalized>> {
        #[cfg(feature = "ml")]
        if let Some(model) = &self.model {
            return inference::detect(model, image, self.min_document_fraction);
        }
        let _ = image;
        Outcome::Failure(DocflatError::PlanUnavailable(PlanId::Ml))
    }

    fn correct(&self, image: &DynamicImage, quad: &Quadrilateral<Normalized>) -> Outcome<DynamicImage> {
        warp::correct_normalized(image, quad, PlanId::Ml).map(Some).into()
    }
}

#[cfg(feature = "ml")]
mod inference {
    use docflat_core::error::Result;
    use docflat_core::{DocflatError, Normalized, Outcome, Quadrilateral};
    use image::imageops::FilterType;
    use image::{DynamicImage, GrayImage, Luma};
    use rten::Model;
    use rten_tensor::NdTensor;
    use rten_tensor::prelude::*;
    use tracing::debug;

    use super::{EDGE_THRESHOLD, MODEL_INPUT_SIZE};
    use crate::native::detect::quad_from_edges;

    pub(super) fn detect(
        model: &Model,
        image: &DynamicImage,
        min_document_fraction: f64,
    ) -> Outcome<Quadrilateral<Normalized>> {
        let edges = match edge_map(model, image) {
            Ok(edges) => edges,
            Err(err) => return Outcome::Failure(err),
        };
        let (w, h) = (f64::from(edges.width()), f64::from(edges.height()));
        match quad_from_edges(&edges, min_document_fraction) {
            Some(quad) => Outcome::Success(quad.to_normalized(w, h)),
            None => Outcome::NotFound,
        }
    }

    /// Run the model and binarize its output.
    fn edge_map(model: &Model, image: &DynamicImage) -> Result<GrayImage> {
        let side = MODEL_INPUT_SIZE as usize;
        let rgb = image
            .resize_exact(MODEL_INPUT_SIZE, MODEL_INPUT_SIZE, FilterType::Triangle)
            .to_rgb8();

        let mut data = Vec::with_capacity(3 * side * side);
        for channel in 0..3 {
            for pixel in rgb.pixels() {
                data.push(f32::from(pixel.0[channel]) / 255.0);
            }
        }
        let input = NdTensor::from_data([1, 3, side, side], data);

        let output: NdTensor<f32, 4> = model
            .run_one(input.view().into(), None)
            .map_err(|err| DocflatError::ModelError(format!("edge model inference failed: {err}")))?
            .try_into()
            .map_err(|err| DocflatError::ModelError(format!("unexpected edge model output: {err:?}")))?;

        let [_, _, out_h, out_w] = output.shape();
        debug!(out_w, out_h, "edge map computed");
        Ok(GrayImage::from_fn(out_w as u32, out_h as u32, |x, y| {
            if output[[0, 0, y as usize, x as usize]] > EDGE_THRESHOLD {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn without_model_is_unavailable() {
        let backend = MlBackend::from_config(&AppConfig::default());
        assert!(!backend.is_available());
        assert!(matches!(
            backend.detect(&DynamicImage::new_rgb8(8, 8)),
            Outcome::Failure(DocflatError::PlanUnavailable(PlanId::Ml))
        ));
    }

    #[test]
    fn missing_model_file_disables_plan() {
        let config = AppConfig {
            ml_model_path: Some(PathBuf::from("/nonexistent/edges.rten")),
            ..AppConfig::default()
        };
        assert!(!MlBackend::from_config(&config).is_available());
        assert!(matches!(
            MlBackend::load(&PathBuf::from("/nonexistent/edges.rten"), 0.05),
            Err(DocflatError::ModelError(_))
        ));
    }

    #[test]
    fn correction_uses_native_warp() {
        let backend = MlBackend::unavailable(0.05);
        let out = backend
            .correct(&DynamicImage::new_rgb8(30, 20), &Quadrilateral::unit_square())
            .into_result()
            .unwrap()
            .unwrap();
        assert_eq!((out.width(), out.height()), (30, 20));
    }
}
