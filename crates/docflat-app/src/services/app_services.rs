// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — builds the backend orchestrator from the config and
// provides async methods for the command handlers.
//
// Detection and correction are CPU-bound, so each call runs on the blocking
// pool. The orchestrator is only read after start-up and is shared via `Arc`.

use std::path::Path;
use std::sync::Arc;

use docflat_backend::BackendOrchestrator;
use docflat_core::error::{DocflatError, Result};
use docflat_core::{AppConfig, Normalized, Outcome, PlanId, Quadrilateral};
use docflat_editor::DocumentSession;
use image::{DynamicImage, ImageDecoder, ImageReader};
use tracing::{debug, info, instrument};

/// Shared application services.
#[derive(Clone)]
pub struct AppServices {
    orchestrator: Arc<BackendOrchestrator>,
    config: Arc<AppConfig>,
}

impl AppServices {
    /// Build the backends and probe them. Call once at start-up.
    pub fn init(config: AppConfig) -> Self {
        let orchestrator = BackendOrchestrator::from_config(&config);
        for plan in PlanId::ALL {
            debug!(%plan, available = orchestrator.is_available(plan), "plan availability");
        }
        info!(plans = ?orchestrator.plans(), "app services initialised");

        Self {
            orchestrator: Arc::new(orchestrator),
            config: Arc::new(config),
        }
    }

    // -- Images ---------------------------------------------------------------

    /// Decode an image file, applying its EXIF orientation.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load_image(path: &Path) -> Result<DynamicImage> {
        let mut decoder = ImageReader::open(path)?
            .with_guessed_format()?
            .into_decoder()
            .map_err(|err| {
                DocflatError::ImageError(format!("cannot decode {}: {err}", path.display()))
            })?;
        let orientation = decoder.orientation().map_err(|err| {
            DocflatError::ImageError(format!("cannot read orientation of {}: {err}", path.display()))
        })?;
        let mut image = DynamicImage::from_decoder(decoder).map_err(|err| {
            DocflatError::ImageError(format!("cannot decode {}: {err}", path.display()))
        })?;
        image.apply_orientation(orientation);
        debug!(width = image.width(), height = image.height(), "image loaded");
        Ok(image)
    }

    /// Write `image` as 8-bit RGB; the format follows the file extension.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        DynamicImage::ImageRgb8(image.to_rgb8())
            .save(path)
            .map_err(|err| DocflatError::ImageError(format!("cannot write {}: {err}", path.display())))?;
        info!(width = image.width(), height = image.height(), "image written");
        Ok(())
    }

    // -- Detection & correction -----------------------------------------------

    /// Find the document corners on the blocking pool.
    pub async fn detect(&self, image: Arc<DynamicImage>) -> Outcome<Quadrilateral<Normalized>> {
        let orchestrator = Arc::clone(&self.orchestrator);
        run_blocking(move || orchestrator.detect(&image)).await
    }

    /// Flatten the region under `quad` on the blocking pool.
    pub async fn correct(
        &self,
        image: Arc<DynamicImage>,
        quad: Quadrilateral<Normalized>,
    ) -> Outcome<DynamicImage> {
        let orchestrator = Arc::clone(&self.orchestrator);
        run_blocking(move || orchestrator.correct(&image, &quad)).await
    }

    // -- Editing --------------------------------------------------------------

    /// An editing session over `image`, starting from `detected` or the frame.
    pub fn session(
        &self,
        image: &DynamicImage,
        detected: Option<Quadrilateral<Normalized>>,
    ) -> DocumentSession {
        DocumentSession::with_detection(
            image.width(),
            image.height(),
            self.config.pick_radius,
            detected,
        )
    }
}

async fn run_blocking<T, F>(call: F) -> Outcome<T>
where
    T: Send + 'static,
    F: FnOnce() -> Outcome<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(outcome) => outcome,
        Err(err) => Outcome::Failure(DocflatError::Io(std::io::Error::other(format!(
            "worker task failed: {err}"
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docflat_core::CornerLabel;
    use image::{Rgb, RgbImage};

    /// Dark frame with a bright page from (40, 30) to (280, 210).
    fn page() -> DynamicImage {
        let mut img = RgbImage::from_pixel(320, 240, Rgb([25, 25, 30]));
        for y in 30..210 {
            for x in 40..280 {
                img.put_pixel(x, y, Rgb([240, 238, 230]));
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    fn native_only() -> AppServices {
        AppServices::init(AppConfig {
            plans: vec![PlanId::Native],
            ..AppConfig::default()
        })
    }

    #[tokio::test]
    async fn detects_page_on_blocking_pool() {
        let services = native_only();
        let quad = services
            .detect(Arc::new(page()))
            .await
            .into_result()
            .unwrap()
            .expect("page should be found");
        let tl = quad[CornerLabel::TopLeft];
        assert!((tl.x - 0.125).abs() < 0.03, "top-left at {tl}");
        assert!((tl.y - 0.125).abs() < 0.03, "top-left at {tl}");
    }

    #[tokio::test]
    async fn default_plans_fall_back_to_native() {
        // No model configured, so the ML plan is unavailable and skipped.
        let services = AppServices::init(AppConfig::default());
        assert!(services.detect(Arc::new(page())).await.is_success());
    }

    #[tokio::test]
    async fn degenerate_corners_are_rejected() {
        let services = native_only();
        let p = docflat_core::Point2D::new(0.5, 0.5);
        let outcome = services
            .correct(Arc::new(page()), Quadrilateral::new(p, p, p, p))
            .await;
        assert!(matches!(
            outcome,
            Outcome::Failure(DocflatError::InvalidQuadrilateral(_))
        ));
    }

    #[tokio::test]
    async fn load_correct_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        page().save(&input).unwrap();

        let image = Arc::new(AppServices::load_image(&input).unwrap());
        assert_eq!((image.width(), image.height()), (320, 240));

        let services = native_only();
        let flat = services
            .correct(image, Quadrilateral::unit_square())
            .await
            .into_result()
            .unwrap()
            .unwrap();

        let output = dir.path().join("out/flat.jpg");
        AppServices::save_image(&flat, &output).unwrap();
        let written = image::open(&output).unwrap();
        assert_eq!((written.width(), written.height()), (320, 240));
    }

    #[test]
    fn missing_image_is_io_error() {
        let err = AppServices::load_image(Path::new("/nonexistent/photo.png")).unwrap_err();
        assert!(matches!(err, DocflatError::Io(_)));
    }

    #[test]
    fn session_uses_configured_pick_radius() {
        let services = AppServices::init(AppConfig {
            pick_radius: 5.0,
            ..AppConfig::default()
        });
        let image = DynamicImage::new_rgb8(100, 100);
        let mut session = services.session(&image, None);
        // 6 px from the top-left corner: outside a 5 px radius.
        assert!(!session.handle(
            docflat_editor::GesturePhase::Press,
            docflat_core::Point2D::new(6.0, 0.0)
        ));
    }
}
