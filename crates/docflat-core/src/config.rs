// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DocflatError, Result};
use crate::types::PlanId;

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backends to try, in order. The last one's result is final.
    pub plans: Vec<PlanId>,
    /// Pixel radius within which a press grabs a corner.
    pub pick_radius: f64,
    /// Longest side the vendor backend works at; larger images are downsized.
    pub max_working_dimension: u32,
    /// Edge-map model for the ML plan (`.rten` file).
    pub ml_model_path: Option<PathBuf>,
    /// Smallest bounding box, as a fraction of the image area, the native
    /// detector accepts as a document.
    pub min_document_fraction: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            plans: vec![PlanId::Ml, PlanId::Native],
            // 8 px corner handle plus 16 px touch slop.
            pick_radius: 24.0,
            max_working_dimension: 1920,
            ml_model_path: None,
            min_document_fraction: 0.05,
        }
    }
}

impl AppConfig {
    /// Check that the values are usable.
    ///
    /// An empty plan list is allowed here; the orchestrator reports it on use.
    pub fn validate(&self) -> Result<()> {
        if !(self.pick_radius.is_finite() && self.pick_radius > 0.0) {
            return Err(DocflatError::Config(format!(
                "pick_radius must be positive, got {}",
                self.pick_radius
            )));
        }
        if self.max_working_dimension == 0 {
            return Err(DocflatError::Config(
                "max_working_dimension must be non-zero".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.min_document_fraction) {
            return Err(DocflatError::Config(format!(
                "min_document_fraction must be in [0, 1), got {}",
                self.min_document_fraction
            )));
        }
        let mut seen = Vec::with_capacity(self.plans.len());
        for plan in &self.plans {
            if seen.contains(plan) {
                return Err(DocflatError::Config(format!("plan {plan} listed twice")));
            }
            seen.push(*plan);
        }
        Ok(())
    }

    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        debug!(path = %path.display(), plans = ?config.plans, "config loaded");
        Ok(config)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
