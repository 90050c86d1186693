// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fallback orchestration — runs the configured plans in order until one
// succeeds, and returns the last plan's outcome unmodified.

use std::collections::BTreeMap;

use docflat_core::{AppConfig, DocflatError, Normalized, Outcome, PlanId, Quadrilateral};
use image::DynamicImage;
use tracing::{debug, info, instrument, warn};

use crate::plan::{BackendSet, DocumentBackend};

/// Runs detection and correction across an ordered list of plans.
///
/// Every plan but the last is best-effort: any non-success is logged and the
/// next plan runs. The last plan's outcome is what the caller sees. Plans are
/// tried sequentially; backend availability is probed at construction and on
/// [`refresh_availability`](Self::refresh_availability) only.
#[derive(Debug)]
pub struct BackendOrchestrator {
    backends: BackendSet,
    plans: Vec<PlanId>,
    availability: BTreeMap<PlanId, bool>,
}

impl BackendOrchestrator {
    pub fn new(backends: BackendSet, plans: Vec<PlanId>) -> Self {
        let mut orchestrator = Self {
            backends,
            plans,
            availability: BTreeMap::new(),
        };
        orchestrator.refresh_availability();
        orchestrator
    }

    /// Standard backends and plan order from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(BackendSet::from_config(config), config.plans.clone())
    }

    pub fn plans(&self) -> &[PlanId] {
        &self.plans
    }

    pub fn set_plans(&mut self, plans: Vec<PlanId>) {
        info!(?plans, "plan order changed");
        self.plans = plans;
    }

    /// Result of the most recent availability probe.
    pub fn is_available(&self, plan: PlanId) -> bool {
        self.availability.get(&plan).copied().unwrap_or(false)
    }

    /// Probe every backend again.
    pub fn refresh_availability(&mut self) {
        for plan in PlanId::ALL {
            let available = self.backends.get(plan).is_available();
            debug!(%plan, available, "backend probed");
            self.availability.insert(plan, available);
        }
    }

    /// Find the document corners in `image`.
    #[instrument(skip_all, fields(width = image.width(), height = image.height(), plans = ?self.plans))]
    pub fn detect(&self, image: &DynamicImage) -> Outcome<Quadrilateral<Normalized>> {
        self.run("detect", |backend| backend.detect(image))
    }

    /// Flatten the region under `quad`.
    ///
    /// Degenerate quads are rejected before any backend runs; that failure is
    /// not retried on other plans.
    #[instrument(skip_all, fields(width = image.width(), height = image.height(), plans = ?self.plans))]
    pub fn correct(
        &self,
        image: &DynamicImage,
        quad: &Quadrilateral<Normalized>,
    ) -> Outcome<DynamicImage> {
        if let Err(err) = quad.validate() {
            warn!(error = %err, "refusing to correct degenerate quadrilateral");
            return Outcome::Failure(err);
        }
        self.run("correct", |backend| backend.correct(image, quad))
    }

    fn run<T>(
        &self,
        capability: &'static str,
        call: impl Fn(&dyn DocumentBackend) -> Outcome<T>,
    ) -> Outcome<T> {
        let Some((&last, fallible)) = self.plans.split_last() else {
            warn!(capability, "no plan configured");
            return Outcome::Failure(DocflatError::NoPlanConfigured);
        };

        for &plan in fallible {
            match self.attempt(plan, &call) {
                Outcome::Success(value) => {
                    info!(%plan, capability, "plan succeeded");
                    return Outcome::Success(value);
                }
                Outcome::NotFound => {
                    info!(%plan, capability, "plan found no document, falling back");
                }
                Outcome::Failure(err) => {
                    warn!(%plan, capability, error = %err, "plan failed, falling back");
                }
            }
        }

        let outcome = self.attempt(last, &call);
        match &outcome {
            Outcome::Success(_) => info!(plan = %last, capability, "plan succeeded"),
            Outcome::NotFound => info!(plan = %last, capability, "no document found"),
            Outcome::Failure(err) => warn!(plan = %last, capability, error = %err, "last plan failed"),
        }
        outcome
    }

    fn attempt<T>(
        &self,
        plan: PlanId,
        call: &impl Fn(&dyn DocumentBackend) -> Outcome<T>,
    ) -> Outcome<T> {
        if !self.is_available(plan) {
            return Outcome::Failure(DocflatError::PlanUnavailable(plan));
        }
        debug!(%plan, "running plan");
        call(self.backends.get(plan))
    }
}
