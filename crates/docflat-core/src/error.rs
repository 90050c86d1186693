// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Docflat.

use thiserror::Error;

use crate::types::PlanId;

/// Top-level error type for all Docflat operations.
#[derive(Debug, Error)]
pub enum DocflatError {
    // -- Orchestration errors --
    #[error("no plan configured")]
    NoPlanConfigured,

    #[error("plan {0} is not available on this device")]
    PlanUnavailable(PlanId),

    #[error("{plan} backend failed: {message}")]
    Backend { plan: PlanId, message: String },

    #[error("{plan} backend does not support {capability}")]
    Unsupported {
        plan: PlanId,
        capability: &'static str,
    },

    // -- Geometry errors --
    #[error("invalid quadrilateral: {0}")]
    InvalidQuadrilateral(String),

    // -- Image / model errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("model inference failed: {0}")]
    ModelError(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl DocflatError {
    /// Shorthand for a backend execution failure.
    pub fn backend(plan: PlanId, message: impl Into<String>) -> Self {
        Self::Backend {
            plan,
            message: message.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocflatError>;
