// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docflat — Core geometry, quadrilateral model, configuration and error
// definitions shared across all crates.

pub mod config;
pub mod error;
pub mod geometry;
pub mod human_errors;
pub mod quad;
pub mod types;

pub use config::AppConfig;
pub use error::DocflatError;
pub use quad::{Normalized, Pixel, Quadrilateral};
pub use types::*;
