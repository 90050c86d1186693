// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docflat backends — corner detection and perspective correction behind a
// common capability contract, plus the orchestrator that runs them in a
// configured fallback order.

pub mod ml;
pub mod native;
pub mod orchestrator;
pub mod plan;
pub mod vendor;

pub use ml::MlBackend;
pub use native::NativeBackend;
pub use orchestrator::BackendOrchestrator;
pub use plan::{BackendSet, DocumentBackend};
pub use vendor::{VendorAnalyzer, VendorBackend};
