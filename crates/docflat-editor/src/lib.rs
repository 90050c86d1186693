// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docflat editor — turns pointer events into corner edits that keep the four
// corner roles consistent with their on-screen positions.

pub mod adjust;
pub mod gesture;
pub mod session;

pub use adjust::adjust;
pub use gesture::{CornerGesture, GesturePhase, GestureResponse, GestureState};
pub use hit_test::pick_corner;
pub use session::DocumentSession;
