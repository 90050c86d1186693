// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people scanning documents.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the front end presents it.

use crate::error::DocflatError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Model hiccup or I/O blip; retrying may work.
    Transient,
    /// User must do something (retake the photo, fix the corners).
    ActionRequired,
    /// Cannot be fixed by retrying or user action.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the caller may retry automatically.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `DocflatError` into a `HumanError`.
pub fn humanize_error(err: &DocflatError) -> HumanError {
    match err {
        DocflatError::NoPlanConfigured => HumanError {
            message: "No document finder is switched on.".into(),
            suggestion: "Enable at least one plan (for example \"native\") in the settings.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocflatError::PlanUnavailable(plan) => HumanError {
            message: "This way of finding documents isn't available on your device.".into(),
            suggestion: format!("Remove \"{plan}\" from the plan list, or put \"native\" after it as a fallback."),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocflatError::Backend { .. } => HumanError {
            message: "We couldn't process this photo.".into(),
            suggestion: "Try again. If it keeps failing, retake the photo in better light.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        DocflatError::Unsupported { plan, capability } => HumanError {
            message: format!("The {plan} finder can't {capability}."),
            suggestion: "Put another plan after it in the plan list.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocflatError::InvalidQuadrilateral(_) => HumanError {
            message: "The corners don't outline a page.".into(),
            suggestion: "Drag the corners so they sit on the four corners of the document without crossing.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocflatError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocflatError::ModelError(_) => HumanError {
            message: "The edge-finding model didn't work.".into(),
            suggestion: "Check the model file path in the settings, or fall back to the native plan.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        DocflatError::Config(detail) => HumanError {
            message: "The settings file has a problem.".into(),
            suggestion: format!("Fix or delete the settings file to restore defaults. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocflatError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "The app doesn't have permission to use that file.".into(),
                suggestion: "Check the file permissions, or copy the file somewhere else first.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                retriable: true,
                severity: Severity::Transient,
            },
        },

        DocflatError::Serialization(_) => HumanError {
            message: "Some saved data couldn't be read.".into(),
            suggestion: "Check the corners or settings JSON for typos.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocflatError::PlatformUnavailable => HumanError {
            message: "This feature isn't available on your device.".into(),
            suggestion: "Some document finders need a specific phone or tablet.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlanId;

    #[test]
    fn backend_failure_is_transient() {
        let human = humanize_error(&DocflatError::backend(PlanId::Ml, "tensor shape mismatch"));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn bad_corners_need_user_action() {
        let human = humanize_error(&DocflatError::InvalidQuadrilateral("edges cross".into()));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn unavailable_plan_names_the_plan() {
        let human = humanize_error(&DocflatError::PlanUnavailable(PlanId::Vendor));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.suggestion.contains("vendor"));
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = DocflatError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }
}
