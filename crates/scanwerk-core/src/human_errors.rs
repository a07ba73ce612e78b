// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people scanning documents.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the CLI reports it (and its exit code).

use crate::error::ScanwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Not a failure: the run finished, but without the hoped-for result.
    Notice,
    /// User must do something (retake the photo, fix a path or setting).
    ActionRequired,
    /// Cannot be fixed by the user from here.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `ScanwerkError` into a `HumanError`.
pub fn humanize_error(err: &ScanwerkError) -> HumanError {
    match err {
        ScanwerkError::LoadFailure(detail) => HumanError {
            message: "The photo couldn't be opened.".into(),
            suggestion: format!(
                "Check the file exists and is a JPEG, PNG, or TIFF image. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        ScanwerkError::InvalidImage(_) => HumanError {
            message: "The photo is empty.".into(),
            suggestion: "The image has no pixels. Try taking the photo again.".into(),
            severity: Severity::ActionRequired,
        },

        ScanwerkError::NoDocumentFound { .. } => HumanError {
            message: "No document found.".into(),
            suggestion: "Try a background with higher contrast.".into(),
            severity: Severity::Notice,
        },

        ScanwerkError::DegenerateGeometry(_) => HumanError {
            message: "The document's corners couldn't be worked out.".into(),
            suggestion: "Keep the whole page in the photo and shoot from straighter on.".into(),
            severity: Severity::ActionRequired,
        },

        ScanwerkError::InvalidConfig(detail) => HumanError {
            message: "A scanner setting is out of range.".into(),
            suggestion: format!("Fix the setting and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        ScanwerkError::ImageEncode(_) => HumanError {
            message: "The scanned page couldn't be saved.".into(),
            suggestion: "Try saving to a different folder or with a .png file name.".into(),
            severity: Severity::Permanent,
        },

        ScanwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Scanwerk doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or pick another location.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    severity: Severity::Permanent,
                }
            }
        }

        ScanwerkError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Check that the settings file is valid JSON.".into(),
            severity: Severity::ActionRequired,
        },
    }
}
