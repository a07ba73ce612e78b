// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use thiserror::Error;

/// Top-level error type for all Scanwerk operations.
#[derive(Debug, Error)]
pub enum ScanwerkError {
    // -- Input errors --
    #[error("failed to load image: {0}")]
    LoadFailure(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    // -- Detection outcomes --
    /// No contour exceeded the area threshold. A normal outcome for a photo
    /// without a visible document; callers usually see it as
    /// `ScanOutcome::NoDocument` rather than as an error.
    #[error("no document found (no contour larger than {min_area} px²)")]
    NoDocumentFound { min_area: f64 },

    #[error("degenerate document geometry: {0}")]
    DegenerateGeometry(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Output / persistence --
    #[error("image encoding failed: {0}")]
    ImageEncode(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScanwerkError {
    /// Whether the error aborts the run. Only `NoDocumentFound` is a
    /// non-fatal, reportable outcome.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::NoDocumentFound { .. })
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanwerkError>;
