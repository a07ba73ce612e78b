// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner configuration. Every tuning constant of the detection pipeline
// lives here with its documented default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanwerkError};

/// Gaussian denoising applied before edge detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Odd kernel size (default 5).
    pub kernel_size: u32,
    /// Standard deviation; `0.0` derives it from `kernel_size`.
    pub sigma: f32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            sigma: 0.0,
        }
    }
}

/// Hysteresis edge detection and the dilation that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Gradients below this are never edges (default 75).
    pub low_threshold: f32,
    /// Gradients above this are always edges (default 200).
    pub high_threshold: f32,
    /// Side of the square dilation element, odd (default 5).
    pub dilate_kernel: u32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_threshold: 75.0,
            high_threshold: 200.0,
            dilate_kernel: 5,
        }
    }
}

/// Contour filtering for the quadrilateral selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Contours whose polygon area is not strictly greater than this are
    /// ignored (default 5000 px²). Absolute, so it does not scale with the
    /// input resolution.
    pub min_contour_area: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_contour_area: 5000.0,
        }
    }
}

/// Size of the rectified output rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyConfig {
    /// Output width in pixels (default 1000).
    pub width: u32,
    /// Output height in pixels (default 1414, roughly A4 proportions).
    pub height: u32,
}

impl Default for RectifyConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1414,
        }
    }
}

/// Adaptive Gaussian binarization of the rectified page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Odd neighbourhood size (default 21).
    pub block_size: u32,
    /// Constant subtracted from the local mean (default 5).
    pub offset: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            block_size: 21,
            offset: 5.0,
        }
    }
}

/// Complete scanner settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub blur: BlurConfig,
    pub edges: EdgeConfig,
    pub selection: SelectionConfig,
    pub rectify: RectifyConfig,
    pub threshold: ThresholdConfig,
}

impl ScanConfig {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        require_odd("blur.kernel_size", self.blur.kernel_size)?;
        require_odd("edges.dilate_kernel", self.edges.dilate_kernel)?;
        require_odd("threshold.block_size", self.threshold.block_size)?;

        if self.blur.sigma < 0.0 || !self.blur.sigma.is_finite() {
            return Err(ScanwerkError::InvalidConfig(format!(
                "blur.sigma must be a non-negative number, got {}",
                self.blur.sigma
            )));
        }
        let (low, high) = (self.edges.low_threshold, self.edges.high_threshold);
        if !(low.is_finite() && high.is_finite()) || low < 0.0 {
            return Err(ScanwerkError::InvalidConfig(format!(
                "edge thresholds must be non-negative numbers, got {low} and {high}"
            )));
        }
        if low > high {
            return Err(ScanwerkError::InvalidConfig(format!(
                "edges.low_threshold ({low}) exceeds edges.high_threshold ({high})"
            )));
        }
        if !(self.selection.min_contour_area >= 0.0) {
            return Err(ScanwerkError::InvalidConfig(
                "selection.min_contour_area must be non-negative".into(),
            ));
        }
        if self.rectify.width == 0 || self.rectify.height == 0 {
            return Err(ScanwerkError::InvalidConfig(format!(
                "rectify size must be non-zero, got {}x{}",
                self.rectify.width, self.rectify.height
            )));
        }
        Ok(())
    }
}

fn require_odd(name: &str, value: u32) -> Result<()> {
    if value == 0 || value % 2 == 0 {
        return Err(ScanwerkError::InvalidConfig(format!(
            "{name} must be a positive odd number, got {value}"
        )));
    }
    Ok(())
}
