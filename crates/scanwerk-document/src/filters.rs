// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-pixel filter collaborators: grayscale conversion, Gaussian denoising,
// and adaptive Gaussian binarization. Thin wrappers over the `image` and
// `imageproc` crates with the parameter conventions the scanner uses.

use image::{GrayImage, Luma, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use scanwerk_core::config::{BlurConfig, ThresholdConfig};
use scanwerk_core::error::{Result, ScanwerkError};
use tracing::{debug, instrument};

/// Fail with `InvalidImage` when either dimension is zero.
pub(crate) fn ensure_non_empty(width: u32, height: u32, stage: &str) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ScanwerkError::InvalidImage(format!(
            "{stage} received a {width}x{height} image"
        )));
    }
    Ok(())
}

/// Gaussian sigma for an odd kernel size when none is given explicitly.
///
/// `0.3 * ((k - 1) * 0.5 - 1) + 0.8`, the usual derivation (1.1 for 5,
/// 3.5 for 21).
pub fn auto_sigma(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Convert to single-channel luminance with fixed channel weights.
pub fn grayscale(image: &RgbImage) -> Result<GrayImage> {
    ensure_non_empty(image.width(), image.height(), "grayscale")?;
    Ok(image::imageops::grayscale(image))
}

/// Smooth a grayscale image before edge detection.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn gaussian_blur(gray: &GrayImage, config: &BlurConfig) -> Result<GrayImage> {
    ensure_non_empty(gray.width(), gray.height(), "gaussian blur")?;
    // A 1x1 kernel with automatic sigma is the identity.
    if config.sigma <= 0.0 && config.kernel_size <= 1 {
        return Ok(gray.clone());
    }
    let sigma = if config.sigma > 0.0 {
        config.sigma
    } else {
        auto_sigma(config.kernel_size)
    };
    debug!(sigma, kernel_size = config.kernel_size, "Applying Gaussian blur");
    Ok(gaussian_blur_f32(gray, sigma))
}

/// Binarize against a Gaussian-weighted local mean.
///
/// A pixel becomes white (255) when it is brighter than the weighted mean of
/// its `block_size` neighbourhood minus `offset`, black (0) otherwise. Uneven
/// lighting across the page shifts the local mean with it, so shadows do not
/// turn into black blotches.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn adaptive_threshold(gray: &GrayImage, config: &ThresholdConfig) -> Result<GrayImage> {
    ensure_non_empty(gray.width(), gray.height(), "adaptive threshold")?;
    let sigma = auto_sigma(config.block_size);
    let local_mean = gaussian_blur_f32(gray, sigma);

    let (width, height) = gray.dimensions();
    let mut output = GrayImage::new(width, height);
    for (x, y, pixel) in gray.enumerate_pixels() {
        let threshold = local_mean.get_pixel(x, y).0[0] as f32 - config.offset;
        let value = if pixel.0[0] as f32 > threshold { 255u8 } else { 0u8 };
        output.put_pixel(x, y, Luma([value]));
    }

    debug!(sigma, offset = config.offset, "Adaptive threshold complete");
    Ok(output)
}
