// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge map construction: hysteresis edge detection followed by dilation to
// close small gaps in the document outline.
//
// The detector runs Sobel gradients directly on the image it is given. The
// caller has already denoised it, so the thresholds apply to that image's
// gradients and not to a second, internally blurred copy.

use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use imageproc::morphology::dilate;
use scanwerk_core::config::EdgeConfig;
use scanwerk_core::error::{Result, ScanwerkError};
use tracing::{debug, instrument};

use crate::filters::ensure_non_empty;

const EDGE: u8 = 255;

/// Build the dilated binary edge map from a denoised grayscale image.
///
/// Edge pixels are 255, background 0.
#[instrument(skip_all, fields(width = gray.width(), height = gray.height()))]
pub fn build_edge_map(gray: &GrayImage, config: &EdgeConfig) -> Result<GrayImage> {
    let edges = detect_edges(gray, config.low_threshold, config.high_threshold)?;
    let thick = thicken_edges(edges, config.dilate_kernel);
    debug!(
        edge_pixels = thick.pixels().filter(|p| p.0[0] > 0).count(),
        "Edge map built"
    );
    Ok(thick)
}

/// Canny edge detection with hysteresis thresholds.
///
/// Gradient strength is the L2 norm of the 3x3 Sobel responses. After
/// non-maximum suppression, pixels above `high` are always edges, pixels at
/// or below `low` never are, and pixels in between are edges only when
/// 8-connected to a strong edge. The one-pixel image border is never an
/// edge.
pub fn detect_edges(gray: &GrayImage, low: f32, high: f32) -> Result<GrayImage> {
    ensure_non_empty(gray.width(), gray.height(), "edge detection")?;
    check_thresholds(low, high)?;

    let (width, height) = gray.dimensions();
    let gx = horizontal_sobel(gray).into_raw();
    let gy = vertical_sobel(gray).into_raw();
    let magnitude: Vec<f32> = gx
        .iter()
        .zip(&gy)
        .map(|(&h, &v)| f32::from(h).hypot(f32::from(v)))
        .collect();

    let thinned = suppress_non_maxima(&magnitude, &gx, &gy, width as usize, height as usize);
    Ok(hysteresis(&thinned, width, height, low, high))
}

fn check_thresholds(low: f32, high: f32) -> Result<()> {
    if !(low.is_finite() && high.is_finite()) || low < 0.0 || low > high {
        return Err(ScanwerkError::InvalidConfig(format!(
            "edge thresholds must satisfy 0 <= low <= high, got low={low} high={high}"
        )));
    }
    Ok(())
}

/// Gradient direction, folded onto the four neighbour axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sector {
    Horizontal,
    Diagonal,
    Vertical,
    AntiDiagonal,
}

fn gradient_sector(gx: i16, gy: i16) -> Sector {
    let mut angle = f32::from(gy).atan2(f32::from(gx)).to_degrees();
    if angle < 0.0 {
        angle += 180.0;
    }
    match angle {
        a if !(22.5..157.5).contains(&a) => Sector::Horizontal,
        a if a < 67.5 => Sector::Diagonal,
        a if a < 112.5 => Sector::Vertical,
        _ => Sector::AntiDiagonal,
    }
}

/// Keep only pixels that peak along their gradient direction.
///
/// The comparison is strict against the preceding neighbour and inclusive
/// against the following one, so a plateau two pixels wide keeps one.
fn suppress_non_maxima(
    magnitude: &[f32],
    gx: &[i16],
    gy: &[i16],
    width: usize,
    height: usize,
) -> Vec<f32> {
    let mut thinned = vec![0.0f32; magnitude.len()];
    if width < 3 || height < 3 {
        return thinned;
    }
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let i = y * width + x;
            let m = magnitude[i];
            if m == 0.0 {
                continue;
            }
            let (before, after) = match gradient_sector(gx[i], gy[i]) {
                Sector::Horizontal => (i - 1, i + 1),
                Sector::Diagonal => (i - width - 1, i + width + 1),
                Sector::Vertical => (i - width, i + width),
                Sector::AntiDiagonal => (i - width + 1, i + width - 1),
            };
            if m > magnitude[before] && m >= magnitude[after] {
                thinned[i] = m;
            }
        }
    }
    thinned
}

/// Grow strong edges through 8-connected weak ones.
fn hysteresis(thinned: &[f32], width: u32, height: u32, low: f32, high: f32) -> GrayImage {
    let (w, h) = (width as usize, height as usize);
    let mut out = GrayImage::new(width, height);
    let marks: &mut [u8] = &mut out;
    let mut stack = Vec::new();

    for seed in 0..thinned.len() {
        if thinned[seed] <= high || marks[seed] == EDGE {
            continue;
        }
        marks[seed] = EDGE;
        stack.push(seed);
        while let Some(i) = stack.pop() {
            let (x, y) = (i % w, i / w);
            for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                    let j = ny * w + nx;
                    if marks[j] != EDGE && thinned[j] > low {
                        marks[j] = EDGE;
                        stack.push(j);
                    }
                }
            }
        }
    }
    out
}

/// Dilate the edge map with a square `kernel_size` x `kernel_size` element.
///
/// Takes the buffer by value; a kernel of 1 hands it straight back.
pub fn thicken_edges(edges: GrayImage, kernel_size: u32) -> GrayImage {
    let radius = kernel_size / 2;
    if radius == 0 {
        return edges;
    }
    // The L∞ ball of radius r is the (2r+1)² square.
    let radius = radius.min(u8::MAX as u32) as u8;
    dilate(&edges, Norm::LInf, radius)
}
