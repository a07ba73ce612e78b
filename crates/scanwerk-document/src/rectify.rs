// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification: warps the detected page onto a fixed-size
// upright rectangle.

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use scanwerk_core::config::RectifyConfig;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::{OrderedQuad, Point2D, TransformMatrix};
use tracing::{debug, info, instrument};

use crate::filters::ensure_non_empty;
use crate::homography::perspective_transform;

/// A page warped into the destination rectangle.
#[derive(Debug, Clone)]
pub struct RectifiedDocument {
    /// The `width` x `height` colour output.
    pub image: RgbImage,
    /// Source corners → destination rectangle corners.
    pub transform: TransformMatrix,
}

/// Corners of the destination rectangle, clockwise from the origin.
pub fn destination_corners(config: &RectifyConfig) -> [Point2D; 4] {
    let (w, h) = (config.width as f64, config.height as f64);
    [
        Point2D::new(0.0, 0.0),
        Point2D::new(w, 0.0),
        Point2D::new(w, h),
        Point2D::new(0.0, h),
    ]
}

/// Warp `image` so that `quad` fills a `config.width` x `config.height` frame.
///
/// Every output pixel is pulled back through the inverse transform and
/// sampled bilinearly from the source; samples that fall outside the source
/// are black. Pixel values are not otherwise altered.
#[instrument(skip(image, quad), fields(src_w = image.width(), src_h = image.height()))]
pub fn rectify(
    image: &RgbImage,
    quad: &OrderedQuad,
    config: &RectifyConfig,
) -> Result<RectifiedDocument> {
    ensure_non_empty(image.width(), image.height(), "rectification")?;
    ensure_non_empty(config.width, config.height, "rectification output")?;

    let transform = perspective_transform(&quad.corners(), &destination_corners(config))?;
    debug!(matrix = ?transform.m, "Perspective transform computed");

    let projection = Projection::from_matrix(transform.to_f32_array()).ok_or_else(|| {
        ScanwerkError::DegenerateGeometry("perspective transform is not invertible".into())
    })?;

    let mut output = RgbImage::new(config.width, config.height);
    warp_into(
        image,
        &projection,
        Interpolation::Bilinear,
        Rgb([0u8, 0, 0]),
        &mut output,
    );

    info!(out_w = config.width, out_h = config.height, "Page rectified");
    Ok(RectifiedDocument {
        image: output,
        transform,
    })
}
