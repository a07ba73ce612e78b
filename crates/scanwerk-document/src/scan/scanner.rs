// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document scanner: runs the full detection pipeline on one photo:
// grayscale, blur, edges, contours, quadrilateral selection, corner
// ordering, perspective rectification, and adaptive binarization.

use image::{DynamicImage, GrayImage, RgbImage};
use scanwerk_core::config::ScanConfig;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::{OrderedQuad, QuadCandidate, TransformMatrix};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::contours::extract_contours;
use crate::corners::{order_corners, validate_quad};
use crate::edges::build_edge_map;
use crate::filters::{adaptive_threshold, gaussian_blur, grayscale};
use crate::rectify::rectify;
use crate::select::select_quad;

/// The document boundary found in a photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// The winning candidate, corners in rectangle traversal order.
    pub candidate: QuadCandidate,
    /// The same corners labelled for the warp.
    pub quad: OrderedQuad,
}

/// Everything a successful scan produces.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// The photo as loaded.
    pub original: RgbImage,
    /// The page warped upright, in colour.
    pub rectified: RgbImage,
    /// The rectified page after adaptive binarization.
    pub binarized: GrayImage,
    pub detection: Detection,
    pub transform: TransformMatrix,
}

/// Result of a scan that ran to completion.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// A page was found and rectified.
    Scanned(Box<ScanOutput>),
    /// No contour was larger than `min_area`; nothing was rectified.
    NoDocument { min_area: f64 },
}

impl ScanOutcome {
    /// Treat "no document" as an error, for callers that want a single `Result`.
    pub fn into_result(self) -> Result<ScanOutput> {
        match self {
            Self::Scanned(output) => Ok(*output),
            Self::NoDocument { min_area } => Err(ScanwerkError::NoDocumentFound { min_area }),
        }
    }

    pub fn is_scanned(&self) -> bool {
        matches!(self, Self::Scanned(_))
    }
}

/// Machine-readable summary of a scan, for JSON reports.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub source_width: u32,
    pub source_height: u32,
    pub output_width: u32,
    pub output_height: u32,
    pub detection: Detection,
    pub transform: TransformMatrix,
}

impl ScanOutput {
    pub fn report(&self) -> ScanReport {
        ScanReport {
            source_width: self.original.width(),
            source_height: self.original.height(),
            output_width: self.rectified.width(),
            output_height: self.rectified.height(),
            detection: self.detection.clone(),
            transform: self.transform,
        }
    }
}

/// Finds, flattens, and cleans up the document in a single photo.
///
/// Each scanner owns one image and one configuration; nothing carries over
/// between scans.
pub struct DocumentScanner {
    /// The photo being scanned, always three-channel.
    image: RgbImage,
    config: ScanConfig,
}

impl DocumentScanner {
    // -- Construction ---------------------------------------------------------

    /// Create a scanner from raw image bytes (JPEG, PNG, TIFF, etc.).
    #[instrument(skip(data, config), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8], config: ScanConfig) -> Result<Self> {
        let image = image::load_from_memory(data).map_err(|err| {
            ScanwerkError::LoadFailure(format!("failed to decode image: {err}"))
        })?;
        Self::from_dynamic(image, config)
    }

    /// Create a scanner from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>, config: ScanConfig) -> Result<Self> {
        let image = image::open(path.as_ref()).map_err(|err| {
            ScanwerkError::LoadFailure(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(
            width = image.width(),
            height = image.height(),
            "Photo loaded"
        );
        Self::from_dynamic(image, config)
    }

    /// Create a scanner wrapping an existing `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage, config: ScanConfig) -> Result<Self> {
        Self::from_rgb(image.to_rgb8(), config)
    }

    /// Create a scanner wrapping an RGB buffer.
    pub fn from_rgb(image: RgbImage, config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { image, config })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Borrow the photo.
    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    // -- Pipeline -------------------------------------------------------------

    /// Dilated binary edge map of the photo.
    pub fn edge_map(&self) -> Result<GrayImage> {
        let gray = grayscale(&self.image)?;
        let blurred = gaussian_blur(&gray, &self.config.blur)?;
        build_edge_map(&blurred, &self.config.edges)
    }

    /// Locate the document boundary without warping anything.
    ///
    /// `Ok(None)` means no contour cleared the area threshold.
    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn detect(&self) -> Result<Option<Detection>> {
        let edges = self.edge_map()?;
        let contours = extract_contours(&edges)?;
        debug!(contours = contours.len(), "Contours found");

        let min_area = self.config.selection.min_contour_area;
        let Some(candidate) = select_quad(&contours, min_area) else {
            warn!(min_area, "No contour above the area threshold");
            return Ok(None);
        };

        let quad = order_corners(candidate.points);
        validate_quad(&quad)?;
        debug!(
            top_left = %quad.top_left,
            top_right = %quad.top_right,
            bottom_right = %quad.bottom_right,
            bottom_left = %quad.bottom_left,
            hull_area = candidate.area,
            "Document corners ordered"
        );
        Ok(Some(Detection { candidate, quad }))
    }

    /// Run the whole pipeline.
    ///
    /// Fatal problems come back as `Err`; a photo without a document is the
    /// `ScanOutcome::NoDocument` success value and nothing is rectified.
    #[instrument(skip(self))]
    pub fn scan(self) -> Result<ScanOutcome> {
        info!("Starting document scan");

        let Some(detection) = self.detect()? else {
            return Ok(ScanOutcome::NoDocument {
                min_area: self.config.selection.min_contour_area,
            });
        };

        let rectified = rectify(&self.image, &detection.quad, &self.config.rectify)?;
        let rectified_gray = grayscale(&rectified.image)?;
        let binarized = adaptive_threshold(&rectified_gray, &self.config.threshold)?;

        info!(hull_area = detection.candidate.area, "Document scanned");
        Ok(ScanOutcome::Scanned(Box::new(ScanOutput {
            original: self.image,
            rectified: rectified.image,
            binarized,
            detection,
            transform: rectified.transform,
        })))
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// White rectangle from (x0, y0) to (x1, y1) exclusive on black.
    fn page_on_black(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> RgbImage {
        let mut img = RgbImage::new(w, h);
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        img
    }

    #[test]
    fn blank_image_finds_no_document() {
        let img = RgbImage::new(200, 300);
        let scanner = DocumentScanner::from_rgb(img, ScanConfig::default()).unwrap();
        let outcome = scanner.scan().unwrap();
        assert!(matches!(outcome, ScanOutcome::NoDocument { min_area } if min_area == 5000.0));
    }

    #[test]
    fn no_document_converts_to_error() {
        let outcome = ScanOutcome::NoDocument { min_area: 5000.0 };
        assert!(matches!(
            outcome.into_result(),
            Err(ScanwerkError::NoDocumentFound { .. })
        ));
    }

    #[test]
    fn empty_image_is_invalid() {
        let scanner =
            DocumentScanner::from_rgb(RgbImage::new(0, 0), ScanConfig::default()).unwrap();
        assert!(matches!(scanner.scan(), Err(ScanwerkError::InvalidImage(_))));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = ScanConfig::default();
        config.blur.kernel_size = 4;
        assert!(matches!(
            DocumentScanner::from_rgb(RgbImage::new(10, 10), config),
            Err(ScanwerkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn garbage_bytes_are_a_load_failure() {
        let result = DocumentScanner::from_bytes(b"definitely not an image", ScanConfig::default());
        assert!(matches!(result, Err(ScanwerkError::LoadFailure(_))));
    }

    #[test]
    fn detects_synthetic_page() {
        let img = page_on_black(400, 500, 50, 60, 350, 440);
        let scanner = DocumentScanner::from_rgb(img, ScanConfig::default()).unwrap();
        let detection = scanner.detect().unwrap().expect("page should be found");

        let quad = detection.quad;
        let tol = 6.0;
        assert!(quad.top_left.distance(&(50.0, 60.0).into()) < tol, "{}", quad.top_left);
        assert!(quad.top_right.distance(&(349.0, 60.0).into()) < tol, "{}", quad.top_right);
        assert!(quad.bottom_right.distance(&(349.0, 439.0).into()) < tol, "{}", quad.bottom_right);
        assert!(quad.bottom_left.distance(&(50.0, 439.0).into()) < tol, "{}", quad.bottom_left);
        assert!(detection.candidate.area > 300.0 * 380.0 * 0.9);
    }

    #[test]
    fn scan_produces_three_images() {
        let img = page_on_black(300, 400, 40, 50, 260, 350);
        let scanner = DocumentScanner::from_rgb(img, ScanConfig::default()).unwrap();
        let output = scanner.scan().unwrap().into_result().unwrap();

        assert_eq!(output.original.dimensions(), (300, 400));
        assert_eq!(output.rectified.dimensions(), (1000, 1414));
        assert_eq!(output.binarized.dimensions(), (1000, 1414));
        // The middle of the page is white paper.
        assert!(output.rectified.get_pixel(500, 707).0.iter().all(|&c| c > 200));
        assert_eq!(output.binarized.get_pixel(500, 707).0[0], 255);

        let report = output.report();
        assert_eq!((report.output_width, report.output_height), (1000, 1414));
    }
}
