// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-document: Document detection and rectification for Scanwerk.
//
// Finds the page in a photo (edge map, external contours, convex-hull
// selection, corner ordering), warps it upright with a four-point
// perspective transform, and binarizes the result for archival or OCR.

pub mod contours;
pub mod corners;
pub mod edges;
pub mod filters;
mod geometry;
pub mod homography;
pub mod rectify;
pub mod scan;
pub mod select;

// Re-export the primary entry points so callers can use `scanwerk_document::DocumentScanner` etc.
pub use contours::{Contour, extract_contours};
pub use corners::{order_corners, validate_quad};
pub use edges::build_edge_map;
pub use homography::perspective_transform;
pub use rectify::{RectifiedDocument, rectify};
pub use scan::{Detection, DocumentScanner, ScanOutcome, ScanOutput, ScanReport};
pub use select::select_quad;
