// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral selection: picks the document boundary among all traced
// contours.
//
// Each contour that clears the area filter is replaced by its convex hull
// (which also absorbs the curl of an open book's pages) and scored by hull
// area. The winner's hull is reduced to its minimum-area bounding rectangle,
// which always yields exactly four corners.

use imageproc::geometry::{contour_area, convex_hull, min_area_rect};
use imageproc::point::Point;
use scanwerk_core::{Point2D, QuadCandidate};
use tracing::{debug, instrument};

use crate::contours::Contour;

/// Below this many contours, scoring stays on the calling thread.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_CONTOURS: usize = 64;

/// A contour that passed the area filter, scored by hull area.
#[derive(Debug, Clone)]
struct ScoredHull {
    /// Position of the contour in the input, used to break ties.
    index: usize,
    area: f64,
    hull: Vec<Point<i32>>,
}

/// Pick the best document candidate, or `None` if no contour's polygon area
/// is strictly greater than `min_area`.
///
/// The result does not depend on contour order except between candidates of
/// exactly equal hull area, where the earliest contour wins. With the
/// `parallel` feature large contour sets are scored on the rayon pool; the
/// reduce step applies the same rule, so the outcome is identical.
#[instrument(skip(contours), fields(count = contours.len()))]
pub fn select_quad(contours: &[Contour], min_area: f64) -> Option<QuadCandidate> {
    let best = best_hull(contours, min_area)?;
    let points = min_area_rect(&best.hull).map(to_point2d);
    debug!(index = best.index, hull_area = best.area, "Document candidate selected");
    Some(QuadCandidate {
        points,
        area: best.area,
    })
}

#[cfg(not(feature = "parallel"))]
fn best_hull(contours: &[Contour], min_area: f64) -> Option<ScoredHull> {
    best_hull_sequential(contours, min_area)
}

#[cfg(feature = "parallel")]
fn best_hull(contours: &[Contour], min_area: f64) -> Option<ScoredHull> {
    if contours.len() < PARALLEL_MIN_CONTOURS {
        best_hull_sequential(contours, min_area)
    } else {
        best_hull_parallel(contours, min_area)
    }
}

fn best_hull_sequential(contours: &[Contour], min_area: f64) -> Option<ScoredHull> {
    contours
        .iter()
        .enumerate()
        .filter_map(|(index, contour)| score(index, contour, min_area))
        .fold(None, |best, candidate| Some(prefer(best, candidate)))
}

#[cfg(feature = "parallel")]
fn best_hull_parallel(contours: &[Contour], min_area: f64) -> Option<ScoredHull> {
    use rayon::prelude::*;

    contours
        .par_iter()
        .enumerate()
        .filter_map(|(index, contour)| score(index, contour, min_area))
        .reduce_with(|a, b| prefer(Some(a), b))
}

/// Apply the area filter and compute the hull score.
fn score(index: usize, contour: &[Point<i32>], min_area: f64) -> Option<ScoredHull> {
    if contour_area(contour) <= min_area {
        return None;
    }
    let hull = convex_hull(contour);
    if hull.len() < 3 {
        return None;
    }
    let area = contour_area(&hull);
    Some(ScoredHull { index, area, hull })
}

/// Larger hull area wins; equal areas keep the earlier contour.
fn prefer(current: Option<ScoredHull>, candidate: ScoredHull) -> ScoredHull {
    match current {
        None => candidate,
        Some(best) => {
            let wins = candidate.area > best.area
                || (candidate.area == best.area && candidate.index < best.index);
            if wins { candidate } else { best }
        }
    }
}

fn to_point2d(p: Point<i32>) -> Point2D {
    Point2D::new(f64::from(p.x), f64::from(p.y))
}
