// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner ordering: labels four unordered points as top-left, top-right,
// bottom-right, bottom-left so the warp does not mirror or rotate the page.

use imageproc::geometry::contour_area;
use imageproc::point::Point;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::{OrderedQuad, Point2D};

use crate::geometry::segments_intersect;

/// Smallest area, in px², a quadrilateral must enclose to be warped.
const MIN_QUAD_AREA: f64 = 1e-6;

/// Label four points by the sum/difference rule.
///
/// - top-left: smallest `x + y`
/// - bottom-right: largest `x + y`
/// - top-right: smallest `y - x`
/// - bottom-left: largest `y - x`
///
/// Each rule is evaluated over all four points independently; the first
/// point wins a tie. For collinear or repeated points two labels can land on
/// the same point. [`validate_quad`] catches that.
pub fn order_corners(points: [Point2D; 4]) -> OrderedQuad {
    let top_left = points[arg_extreme(&points, Point2D::sum, Extreme::Min)];
    let bottom_right = points[arg_extreme(&points, Point2D::sum, Extreme::Max)];
    let top_right = points[arg_extreme(&points, Point2D::diff, Extreme::Min)];
    let bottom_left = points[arg_extreme(&points, Point2D::diff, Extreme::Max)];

    OrderedQuad {
        top_left,
        top_right,
        bottom_right,
        bottom_left,
    }
}

#[derive(Debug, Clone, Copy)]
enum Extreme {
    Min,
    Max,
}

fn arg_extreme(points: &[Point2D; 4], key: fn(&Point2D) -> f64, extreme: Extreme) -> usize {
    let mut best = 0;
    for i in 1..points.len() {
        let (candidate, current) = (key(&points[i]), key(&points[best]));
        let better = match extreme {
            Extreme::Min => candidate < current,
            Extreme::Max => candidate > current,
        };
        if better {
            best = i;
        }
    }
    best
}

/// Reject quadrilaterals that would produce a garbled warp.
///
/// The four labels must name four distinct points, the
/// top-left → top-right → bottom-right → bottom-left outline must not cross
/// itself, and it must enclose a non-zero area.
pub fn validate_quad(quad: &OrderedQuad) -> Result<()> {
    let corners = quad.corners();

    for i in 0..corners.len() {
        for j in (i + 1)..corners.len() {
            if corners[i].distance(&corners[j]) < f64::EPSILON {
                return Err(ScanwerkError::DegenerateGeometry(format!(
                    "corners {i} and {j} coincide at {}",
                    corners[i]
                )));
            }
        }
    }

    let [tl, tr, br, bl] = corners;
    if segments_intersect(&tl, &tr, &br, &bl) || segments_intersect(&tr, &br, &bl, &tl) {
        return Err(ScanwerkError::DegenerateGeometry(
            "corner outline crosses itself".into(),
        ));
    }

    let area = contour_area(&corners.map(|c| Point::new(c.x, c.y)));
    if area < MIN_QUAD_AREA {
        return Err(ScanwerkError::DegenerateGeometry(format!(
            "corners enclose no area ({area:.3e} px²)"
        )));
    }
    Ok(())
}
