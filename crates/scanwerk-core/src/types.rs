// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core geometric domain types for the Scanwerk detection pipeline.

use serde::{Deserialize, Serialize};

/// A point in image coordinates (x to the right, y downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `x + y`, used to find the top-left and bottom-right corners.
    pub fn sum(&self) -> f64 {
        self.x + self.y
    }

    /// `y - x`, used to find the top-right and bottom-left corners.
    pub fn diff(&self) -> f64 {
        self.y - self.x
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// One candidate document boundary: the four corners of the minimum-area
/// rectangle around a contour's convex hull, plus that hull's area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadCandidate {
    pub points: [Point2D; 4],
    /// Convex-hull area of the contour this candidate was built from.
    pub area: f64,
}

/// Four corners labelled top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderedQuad {
    pub top_left: Point2D,
    pub top_right: Point2D,
    pub bottom_right: Point2D,
    pub bottom_left: Point2D,
}

impl OrderedQuad {
    /// Corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [Point2D; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }
}

/// A 3x3 projective transform, row-major, normalised so that `m[2][2] == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformMatrix {
    pub m: [[f64; 3]; 3],
}

impl TransformMatrix {
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Map a point through the transform (homogeneous divide included).
    ///
    /// Points on the line at infinity map to non-finite coordinates.
    #[inline]
    pub fn apply(&self, p: Point2D) -> Point2D {
        let m = &self.m;
        let w = m[2][0] * p.x + m[2][1] * p.y + m[2][2];
        let x = (m[0][0] * p.x + m[0][1] * p.y + m[0][2]) / w;
        let y = (m[1][0] * p.x + m[1][1] * p.y + m[1][2]) / w;
        Point2D::new(x, y)
    }

    /// Inverse transform via the adjugate, or `None` if singular.
    pub fn inverse(&self) -> Option<Self> {
        let m = &self.m;
        let c00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
        let c01 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
        let c02 = m[1][0] * m[2][1] - m[1][1] * m[2][0];
        let det = m[0][0] * c00 + m[0][1] * c01 + m[0][2] * c02;
        if det.abs() < 1e-12 || !det.is_finite() {
            return None;
        }

        let inv = [
            [
                c00,
                m[0][2] * m[2][1] - m[0][1] * m[2][2],
                m[0][1] * m[1][2] - m[0][2] * m[1][1],
            ],
            [
                c01,
                m[0][0] * m[2][2] - m[0][2] * m[2][0],
                m[0][2] * m[1][0] - m[0][0] * m[1][2],
            ],
            [
                c02,
                m[0][1] * m[2][0] - m[0][0] * m[2][1],
                m[0][0] * m[1][1] - m[0][1] * m[1][0],
            ],
        ];

        // Normalise so the bottom-right entry is 1 when possible.
        let scale = if inv[2][2].abs() > 1e-12 {
            inv[2][2]
        } else {
            det
        };
        let mut out = [[0.0; 3]; 3];
        for (r, row) in inv.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                out[r][c] = v / scale;
            }
        }
        Some(Self { m: out })
    }

    /// Row-major `f32` array, the layout `imageproc::Projection::from_matrix` takes.
    pub fn to_f32_array(&self) -> [f32; 9] {
        let m = &self.m;
        [
            m[0][0] as f32,
            m[0][1] as f32,
            m[0][2] as f32,
            m[1][0] as f32,
            m[1][1] as f32,
            m[1][2] as f32,
            m[2][0] as f32,
            m[2][1] as f32,
            m[2][2] as f32,
        ]
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::identity()
    }
}
