// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Four-point perspective transform.

use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::{Point2D, TransformMatrix};

/// Pivots smaller than this are treated as a singular system.
const SINGULAR_EPS: f64 = 1e-10;

/// Projective transform taking each `src[i]` to `dst[i]`.
///
/// With `h22` fixed to 1 the remaining eight entries solve
///
/// ```text
/// u = (h00 x + h01 y + h02) / (h20 x + h21 y + 1)
/// v = (h10 x + h11 y + h12) / (h20 x + h21 y + 1)
/// ```
///
/// for the four correspondences, two equations each. A singular system (for
/// instance, all source corners on one line) yields `DegenerateGeometry`.
pub fn perspective_transform(src: &[Point2D; 4], dst: &[Point2D; 4]) -> Result<TransformMatrix> {
    let mut a = [[0.0f64; 8]; 8];
    let mut b = [0.0f64; 8];

    for i in 0..4 {
        let (x, y) = (src[i].x, src[i].y);
        let (u, v) = (dst[i].x, dst[i].y);

        a[2 * i] = [x, y, 1.0, 0.0, 0.0, 0.0, -x * u, -y * u];
        b[2 * i] = u;
        a[2 * i + 1] = [0.0, 0.0, 0.0, x, y, 1.0, -x * v, -y * v];
        b[2 * i + 1] = v;
    }

    let h = solve_linear_system(a, b).ok_or_else(|| {
        ScanwerkError::DegenerateGeometry(
            "perspective transform is singular (corners are collinear)".into(),
        )
    })?;

    Ok(TransformMatrix {
        m: [[h[0], h[1], h[2]], [h[3], h[4], h[5]], [h[6], h[7], 1.0]],
    })
}

/// Gaussian elimination with partial pivoting.
fn solve_linear_system(mut a: [[f64; 8]; 8], mut b: [f64; 8]) -> Option<[f64; 8]> {
    let n = 8;

    for col in 0..n {
        let pivot = (col..n).max_by(|&r, &s| a[r][col].abs().total_cmp(&a[s][col].abs()))?;
        if a[pivot][col].abs() < SINGULAR_EPS {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0f64; 8];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in (row + 1)..n {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    fn canonical(w: f64, h: f64) -> [Point2D; 4] {
        [p(0.0, 0.0), p(w, 0.0), p(w, h), p(0.0, h)]
    }

    #[test]
    fn corners_round_trip_within_tolerance() {
        let src = [p(123.4, 56.7), p(880.1, 102.9), p(940.0, 1250.5), p(70.2, 1190.3)];
        let dst = canonical(1000.0, 1414.0);
        let t = perspective_transform(&src, &dst).unwrap();
        for (s, d) in src.iter().zip(dst.iter()) {
            let mapped = t.apply(*s);
            assert!(mapped.distance(d) < 1e-3, "{s} mapped to {mapped}, expected {d}");
        }
    }

    #[test]
    fn inverse_maps_destination_back_to_source() {
        let src = [p(10.0, 20.0), p(400.0, 35.0), p(420.0, 610.0), p(-5.0, 580.0)];
        let dst = canonical(1000.0, 1414.0);
        let t = perspective_transform(&src, &dst).unwrap();
        let inv = t.inverse().unwrap();
        for (s, d) in src.iter().zip(dst.iter()) {
            assert!(inv.apply(*d).distance(s) < 1e-3);
        }
    }

    #[test]
    fn scaling_rectangle_gives_affine_matrix() {
        let src = canonical(500.0, 707.0);
        let dst = canonical(1000.0, 1414.0);
        let t = perspective_transform(&src, &dst).unwrap();
        assert!((t.m[0][0] - 2.0).abs() < 1e-9);
        assert!((t.m[1][1] - 2.0).abs() < 1e-9);
        assert!(t.m[2][0].abs() < 1e-12);
        assert!(t.m[2][1].abs() < 1e-12);
        let mid = t.apply(p(250.0, 353.5));
        assert!(mid.distance(&p(500.0, 707.0)) < 1e-9);
    }

    #[test]
    fn collinear_source_is_degenerate() {
        let src = [p(0.0, 0.0), p(10.0, 10.0), p(20.0, 20.0), p(30.0, 30.0)];
        let dst = canonical(100.0, 100.0);
        assert!(matches!(
            perspective_transform(&src, &dst),
            Err(ScanwerkError::DegenerateGeometry(_))
        ));
    }
}
