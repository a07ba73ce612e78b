// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour extraction: outermost boundaries of connected white regions in
// the edge map, with straight runs collapsed to their end points.

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::contour_area;
use imageproc::point::Point;
use scanwerk_core::error::Result;
use tracing::{debug, instrument};

use crate::filters::ensure_non_empty;

/// A closed boundary traced from the edge map, in pixel coordinates.
pub type Contour = Vec<Point<i32>>;

/// Trace the external boundaries of all foreground regions.
///
/// Only top-level outer borders are returned: holes, and anything nested
/// inside a hole, are skipped. Each contour is compressed with
/// [`compress_collinear`]. Single-pixel regions and boundaries that enclose
/// no area produce nothing. The order of the result is unspecified.
#[instrument(skip_all, fields(width = edges.width(), height = edges.height()))]
pub fn extract_contours(edges: &GrayImage) -> Result<Vec<Contour>> {
    ensure_non_empty(edges.width(), edges.height(), "contour extraction")?;

    let traced = find_contours::<i32>(edges);
    let total = traced.len();

    let contours: Vec<Contour> = traced
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| compress_collinear(&c.points))
        .filter(|points| points.len() >= 3 && contour_area(points) > 0.0)
        .collect();

    debug!(traced = total, external = contours.len(), "Contours extracted");
    Ok(contours)
}

/// Drop vertices that sit in the middle of a straight run.
///
/// A vertex is redundant when it is collinear with its neighbours and the
/// path keeps going the same way through it. Turn-backs (the tip of a
/// one-pixel spur) are kept. Repeated consecutive points are merged. The
/// input is treated as a closed ring.
pub fn compress_collinear(points: &[Point<i32>]) -> Contour {
    let mut out: Contour = Vec::with_capacity(points.len());
    for p in points {
        if out.last() == Some(p) {
            continue;
        }
        while out.len() >= 2 && is_pass_through(out[out.len() - 2], out[out.len() - 1], *p) {
            out.pop();
        }
        out.push(*p);
    }

    // Close the ring: the last and first points may themselves be redundant.
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    loop {
        let n = out.len();
        if n < 3 {
            break;
        }
        if is_pass_through(out[n - 2], out[n - 1], out[0]) {
            out.pop();
        } else if is_pass_through(out[n - 1], out[0], out[1]) {
            out.remove(0);
        } else {
            break;
        }
    }
    out
}

/// `b` lies on the straight path from `a` to `c`, strictly between them.
fn is_pass_through(a: Point<i32>, b: Point<i32>, c: Point<i32>) -> bool {
    let (abx, aby) = (i64::from(b.x - a.x), i64::from(b.y - a.y));
    let (bcx, bcy) = (i64::from(c.x - b.x), i64::from(c.y - b.y));
    abx * bcy - aby * bcx == 0 && abx * bcx + aby * bcy > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn ring(coords: &[(i32, i32)]) -> Contour {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn fill(img: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) {
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
    }

    #[test]
    fn empty_image_produces_no_contours() {
        let img = GrayImage::new(10, 10);
        assert!(extract_contours(&img).unwrap().is_empty());
    }

    #[test]
    fn zero_sized_image_is_invalid() {
        assert!(extract_contours(&GrayImage::new(0, 4)).is_err());
    }

    #[test]
    fn single_pixel_produces_nothing() {
        let mut img = GrayImage::new(10, 10);
        img.put_pixel(5, 5, Luma([255u8]));
        assert!(extract_contours(&img).unwrap().is_empty());
    }

    #[test]
    fn filled_square_compresses_to_four_corners() {
        let mut img = GrayImage::new(40, 40);
        fill(&mut img, 5, 5, 25, 25);
        let contours = extract_contours(&img).unwrap();
        assert_eq!(contours.len(), 1);
        let square = &contours[0];
        assert_eq!(square.len(), 4);
        assert_eq!(contour_area(square), 361.0);
        for (x, y) in [(5, 5), (24, 5), (24, 24), (5, 24)] {
            assert!(square.contains(&Point::new(x, y)));
        }
    }

    #[test]
    fn holes_and_their_contents_are_ignored() {
        // A frame with a blob inside its hole.
        let mut img = GrayImage::new(60, 60);
        fill(&mut img, 5, 5, 55, 55);
        for y in 10..50 {
            for x in 10..50 {
                img.put_pixel(x, y, Luma([0u8]));
            }
        }
        fill(&mut img, 25, 25, 35, 35);

        let contours = extract_contours(&img).unwrap();
        assert_eq!(contours.len(), 1);
        assert_eq!(contour_area(&contours[0]), 49.0 * 49.0);
    }

    #[test]
    fn separate_regions_each_get_a_contour() {
        let mut img = GrayImage::new(80, 40);
        fill(&mut img, 5, 5, 20, 20);
        fill(&mut img, 40, 5, 70, 30);
        assert_eq!(extract_contours(&img).unwrap().len(), 2);
    }

    #[test]
    fn compress_keeps_corners_only() {
        let square = ring(&[
            (0, 0),
            (1, 0),
            (2, 0),
            (2, 1),
            (2, 2),
            (1, 2),
            (0, 2),
            (0, 1),
        ]);
        let compressed = compress_collinear(&square);
        assert_eq!(compressed.len(), 4);
    }

    #[test]
    fn compress_handles_start_mid_edge() {
        let square = ring(&[(1, 0), (2, 0), (2, 2), (0, 2), (0, 0)]);
        let compressed = compress_collinear(&square);
        assert_eq!(compressed.len(), 4);
        assert!(!compressed.contains(&Point::new(1, 0)));
    }

    #[test]
    fn compress_keeps_spur_tips() {
        // Out along a line and back again.
        let spur = ring(&[(0, 0), (1, 0), (2, 0), (1, 0)]);
        let compressed = compress_collinear(&spur);
        assert!(compressed.contains(&Point::new(2, 0)));
    }
}
