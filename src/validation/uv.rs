// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! UV-space measurements: range checks and triangle overlap

use nalgebra::{Point2, Vector2};

/// Pairwise intersections smaller than this are shared edges or rounding noise
const MIN_OVERLAP_AREA: f64 = 1e-10;

/// Triangles with less UV area than this are skipped
const MIN_TRIANGLE_AREA: f64 = 1e-12;

/// Count finite UV coordinates lying outside `[0, 1]` by more than `tolerance`
pub fn count_out_of_range(uvs: &[Point2<f32>], tolerance: f32) -> usize {
    let lo = -tolerance;
    let hi = 1.0 + tolerance;
    uvs.iter()
        .filter(|uv| uv.x.is_finite() && uv.y.is_finite())
        .filter(|uv| uv.x < lo || uv.x > hi || uv.y < lo || uv.y > hi)
        .count()
}

/// Result of a UV overlap measurement
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UvOverlap {
    /// Summed pairwise intersection area
    pub overlap_area: f64,
    /// Summed area of all non-degenerate UV triangles
    pub total_area: f64,
    /// Number of triangle pairs that overlap
    pub overlapping_pairs: usize,
}

impl UvOverlap {
    /// Overlapping area as a fraction of total UV area
    pub fn ratio(&self) -> f64 {
        if self.total_area <= 0.0 {
            0.0
        } else {
            self.overlap_area / self.total_area
        }
    }

    pub fn percentage(&self) -> f64 {
        (self.ratio() * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct UvTriangle {
    points: [Point2<f64>; 3],
    min: Point2<f64>,
    max: Point2<f64>,
}

impl UvTriangle {
    fn new(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Self {
        // Counter-clockwise winding keeps the clipping half-plane test uniform.
        let points = if signed_area(&[a, b, c]) < 0.0 { [a, c, b] } else { [a, b, c] };
        let min = Point2::new(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y));
        let max = Point2::new(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y));
        Self { points, min, max }
    }

    fn area(&self) -> f64 {
        signed_area(&self.points).abs()
    }
}

/// Measure how much of the UV layout is covered more than once.
///
/// Degenerate and non-finite triangles are ignored. Candidate pairs are found
/// with a sweep over the u-axis, then intersected exactly by convex clipping.
pub fn measure_overlap(
    uvs: &[Point2<f32>],
    triangles: impl Iterator<Item = [usize; 3]>,
) -> UvOverlap {
    let mut tris: Vec<UvTriangle> = triangles
        .filter_map(|[i0, i1, i2]| {
            let corners = [uvs.get(i0)?, uvs.get(i1)?, uvs.get(i2)?];
            if corners.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
                return None;
            }
            let [a, b, c] = corners.map(|p| Point2::new(p.x as f64, p.y as f64));
            let tri = UvTriangle::new(a, b, c);
            (tri.area() > MIN_TRIANGLE_AREA).then_some(tri)
        })
        .collect();

    let mut overlap = UvOverlap {
        total_area: tris.iter().map(UvTriangle::area).sum(),
        ..UvOverlap::default()
    };

    tris.sort_by(|a, b| a.min.x.total_cmp(&b.min.x));

    for (i, a) in tris.iter().enumerate() {
        for b in &tris[i + 1..] {
            if b.min.x > a.max.x {
                break;
            }
            if b.min.y > a.max.y || b.max.y < a.min.y {
                continue;
            }
            let area = intersection_area(a, b);
            if area > MIN_OVERLAP_AREA {
                overlap.overlap_area += area;
                overlap.overlapping_pairs += 1;
            }
        }
    }

    overlap
}

/// Area of the intersection of two counter-clockwise triangles
fn intersection_area(a: &UvTriangle, b: &UvTriangle) -> f64 {
    let mut polygon: Vec<Point2<f64>> = a.points.to_vec();

    for edge in 0..3 {
        if polygon.is_empty() {
            return 0.0;
        }
        let start = b.points[edge];
        let end = b.points[(edge + 1) % 3];
        polygon = clip_against_edge(&polygon, start, end);
    }

    if polygon.len() < 3 {
        0.0
    } else {
        signed_area(&polygon).abs()
    }
}

/// Sutherland-Hodgman step: keep the part of `polygon` left of `start -> end`
fn clip_against_edge(polygon: &[Point2<f64>], start: Point2<f64>, end: Point2<f64>) -> Vec<Point2<f64>> {
    let edge = end - start;
    let side = |p: &Point2<f64>| cross(&edge, &(*p - start));

    let mut output = Vec::with_capacity(polygon.len() + 1);
    for (i, current) in polygon.iter().enumerate() {
        let previous = &polygon[(i + polygon.len() - 1) % polygon.len()];
        let (d_prev, d_curr) = (side(previous), side(current));

        if d_curr >= 0.0 {
            if d_prev < 0.0 {
                output.push(lerp(previous, current, d_prev / (d_prev - d_curr)));
            }
            output.push(*current);
        } else if d_prev >= 0.0 {
            output.push(lerp(previous, current, d_prev / (d_prev - d_curr)));
        }
    }
    output
}

fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

fn lerp(a: &Point2<f64>, b: &Point2<f64>, t: f64) -> Point2<f64> {
    *a + (*b - *a) * t
}

/// Shoelace formula; positive for counter-clockwise polygons
fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (p, q) = (points[i], points[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum();
    twice * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uv(u: f32, v: f32) -> Point2<f32> {
        Point2::new(u, v)
    }

    #[test]
    fn test_out_of_range_respects_tolerance() {
        let uvs = [uv(0.0, 0.0), uv(1.0005, 0.5), uv(1.2, 0.5), uv(-0.5, 0.0), uv(f32::NAN, 2.0)];
        assert_eq!(count_out_of_range(&uvs, 0.001), 2);
        assert_eq!(count_out_of_range(&uvs, 0.0), 3);
    }

    #[test]
    fn test_adjacent_triangles_do_not_overlap() {
        // Unit quad split along its diagonal
        let uvs = [uv(0.0, 0.0), uv(1.0, 0.0), uv(1.0, 1.0), uv(0.0, 1.0)];
        let tris = [[0, 1, 2], [0, 2, 3]];
        let overlap = measure_overlap(&uvs, tris.into_iter());

        assert_relative_eq!(overlap.total_area, 1.0, epsilon = 1e-9);
        assert_eq!(overlap.overlapping_pairs, 0);
        assert_eq!(overlap.percentage(), 0.0);
    }

    #[test]
    fn test_stacked_triangles_fully_overlap() {
        let uvs = [uv(0.0, 0.0), uv(1.0, 0.0), uv(0.0, 1.0)];
        // Same UV triangle used twice, once with flipped winding
        let tris = [[0, 1, 2], [0, 2, 1]];
        let overlap = measure_overlap(&uvs, tris.into_iter());

        assert_relative_eq!(overlap.total_area, 1.0, epsilon = 1e-9);
        assert_relative_eq!(overlap.overlap_area, 0.5, epsilon = 1e-9);
        assert_relative_eq!(overlap.percentage(), 50.0, epsilon = 1e-6);
        assert_eq!(overlap.overlapping_pairs, 1);
    }

    #[test]
    fn test_partial_overlap() {
        // Two axis-aligned right triangles; the second is shifted by 0.5 in u.
        let uvs = [
            uv(0.0, 0.0),
            uv(1.0, 0.0),
            uv(0.0, 1.0),
            uv(0.5, 0.0),
            uv(1.5, 0.0),
            uv(0.5, 1.0),
        ];
        let tris = [[0, 1, 2], [3, 4, 5]];
        let overlap = measure_overlap(&uvs, tris.into_iter());

        // Intersection is the triangle (0.5,0) (1,0) (0.5,0.5)
        assert_relative_eq!(overlap.overlap_area, 0.125, epsilon = 1e-9);
        assert_relative_eq!(overlap.ratio(), 0.125, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_triangles_are_ignored() {
        let uvs = [uv(0.0, 0.0), uv(1.0, 0.0), uv(2.0, 0.0)];
        let overlap = measure_overlap(&uvs, [[0, 1, 2]].into_iter());
        assert_eq!(overlap.total_area, 0.0);
        assert_eq!(overlap.ratio(), 0.0);
    }
}
