/*
 * Copyright (C) 2024 Open Source Robotics Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
*/

//! Pure geometric predicates and constructions on grid-space points.
//!
//! All tolerance comparisons use [`EPSILON`], expressed in grid units.
//! Overlap tests use strict inequalities so that elements which merely touch
//! are not reported as overlapping. Vertex identity is decided through
//! [`grid_key`], which quantizes coordinates to a fixed sub-grid, keeping
//! floating point drift out of equality checks.

use glam::Vec2;
use itertools::Itertools;

/// Tolerance for colinearity and overlap checks, in grid units.
pub const EPSILON: f32 = 1e-2;

/// Resolution of the sub-grid that vertex coordinates are quantized to.
pub const VERTEX_QUANTUM: f32 = 1e-3;

/// Round a point to the vertex sub-grid.
pub fn quantize(p: Vec2) -> Vec2 {
    Vec2::new(
        (p.x / VERTEX_QUANTUM).round() * VERTEX_QUANTUM,
        (p.y / VERTEX_QUANTUM).round() * VERTEX_QUANTUM,
    )
}

/// Integer-comparable identity key of a point on the vertex sub-grid.
pub fn grid_key(p: Vec2) -> (i64, i64) {
    (
        (p.x / VERTEX_QUANTUM).round() as i64,
        (p.y / VERTEX_QUANTUM).round() as i64,
    )
}

/// Nearest grid intersection for the given step.
pub fn snap_to_grid(p: Vec2, step: f32) -> Vec2 {
    Vec2::new((p.x / step).round() * step, (p.y / step).round() * step)
}

/// Signed perpendicular distance of `p` from the infinite line through `a`
/// and `b`. Positive on the left of a→b.
fn signed_line_distance(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let d = b - a;
    let len = d.length();
    if len <= f32::EPSILON {
        return (p - a).length();
    }
    d.perp_dot(p - a) / len
}

/// Even-odd ray cast with the upper endpoint of each edge treated as
/// inclusive, so a ray passing through a vertex is counted exactly once.
pub fn point_in_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    let mut inside = false;
    for (&a, &b) in polygon.iter().circular_tuple_windows() {
        if (a.y > p.y) != (b.y > p.y) {
            let t = (p.y - a.y) / (b.y - a.y);
            let x = a.x + t * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Whether `p` lies within [`EPSILON`] of the polygon outline.
pub fn point_on_polygon_boundary(p: Vec2, polygon: &[Vec2]) -> bool {
    polygon
        .iter()
        .circular_tuple_windows()
        .any(|(&a, &b)| point_segment_distance(p, a, b) <= EPSILON)
}

/// Containment where the boundary counts as inside. This is the test used
/// for wall endpoints and artwork corners, which may sit exactly on a room
/// outline.
pub fn point_in_or_on_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    point_in_polygon(p, polygon) || point_on_polygon_boundary(p, polygon)
}

/// Unsigned polygon area by the shoelace formula.
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    polygon_signed_area(polygon).abs()
}

pub fn polygon_signed_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let sum: f32 = polygon
        .iter()
        .circular_tuple_windows()
        .map(|(&a, &b)| a.perp_dot(b))
        .sum();
    sum / 2.0
}

/// False iff any non-adjacent edge pair intersects in their open interiors,
/// either by a proper crossing or by a colinear overlap.
pub fn polygon_is_simple(polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        for j in (i + 1)..n {
            // Edges sharing a vertex are adjacent and allowed to touch.
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (a1, a2) = (polygon[i], polygon[(i + 1) % n]);
            let (b1, b2) = (polygon[j], polygon[(j + 1) % n]);
            if segments_intersect(a1, a2, b1, b2) || segments_overlap(a1, a2, b1, b2) {
                return false;
            }
        }
    }
    true
}

/// Proper intersection of the open segments a1–a2 and b1–b2. Touching at an
/// endpoint or colinear overlap is not a proper intersection; the latter is
/// reported by [`segments_overlap`].
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d1 = signed_line_distance(b1, b2, a1);
    let d2 = signed_line_distance(b1, b2, a2);
    let d3 = signed_line_distance(a1, a2, b1);
    let d4 = signed_line_distance(a1, a2, b2);
    let straddles = |u: f32, v: f32| (u > EPSILON && v < -EPSILON) || (u < -EPSILON && v > EPSILON);
    straddles(d1, d2) && straddles(d3, d4)
}

/// True iff both segments lie on the same infinite line and their 1-D
/// projections share an interval longer than [`EPSILON`]. Strictly
/// less-than, so end-to-end touching does not count.
pub fn segments_overlap(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    if signed_line_distance(a1, a2, b1).abs() > EPSILON
        || signed_line_distance(a1, a2, b2).abs() > EPSILON
    {
        return false;
    }
    let axis = a2 - a1;
    let len = axis.length();
    if len <= f32::EPSILON {
        return false;
    }
    let axis = axis / len;
    let (a_lo, a_hi) = (0.0_f32, len);
    let tb1 = (b1 - a1).dot(axis);
    let tb2 = (b2 - a1).dot(axis);
    let (b_lo, b_hi) = (tb1.min(tb2), tb1.max(tb2));
    a_hi.min(b_hi) - a_lo.max(b_lo) > EPSILON
}

/// Closest point of the closed segment a–b to `p`, with its normalized
/// parameter t ∈ [0, 1].
pub fn project_on_segment(p: Vec2, a: Vec2, b: Vec2) -> (Vec2, f32) {
    let d = b - a;
    let len_sq = d.length_squared();
    if len_sq <= f32::EPSILON {
        return (a, 0.0);
    }
    let t = ((p - a).dot(d) / len_sq).clamp(0.0, 1.0);
    (a + d * t, t)
}

pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let (closest, _) = project_on_segment(p, a, b);
    (p - closest).length()
}

/// Whether the segment c–d is colinear with and contained in the closed
/// segment a–b, within [`EPSILON`].
pub fn segment_contains_segment(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    point_segment_distance(c, a, b) <= EPSILON && point_segment_distance(d, a, b) <= EPSILON
}

/// True iff the polygon interiors intersect. Shared edges and shared
/// vertices alone do not count as overlap.
pub fn polygons_overlap(p: &[Vec2], q: &[Vec2]) -> bool {
    for (&a1, &a2) in p.iter().circular_tuple_windows() {
        for (&b1, &b2) in q.iter().circular_tuple_windows() {
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    // No proper crossing: one polygon may still sit inside the other, or
    // they may coincide. Probe vertices and edge midpoints, skipping probes
    // that land on the other outline.
    strictly_contains_probe(p, q) || strictly_contains_probe(q, p)
}

fn strictly_contains_probe(container: &[Vec2], probed: &[Vec2]) -> bool {
    let strictly_inside = |v: Vec2| {
        !point_on_polygon_boundary(v, container) && point_in_polygon(v, container)
    };
    probed.iter().any(|&v| strictly_inside(v))
        || probed
            .iter()
            .circular_tuple_windows()
            .any(|(&a, &b)| strictly_inside((a + b) / 2.0))
}

/// Axis-aligned rectangle between two drag corners, in counter-clockwise
/// order starting from the minimum corner.
pub fn rectangle_polygon(a: Vec2, b: Vec2) -> Vec<Vec2> {
    let min = a.min(b);
    let max = a.max(b);
    vec![
        Vec2::new(min.x, min.y),
        Vec2::new(max.x, min.y),
        Vec2::new(max.x, max.y),
        Vec2::new(min.x, max.y),
    ]
}

/// Regular polygon approximation of a circle, counter-clockwise from the
/// +x direction.
pub fn circle_polygon(center: Vec2, radius: f32, sides: usize) -> Vec<Vec2> {
    (0..sides)
        .map(|k| {
            let theta = std::f32::consts::TAU * k as f32 / sides as f32;
            center + radius * Vec2::new(theta.cos(), theta.sin())
        })
        .collect()
}

/// Isoceles triangle inscribed in the drag rectangle: base along the lower
/// edge, apex centered on the upper edge.
pub fn triangle_polygon(a: Vec2, b: Vec2) -> Vec<Vec2> {
    let min = a.min(b);
    let max = a.max(b);
    vec![
        Vec2::new(min.x, min.y),
        Vec2::new(max.x, min.y),
        Vec2::new((min.x + max.x) / 2.0, max.y),
    ]
}

/// Half-disc whose flat side is the diameter through `radius_point`: the arc
/// is sampled into `segments` steps and the polygon closes along the chord.
pub fn arc_polygon(center: Vec2, radius_point: Vec2, segments: usize) -> Vec<Vec2> {
    let spoke = radius_point - center;
    let radius = spoke.length();
    let start = spoke.y.atan2(spoke.x);
    (0..=segments)
        .map(|k| {
            let theta = start + std::f32::consts::PI * k as f32 / segments as f32;
            center + radius * Vec2::new(theta.cos(), theta.sin())
        })
        .collect()
}
