//! Polygon and polyline primitives.
//!
//! Everything in this module is a pure function over [`Point`] slices:
//! point-in-polygon containment, centroids, point-to-segment distance, and
//! polyline length/simplification. Polygons are ordered vertex sequences
//! with an implicit closing edge.

use super::point::Point;

/// Test whether a point lies inside a polygon (ray casting).
///
/// Points exactly on an edge may fall on either side; the grid builder only
/// ever tests cell centers, which do not sit on polygon edges in practice.
/// Polygons with fewer than 3 vertices contain nothing.
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[j];

        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Vertex-average centroid of a polygon.
///
/// Returns [`Point::ZERO`] for an empty polygon.
pub fn polygon_centroid(polygon: &[Point]) -> Point {
    if polygon.is_empty() {
        return Point::ZERO;
    }

    let mut cx = 0.0;
    let mut cy = 0.0;
    for p in polygon {
        cx += p.x;
        cy += p.y;
    }
    let n = polygon.len() as f32;
    Point::new(cx / n, cy / n)
}

/// Shortest distance from a point to a line segment.
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;

    if len_sq <= f32::EPSILON {
        return p.distance(&a);
    }

    let t = ((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let closest = Point::new(a.x + t * abx, a.y + t * aby);
    p.distance(&closest)
}

/// Shortest distance from a point to any edge of a polygon.
///
/// Returns `f32::MAX` for polygons with fewer than 2 vertices.
pub fn point_to_polygon_edge_distance(p: Point, polygon: &[Point]) -> f32 {
    if polygon.len() < 2 {
        return f32::MAX;
    }

    let mut best = f32::MAX;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        let d = point_to_segment_distance(p, a, b);
        if d < best {
            best = d;
        }
    }
    best
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Point]) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }

    let mut length = 0.0;
    for i in 0..points.len() - 1 {
        length += points[i].distance(&points[i + 1]);
    }
    length
}

/// Remove interior points of collinear runs from a polyline.
///
/// Keeps the first and last point and every point where the direction
/// changes. Consecutive duplicate points are dropped.
pub fn simplify_collinear(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    out.push(points[0]);

    for i in 1..points.len() - 1 {
        let prev = *out.last().unwrap_or(&points[0]);
        let cur = points[i];
        let next = points[i + 1];

        if cur.distance(&prev) <= f32::EPSILON {
            continue;
        }

        // Cross product of (prev->cur) and (cur->next); zero means collinear.
        let cross = (cur.x - prev.x) * (next.y - cur.y) - (cur.y - prev.y) * (next.x - cur.x);
        if cross.abs() > 1e-4 {
            out.push(cur);
        }
    }

    let last = points[points.len() - 1];
    if out
        .last()
        .map(|p| p.distance(&last) > f32::EPSILON)
        .unwrap_or(true)
    {
        out.push(last);
    }
    out
}
