//! Squared-distance primitives for stroke proximity tests.
//!
//! All erase thresholds are compared as squared radii, so nothing here
//! takes a square root.

use kurbo::Point;

/// Squared Euclidean distance between two points.
pub fn dist_sq(a: Point, b: Point) -> f64 {
    (b - a).hypot2()
}

/// Squared distance from `p` to the segment `a`→`b`.
///
/// Projects `p` onto the line through `a` and `b`, clamps the projection
/// parameter to [0, 1], and measures against the clamped projection.
/// Degenerates to `dist_sq(p, a)` when the segment has zero length.
pub fn point_segment_dist_sq(p: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return dist_sq(p, a);
    }
    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    dist_sq(p, proj)
}

/// Approximate squared distance between segments `a1`→`a2` and `b1`→`b2`:
/// the minimum of the four endpoint-to-opposite-segment distances.
///
/// The true minimum can occur at an interior crossing this formula does not
/// see. For ink-width erase radii the endpoint minimum is the defined
/// contract, not a shortcut to be replaced.
pub fn segment_segment_dist_sq(a1: Point, a2: Point, b1: Point, b2: Point) -> f64 {
    point_segment_dist_sq(a1, b1, b2)
        .min(point_segment_dist_sq(a2, b1, b2))
        .min(point_segment_dist_sq(b1, a1, a2))
        .min(point_segment_dist_sq(b2, a1, a2))
}
