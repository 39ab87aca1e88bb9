use super::Vector2;

/// Projection of a point onto a segment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentProjection {
    /// Unclamped parameter of the projection along `a0 -> a1`.
    pub t: f64,
    /// Closest point on the segment (parameter clamped to `[0, 1]`).
    pub closest: Vector2,
    /// Squared distance from the query point to `closest`.
    pub dist_sq: f64,
}

/// Projects `p` onto the segment from `a0` to `a1`.
///
/// A zero-length segment yields a non-finite `t`; the closest point then
/// falls back to `a0`.
#[must_use]
pub fn project_onto_segment(a0: &Vector2, a1: &Vector2, p: &Vector2) -> SegmentProjection {
    let d = a1 - a0;
    let t = (p - a0).dot(&d) / d.norm_squared();
    let closest = if t.is_finite() {
        a0 + d * t.clamp(0.0, 1.0)
    } else {
        *a0
    };
    SegmentProjection {
        t,
        closest,
        dist_sq: (p - closest).norm_squared(),
    }
}

/// Returns the squared distance from `p` to the segment `a0 -> a1`.
#[must_use]
pub fn point_to_segment_dist_sq(p: &Vector2, a0: &Vector2, a1: &Vector2) -> f64 {
    project_onto_segment(a0, a1, p).dist_sq
}
