use super::Vector2;

/// Parametric segment-segment intersection in 2D.
///
/// Given segments `a0 -> a1` and `b0 -> b1`, returns `(point, t_a, t_b)` when
/// both parameters lie in `[0, 1]`. Parallel or near-parallel segments divide
/// by (almost) zero; the resulting non-finite parameters fail the range test,
/// so ill-conditioned pairs report no intersection.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Vector2,
    a1: &Vector2,
    b0: &Vector2,
    b1: &Vector2,
) -> Option<(Vector2, f64, f64)> {
    let t_a = ((a0.x - b0.x) * (b0.y - b1.y) - (a0.y - b0.y) * (b0.x - b1.x))
        / ((a0.x - a1.x) * (b0.y - b1.y) - (a0.y - a1.y) * (b0.x - b1.x));
    let t_b = ((b0.x - a0.x) * (a0.y - a1.y) - (b0.y - a0.y) * (a0.x - a1.x))
        / ((b0.x - b1.x) * (a0.y - a1.y) - (b0.y - b1.y) * (a0.x - a1.x));

    let unit = 0.0..=1.0;
    if unit.contains(&t_a) && unit.contains(&t_b) {
        Some((a0 + (a1 - a0) * t_a, t_a, t_b))
    } else {
        None
    }
}
