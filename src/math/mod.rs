pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point / vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Planar rotation stored as a unit complex number.
pub type Rotation = nalgebra::UnitComplex<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Lower bound used when dividing by a box extent, so degenerate shapes
/// normalize to finite coordinates.
pub const MIN_EXTENT: f64 = 1e-100;

/// Returns the rotation that takes the +x axis onto `dir`.
///
/// Zero-length directions map to the identity.
#[must_use]
pub fn rotation_towards(dir: &Vector2) -> Rotation {
    if dir.norm_squared() < TOLERANCE * TOLERANCE {
        return Rotation::identity();
    }
    Rotation::new(dir.y.atan2(dir.x))
}
