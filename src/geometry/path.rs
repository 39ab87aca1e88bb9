use serde::{Deserialize, Serialize};

use super::AxisBox;
use crate::math::distance_2d::point_to_segment_dist_sq;
use crate::math::polygon_2d::mean_point;
use crate::math::{rotation_towards, Rotation, Vector2, MIN_EXTENT};

/// An ordered run of points, either an open polyline or a closed polygon.
///
/// Serializes as `{ points: [[x, y]], loop, filled? }`; `filled` is written
/// only when set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    #[serde(with = "point_list")]
    pub points: Vec<Vector2>,
    #[serde(rename = "loop")]
    pub closed: bool,
    /// Solid-glyph hint carried over from the source fill style.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub filled: bool,
    /// Debug label, not persisted.
    #[serde(skip)]
    pub id: Option<String>,
}

impl Path {
    /// Creates an unfilled path.
    #[must_use]
    pub fn new(points: Vec<Vector2>, closed: bool) -> Self {
        Self {
            points,
            closed,
            filled: false,
            id: None,
        }
    }

    /// Creates an unfilled path from `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(points: &[(f64, f64)], closed: bool) -> Self {
        Self::new(
            points.iter().map(|&(x, y)| Vector2::new(x, y)).collect(),
            closed,
        )
    }

    /// Sets the fill hint.
    #[must_use]
    pub fn with_filled(mut self, filled: bool) -> Self {
        self.filled = filled;
        self
    }

    /// Copies the shape flags onto a new point list.
    fn with_points(&self, points: Vec<Vector2>) -> Self {
        Self {
            points,
            closed: self.closed,
            filled: self.filled,
            id: None,
        }
    }

    /// Returns the bounding box, or `None` for an empty path.
    #[must_use]
    pub fn bounding_box(&self) -> Option<AxisBox> {
        AxisBox::from_points(&self.points)
    }

    /// Number of segments: `n - 1` for open paths, `n` for closed ones.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// Iterates over the segments, including the closing one for loops.
    pub fn segments(&self) -> impl Iterator<Item = (&Vector2, &Vector2)> + '_ {
        let n = self.points.len();
        (0..self.segment_count()).map(move |i| (&self.points[i], &self.points[(i + 1) % n]))
    }

    /// Rotates every point about the origin.
    #[must_use]
    pub fn rotated(&self, rot: &Rotation) -> Self {
        self.with_points(self.points.iter().map(|p| rot * p).collect())
    }

    /// Mirrors across the `y = x` diagonal.
    #[must_use]
    pub fn flipped_xy(&self) -> Self {
        self.with_points(self.points.iter().map(|p| Vector2::new(p.y, p.x)).collect())
    }

    /// Translates every point by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector2) -> Self {
        self.with_points(self.points.iter().map(|p| p + offset).collect())
    }

    /// Maps the path into its own canonical box: minimum corner at the
    /// origin, larger extent equal to 1.
    #[must_use]
    pub fn normalized(&self) -> Self {
        match self.bounding_box() {
            Some(bb) => self.fit_to(&bb),
            None => self.clone(),
        }
    }

    /// Direction from the centroid to the first point, as a rotation of +x.
    #[must_use]
    pub fn orientation(&self) -> Rotation {
        match (self.points.first(), mean_point(&self.points)) {
            (Some(first), Some(mean)) => rotation_towards(&(first - mean)),
            _ => Rotation::identity(),
        }
    }

    /// Undoes the path's apparent rotation, then normalizes it.
    ///
    /// Returns the canonical path and the orientation that was removed;
    /// applying that orientation to the canonical shape restores the drawn one.
    #[must_use]
    pub fn normalized_unrotated(&self) -> (Self, Rotation) {
        let orientation = self.orientation();
        let unrotated = self.rotated(&orientation.inverse());
        (unrotated.normalized(), orientation)
    }

    /// Jointly normalizes a group of paths against their merged bounding box.
    #[must_use]
    pub fn conormalize(paths: &[Path]) -> Vec<Path> {
        let merged = AxisBox::merge_all(paths.iter().filter_map(Path::bounding_box));
        match merged {
            Some(bb) => paths.iter().map(|p| p.fit_to(&bb)).collect(),
            None => paths.to_vec(),
        }
    }

    fn fit_to(&self, bb: &AxisBox) -> Self {
        let scale = 1.0 / bb.max_extent().max(MIN_EXTENT);
        self.with_points(self.points.iter().map(|p| (p - bb.pos) * scale).collect())
    }

    /// Pointwise comparison against a template of identical topology.
    ///
    /// Paths with different point counts never match.
    #[must_use]
    pub fn direct_compare(&self, template: &Path, thresh: f64) -> bool {
        if self.points.len() != template.points.len() {
            return false;
        }
        let thresh_sq = thresh * thresh;
        self.points
            .iter()
            .zip(&template.points)
            .all(|(a, b)| (a - b).norm_squared() <= thresh_sq)
    }

    /// Squared distance from `v` to the nearest segment of this path.
    ///
    /// Single-point paths measure to that point; empty paths are infinitely far.
    #[must_use]
    pub fn dist_sq_to_point(&self, v: &Vector2) -> f64 {
        match self.points.as_slice() {
            [] => f64::INFINITY,
            [p] => (v - p).norm_squared(),
            _ => self
                .segments()
                .map(|(a, b)| point_to_segment_dist_sq(v, a, b))
                .fold(f64::INFINITY, f64::min),
        }
    }
}

/// Serializes `Vec<Vector2>` as a list of `[x, y]` pairs.
pub(crate) mod point_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::math::Vector2;

    pub fn serialize<S: Serializer>(points: &[Vector2], s: S) -> Result<S::Ok, S::Error> {
        let pairs: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
        pairs.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Vector2>, D::Error> {
        let pairs = Vec::<[f64; 2]>::deserialize(d)?;
        Ok(pairs.into_iter().map(|[x, y]| Vector2::new(x, y)).collect())
    }
}
