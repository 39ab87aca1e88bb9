use serde::{Deserialize, Serialize};

use crate::math::Vector2;

/// Axis-aligned rectangle: minimum corner plus non-negative extent.
///
/// Serializes as `[x, y, w, h]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct AxisBox {
    pub pos: Vector2,
    pub dim: Vector2,
}

impl AxisBox {
    /// Creates a box from its minimum corner and extent.
    #[must_use]
    pub fn new(pos: Vector2, dim: Vector2) -> Self {
        Self { pos, dim }
    }

    /// Creates the box spanning two corners.
    #[must_use]
    pub fn from_corners(min: Vector2, max: Vector2) -> Self {
        Self {
            pos: min,
            dim: max - min,
        }
    }

    /// Returns the tightest box containing every point, or `None` if empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vector2>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        });
        Some(Self::from_corners(min, max))
    }

    /// Returns the smallest box containing both `self` and `rhs`.
    #[must_use]
    pub fn merge(&self, rhs: &AxisBox) -> Self {
        let min = Vector2::new(self.x_min().min(rhs.x_min()), self.y_min().min(rhs.y_min()));
        let max = Vector2::new(self.x_max().max(rhs.x_max()), self.y_max().max(rhs.y_max()));
        Self::from_corners(min, max)
    }

    /// Merges a sequence of boxes, or `None` if empty.
    pub fn merge_all<I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator<Item = AxisBox>,
    {
        boxes.into_iter().reduce(|a, b| a.merge(&b))
    }

    /// Closed-interval overlap test; touching boxes intersect.
    #[must_use]
    pub fn intersects(&self, rhs: &AxisBox) -> bool {
        self.x_min() <= rhs.x_max()
            && rhs.x_min() <= self.x_max()
            && self.y_min() <= rhs.y_max()
            && rhs.y_min() <= self.y_max()
    }

    #[must_use]
    pub fn x_min(&self) -> f64 {
        self.pos.x
    }

    #[must_use]
    pub fn y_min(&self) -> f64 {
        self.pos.y
    }

    #[must_use]
    pub fn x_max(&self) -> f64 {
        self.pos.x + self.dim.x
    }

    #[must_use]
    pub fn y_max(&self) -> f64 {
        self.pos.y + self.dim.y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.dim.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.dim.y
    }

    /// Moves the right edge, keeping the left edge fixed.
    pub fn set_x_max(&mut self, x: f64) {
        self.dim.x = x - self.pos.x;
    }

    #[must_use]
    pub fn center(&self) -> Vector2 {
        self.pos + self.dim * 0.5
    }

    /// Larger of the two extents.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        self.dim.x.max(self.dim.y)
    }
}

impl From<[f64; 4]> for AxisBox {
    fn from([x, y, w, h]: [f64; 4]) -> Self {
        Self::new(Vector2::new(x, y), Vector2::new(w, h))
    }
}

impl From<AxisBox> for [f64; 4] {
    fn from(b: AxisBox) -> Self {
        [b.pos.x, b.pos.y, b.dim.x, b.dim.y]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_points_spans_all() {
        let pts = [
            Vector2::new(1.0, 2.0),
            Vector2::new(-1.0, 5.0),
            Vector2::new(3.0, 0.0),
        ];
        let bb = AxisBox::from_points(&pts).unwrap();
        assert_relative_eq!(bb.x_min(), -1.0);
        assert_relative_eq!(bb.y_min(), 0.0);
        assert_relative_eq!(bb.x_max(), 3.0);
        assert_relative_eq!(bb.y_max(), 5.0);
        assert!(AxisBox::from_points(&[]).is_none());
    }

    #[test]
    fn merge_covers_both() {
        let a = AxisBox::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0));
        let b = AxisBox::new(Vector2::new(2.0, -1.0), Vector2::new(1.0, 1.0));
        let m = a.merge(&b);
        assert_relative_eq!(m.x_min(), 0.0);
        assert_relative_eq!(m.y_min(), -1.0);
        assert_relative_eq!(m.width(), 3.0);
        assert_relative_eq!(m.height(), 2.0);
    }

    #[test]
    fn intersects_is_closed() {
        let a = AxisBox::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0));
        let touching = AxisBox::new(Vector2::new(1.0, 0.5), Vector2::new(1.0, 1.0));
        let apart = AxisBox::new(Vector2::new(1.5, 0.0), Vector2::new(1.0, 1.0));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn json_form_is_xywh() {
        let b = AxisBox::new(Vector2::new(1.0, 2.0), Vector2::new(3.0, 4.0));
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");
        let back: AxisBox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }
}
