use super::{EdgeKey, PlanarGraph};
use crate::math::distance_2d::project_onto_segment;
use crate::math::Vector2;

/// Result of a nearest-edge query.
#[derive(Debug, Clone, Copy)]
pub struct ClosestEdge {
    pub edge: EdgeKey,
    /// Closest point on the edge.
    pub point: Vector2,
    /// Distance from the query point to `point`.
    pub distance: f64,
}

impl PlanarGraph {
    /// Index of the point nearest to `v`, or `None` for an empty graph.
    ///
    /// Linear scan; picking runs at floor-plan scale.
    #[must_use]
    pub fn closest_point(&self, v: &Vector2) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, (p - v).norm_squared()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Edge nearest to `v`, ignoring self-loops.
    #[must_use]
    pub fn closest_edge(&self, v: &Vector2) -> Option<ClosestEdge> {
        self.edges
            .iter()
            .filter(|e| !e.is_self_loop())
            .map(|&edge| {
                let (a, b) = edge.endpoints();
                let proj = project_onto_segment(&self.points[a], &self.points[b], v);
                (edge, proj)
            })
            .min_by(|x, y| x.1.dist_sq.total_cmp(&y.1.dist_sq))
            .map(|(edge, proj)| ClosestEdge {
                edge,
                point: proj.closest,
                distance: proj.dist_sq.sqrt(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::tests::unit_square_at;
    use approx::assert_relative_eq;

    #[test]
    fn picks_nearest_corner() {
        let g = PlanarGraph::from_paths(&[unit_square_at(0.0, 0.0)]).unwrap();
        assert_eq!(g.closest_point(&Vector2::new(0.9, 1.2)), Some(2));
        assert_eq!(PlanarGraph::new().closest_point(&Vector2::zeros()), None);
    }

    #[test]
    fn picks_nearest_edge() {
        let g = PlanarGraph::from_paths(&[unit_square_at(0.0, 0.0)]).unwrap();
        let hit = g.closest_edge(&Vector2::new(0.5, -0.25)).unwrap();
        assert_eq!(hit.edge, EdgeKey::new(0, 1));
        assert_relative_eq!(hit.distance, 0.25);
        assert_relative_eq!(hit.point.x, 0.5);
        assert!(PlanarGraph::new().closest_edge(&Vector2::zeros()).is_none());
    }
}
