use tracing::{debug, error};

use super::PlanarGraph;
use crate::error::GraphError;
use crate::math::TOLERANCE;

impl PlanarGraph {
    /// Traces every face of the graph as a cycle of vertex indices.
    ///
    /// Outgoing edges at each vertex are sorted clockwise by polar angle.
    /// Arriving at `v` from `u`, the walk leaves along the edge that follows
    /// `v -> u` in that order, which is the sharpest left turn. Each directed
    /// edge is used exactly once, so every face lies to the left of its walk:
    /// bounded faces come out counter-clockwise (positive signed area) and the
    /// outer face of each connected component comes out clockwise.
    ///
    /// Dangling edges are walked out and back, so a vertex may repeat within a
    /// cycle.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnclosedFace`] if a walk does not return to its
    /// starting edge within the step bound, which means the adjacency is
    /// inconsistent.
    pub fn trace_interiors(&self) -> Result<Vec<Vec<usize>>, GraphError> {
        let fans = self.angular_fans();
        let directed: usize = fans.iter().map(Vec::len).sum();
        let step_limit = 2 * directed + 16;

        let mut used: Vec<Vec<bool>> = fans.iter().map(|fan| vec![false; fan.len()]).collect();
        let mut faces = Vec::new();

        for start in 0..fans.len() {
            for start_slot in 0..fans[start].len() {
                if used[start][start_slot] {
                    continue;
                }

                let mut cycle = Vec::new();
                let (mut from, mut slot) = (start, start_slot);
                let mut steps = 0;
                loop {
                    if steps > step_limit || used[from][slot] {
                        error!(start, steps, "face walk failed to close");
                        return Err(GraphError::UnclosedFace { start, steps });
                    }
                    used[from][slot] = true;
                    cycle.push(from);
                    steps += 1;

                    let to = fans[from][slot];
                    let Some(back) = fans[to].iter().position(|&w| w == from) else {
                        error!(start, from, to, "edge missing its reverse");
                        return Err(GraphError::UnclosedFace { start, steps });
                    };
                    let next = (back + 1) % fans[to].len();
                    if (to, next) == (start, start_slot) {
                        break;
                    }
                    (from, slot) = (to, next);
                }
                faces.push(cycle);
            }
        }

        debug!(faces = faces.len(), directed, "traced faces");
        Ok(faces)
    }

    /// Traced faces with positive signed area, i.e. the bounded regions.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError::UnclosedFace`] from [`Self::trace_interiors`].
    pub fn bounded_faces(&self) -> Result<Vec<Vec<usize>>, GraphError> {
        Ok(self
            .trace_interiors()?
            .into_iter()
            .filter(|face| self.face_signed_area(face) > TOLERANCE)
            .collect())
    }

    /// Neighbors of each vertex in clockwise order of direction.
    fn angular_fans(&self) -> Vec<Vec<usize>> {
        let mut fans = self.adjacency();
        for (v, fan) in fans.iter_mut().enumerate() {
            let origin = self.points[v];
            let angle = |w: usize| {
                let d = self.points[w] - origin;
                d.y.atan2(d.x)
            };
            fan.sort_by(|&a, &b| angle(b).total_cmp(&angle(a)).then(a.cmp(&b)));
        }
        fans
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Path;
    use crate::graph::tests::unit_square_at;
    use approx::assert_relative_eq;

    #[test]
    fn square_has_one_bounded_and_one_outer_face() {
        let g = PlanarGraph::from_paths(&[unit_square_at(0.0, 0.0)]).unwrap();
        let faces = g.trace_interiors().unwrap();
        assert_eq!(faces.len(), 2);
        let mut areas: Vec<f64> = faces.iter().map(|f| g.face_signed_area(f)).collect();
        areas.sort_by(f64::total_cmp);
        assert_relative_eq!(areas[0], -1.0);
        assert_relative_eq!(areas[1], 1.0);
    }

    #[test]
    fn clockwise_input_still_yields_positive_interior() {
        let cw = Path::from_xy(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)], true);
        let g = PlanarGraph::from_paths(&[cw]).unwrap();
        let bounded = g.bounded_faces().unwrap();
        assert_eq!(bounded.len(), 1);
        assert_relative_eq!(g.face_signed_area(&bounded[0]), 4.0);
    }

    #[test]
    fn two_squares_sharing_a_wall() {
        let mut g =
            PlanarGraph::from_paths(&[unit_square_at(0.0, 0.0), unit_square_at(1.0, 0.0)]).unwrap();
        g.merge_by_dist_simple(0.01);
        let faces = g.trace_interiors().unwrap();
        assert_eq!(faces.len(), 3);
        let bounded = g.bounded_faces().unwrap();
        assert_eq!(bounded.len(), 2);
        for face in &bounded {
            assert_eq!(face.len(), 4);
            assert_relative_eq!(g.face_signed_area(face), 1.0);
        }
        let outer: Vec<_> = faces
            .iter()
            .filter(|f| g.face_signed_area(f) < 0.0)
            .collect();
        assert_eq!(outer.len(), 1);
        assert_relative_eq!(g.face_signed_area(outer[0]), -2.0);
    }

    #[test]
    fn dangling_edge_is_walked_both_ways() {
        let square = unit_square_at(0.0, 0.0);
        let spur = Path::from_xy(&[(0.5, 0.5), (1.0, 1.0)], false);
        let mut g = PlanarGraph::from_paths(&[square, spur]).unwrap();
        g.merge_by_dist_simple(0.01);
        let bounded = g.bounded_faces().unwrap();
        assert_eq!(bounded.len(), 1);
        // Square corners plus the spur tip, with the corner visited twice.
        assert_eq!(bounded[0].len(), 6);
        assert_relative_eq!(g.face_signed_area(&bounded[0]), 1.0);
    }

    #[test]
    fn tree_has_no_bounded_faces() {
        let tree = Path::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], false);
        let g = PlanarGraph::from_paths(&[tree]).unwrap();
        let faces = g.trace_interiors().unwrap();
        assert_eq!(faces.len(), 1);
        assert!(g.bounded_faces().unwrap().is_empty());
    }

    #[test]
    fn empty_graph_has_no_faces() {
        let g = PlanarGraph::new();
        assert!(g.trace_interiors().unwrap().is_empty());
    }
}
