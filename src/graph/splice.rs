use std::collections::BTreeSet;

use tracing::debug;

use super::{EdgeKey, PlanarGraph};
use crate::geometry::AxisBox;
use crate::math::distance_2d::project_onto_segment;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::Vector2;

/// A dangling vertex snapped onto a nearby edge.
#[derive(Debug, Clone, Copy)]
struct TipSnap {
    from: usize,
    edge: usize,
    point: usize,
}

impl PlanarGraph {
    /// Splits edges at their crossings and snaps dangling ends onto nearby
    /// edges.
    ///
    /// With `line_line`, every pair of edges without a shared endpoint is
    /// intersected; a crossing with both segment parameters in `[0, 1]` adds a
    /// new point. Near-parallel pairs produce non-finite parameters and are
    /// skipped.
    ///
    /// With `line_point`, every vertex of degree at most one is snapped to the
    /// closest non-incident edge if it lies within `threshold`. The snap reuses
    /// an endpoint of that edge when one is within `threshold` of the vertex,
    /// and otherwise inserts the projection point; a new edge joins the vertex
    /// to the snap point.
    ///
    /// The edge set is rebuilt from scratch: each original edge becomes a chain
    /// through its split points, ordered by projection onto the edge direction.
    pub fn splice_line_intersections(&mut self, threshold: f64, line_line: bool, line_point: bool) {
        let edges_old: Vec<EdgeKey> = self.edges.iter().filter(|e| !e.is_self_loop()).copied().collect();
        let endpoints: Vec<(Vector2, Vector2)> = edges_old
            .iter()
            .map(|e| {
                let (a, b) = e.endpoints();
                (self.points[a], self.points[b])
            })
            .collect();

        let mut splits_by_edge: Vec<Vec<usize>> = vec![Vec::new(); edges_old.len()];
        let mut tips = Vec::new();

        if line_point {
            tips = self.snap_tips(&edges_old, &endpoints, threshold);
            for tip in &tips {
                splits_by_edge[tip.edge].push(tip.point);
            }
        }

        let mut crossings = 0;
        if line_line {
            let boxes: Vec<Option<AxisBox>> = endpoints
                .iter()
                .map(|(a, b)| AxisBox::from_points([a, b]))
                .collect();
            for ia in 0..edges_old.len() {
                for ib in (ia + 1)..edges_old.len() {
                    if edges_old[ia].shares_endpoint(edges_old[ib]) {
                        continue;
                    }
                    if let (Some(ba), Some(bb)) = (&boxes[ia], &boxes[ib]) {
                        if !ba.intersects(bb) {
                            continue;
                        }
                    }
                    let (a0, a1) = &endpoints[ia];
                    let (b0, b1) = &endpoints[ib];
                    if let Some((p, _, _)) = segment_segment_intersect_2d(a0, a1, b0, b1) {
                        let point = self.push_point(p);
                        splits_by_edge[ia].push(point);
                        splits_by_edge[ib].push(point);
                        crossings += 1;
                    }
                }
            }
        }

        let mut edges_new = BTreeSet::new();
        for (ei, edge) in edges_old.iter().enumerate() {
            let (i0, i_last) = edge.endpoints();
            let dir = self.points[i_last] - self.points[i0];
            let splits = &mut splits_by_edge[ei];
            splits.sort_by(|&a, &b| dir.dot(&self.points[a]).total_cmp(&dir.dot(&self.points[b])));

            let chain: Vec<usize> = std::iter::once(i0)
                .chain(splits.iter().copied())
                .chain(std::iter::once(i_last))
                .collect();
            for pair in chain.windows(2) {
                let key = EdgeKey::new(pair[0], pair[1]);
                if !key.is_self_loop() {
                    edges_new.insert(key);
                }
            }
        }
        for tip in &tips {
            let key = EdgeKey::new(tip.from, tip.point);
            if !key.is_self_loop() {
                edges_new.insert(key);
            }
        }

        debug!(
            threshold,
            crossings,
            tips = tips.len(),
            edges_before = edges_old.len(),
            edges_after = edges_new.len(),
            "spliced line intersections"
        );
        self.edges = edges_new;
    }

    fn snap_tips(
        &mut self,
        edges_old: &[EdgeKey],
        endpoints: &[(Vector2, Vector2)],
        threshold: f64,
    ) -> Vec<TipSnap> {
        let thresh_sq = threshold * threshold;
        let degrees = self.point_degrees();
        let mut tips = Vec::new();

        for (vi, &degree) in degrees.iter().enumerate() {
            if degree > 1 {
                continue;
            }
            let v = self.points[vi];

            let mut closest: Option<(usize, f64, Vector2)> = None;
            for (ei, edge) in edges_old.iter().enumerate() {
                if edge.touches(vi) {
                    continue;
                }
                let (a0, a1) = &endpoints[ei];
                let proj = project_onto_segment(a0, a1, &v);
                if closest.is_none_or(|(_, d, _)| proj.dist_sq < d) {
                    closest = Some((ei, proj.dist_sq, proj.closest));
                }
            }

            let Some((edge, dist_sq, on_edge)) = closest else {
                continue;
            };
            if dist_sq > thresh_sq {
                continue;
            }

            let (e0, e1) = edges_old[edge].endpoints();
            let near_end = [e0, e1]
                .into_iter()
                .filter(|&i| (self.points[i] - v).norm_squared() < thresh_sq)
                .last();
            let point = match near_end {
                Some(i) => i,
                None => self.push_point(on_edge),
            };
            tips.push(TipSnap {
                from: vi,
                edge,
                point,
            });
        }
        tips
    }
}
