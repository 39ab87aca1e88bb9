use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::{EdgeKey, PlanarGraph};
use crate::math::polygon_2d::mean_point;
use crate::math::Vector2;

impl PlanarGraph {
    /// Clusters points on a grid of cell size `threshold` and replaces every
    /// cluster by its mean.
    ///
    /// The bucket key rounds each coordinate to the nearest multiple of
    /// `threshold`. Two points closer than `threshold` that land in adjacent
    /// buckets stay apart. Clusters keep the order in which their first
    /// member appears, edges are remapped onto cluster indices, and edges
    /// collapsed to a single cluster are dropped.
    ///
    /// A non-positive or non-finite threshold leaves the graph untouched.
    pub fn merge_by_dist_simple(&mut self, threshold: f64) {
        if !(threshold > 0.0 && threshold.is_finite()) {
            return;
        }

        let mut cluster_of_bucket: HashMap<(i64, i64), usize> = HashMap::new();
        let mut members: Vec<Vec<Vector2>> = Vec::new();
        let mut index_map = Vec::with_capacity(self.points.len());

        for p in &self.points {
            let cluster = *cluster_of_bucket
                .entry(bucket_key(p, threshold))
                .or_insert_with(|| {
                    members.push(Vec::new());
                    members.len() - 1
                });
            members[cluster].push(*p);
            index_map.push(cluster);
        }

        let before = self.points.len();
        self.points = members
            .iter()
            .map(|m| mean_point(m).unwrap_or_else(Vector2::zeros))
            .collect();

        self.edges = self
            .edges
            .iter()
            .map(|e| {
                let (a, b) = e.endpoints();
                EdgeKey::new(index_map[a], index_map[b])
            })
            .filter(|e| !e.is_self_loop())
            .collect::<BTreeSet<_>>();

        debug!(
            threshold,
            before,
            after = self.points.len(),
            edges = self.edges.len(),
            "merged points by distance"
        );
    }
}

#[allow(clippy::cast_possible_truncation)]
fn bucket_key(p: &Vector2, threshold: f64) -> (i64, i64) {
    (
        (p.x / threshold).round() as i64,
        (p.y / threshold).round() as i64,
    )
}
