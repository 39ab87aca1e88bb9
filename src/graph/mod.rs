pub mod cleanup;
pub mod merge;
pub mod pick;
pub mod reconstruct;
pub mod splice;
pub mod trace;

pub use cleanup::CleanupStep;
pub use pick::ClosestEdge;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, SnapshotError};
use crate::geometry::path::point_list;
use crate::geometry::Path;
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Vector2;

/// Vertex indices must fit in 24 bits so edges persist as u24 pairs.
pub const MAX_POINTS: usize = 1 << 24;

/// Unordered pair of vertex indices.
///
/// `EdgeKey::new(a, b) == EdgeKey::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    lo: u32,
    hi: u32,
}

impl EdgeKey {
    /// Creates the key for the edge between `a` and `b`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            lo: a.min(b) as u32,
            hi: a.max(b) as u32,
        }
    }

    /// Returns the endpoints, smaller index first.
    #[must_use]
    pub fn endpoints(self) -> (usize, usize) {
        (self.lo as usize, self.hi as usize)
    }

    #[must_use]
    pub fn is_self_loop(self) -> bool {
        self.lo == self.hi
    }

    /// Whether `v` is one of the endpoints.
    #[must_use]
    pub fn touches(self, v: usize) -> bool {
        let (a, b) = self.endpoints();
        a == v || b == v
    }

    /// Whether the two edges have an endpoint in common.
    #[must_use]
    pub fn shares_endpoint(self, other: EdgeKey) -> bool {
        let (a, b) = other.endpoints();
        self.touches(a) || self.touches(b)
    }
}

/// Vertex/edge graph built from imported line art.
///
/// Owns the point positions and a set of unique undirected edges. Duplicate
/// insertions of the same unordered pair are no-ops. Self-loops may appear
/// transiently (for example when a merge collapses both endpoints of an edge)
/// and are dropped by every cleanup pass; degree, adjacency and face queries
/// ignore them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanarGraph {
    points: Vec<Vector2>,
    edges: BTreeSet<EdgeKey>,
}

impl PlanarGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from paths without deduplicating points.
    ///
    /// Points are appended in path order. Consecutive points are linked, and
    /// loops also link their last point back to their first. Coincident points
    /// from different paths stay distinct until a merge pass.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooManyPoints`] if the total point count does not
    /// fit the 24-bit index space.
    pub fn from_paths(paths: &[Path]) -> Result<Self, GraphError> {
        let total: usize = paths.iter().map(|p| p.points.len()).sum();
        if total > MAX_POINTS {
            return Err(GraphError::TooManyPoints(total));
        }

        let mut graph = Self {
            points: Vec::with_capacity(total),
            edges: BTreeSet::new(),
        };
        for path in paths {
            let i0 = graph.points.len();
            graph.points.extend_from_slice(&path.points);
            let n = path.points.len();
            for i in 1..n {
                graph.add_edge(i0 + i - 1, i0 + i);
            }
            if path.closed && n > 0 {
                graph.add_edge(i0, i0 + n - 1);
            }
        }
        Ok(graph)
    }

    /// Returns all point positions, indexed by vertex id.
    #[must_use]
    pub fn points(&self) -> &[Vector2] {
        &self.points
    }

    #[must_use]
    pub fn point(&self, i: usize) -> Option<&Vector2> {
        self.points.get(i)
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over the edges in index order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edges.iter().copied()
    }

    #[must_use]
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edges.contains(&EdgeKey::new(a, b))
    }

    /// Inserts the edge `a`-`b`; returns `false` if it was already present.
    pub(crate) fn add_edge(&mut self, a: usize, b: usize) -> bool {
        self.edges.insert(EdgeKey::new(a, b))
    }

    pub(crate) fn push_point(&mut self, p: Vector2) -> usize {
        self.points.push(p);
        self.points.len() - 1
    }

    /// Drops every edge whose two endpoints coincide; returns how many.
    pub fn prune_self_loops(&mut self) -> usize {
        let before = self.edges.len();
        self.edges.retain(|e| !e.is_self_loop());
        before - self.edges.len()
    }

    /// Number of (non-self-loop) edges incident to each point.
    #[must_use]
    pub fn point_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.points.len()];
        for (a, b) in self.proper_edges() {
            degrees[a] += 1;
            degrees[b] += 1;
        }
        degrees
    }

    /// Neighbor lists per point, in edge order.
    #[must_use]
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.points.len()];
        for (a, b) in self.proper_edges() {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
        adjacency
    }

    fn proper_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges
            .iter()
            .filter(|e| !e.is_self_loop())
            .map(|e| e.endpoints())
    }

    /// Resolves a vertex cycle to positions, skipping unknown indices.
    #[must_use]
    pub fn face_points(&self, cycle: &[usize]) -> Vec<Vector2> {
        cycle.iter().filter_map(|&i| self.points.get(i).copied()).collect()
    }

    /// Signed area of a vertex cycle; positive for counter-clockwise.
    #[must_use]
    pub fn face_signed_area(&self, cycle: &[usize]) -> f64 {
        signed_area_2d(&self.face_points(cycle))
    }

    /// Exports points and edges in persisted form.
    #[must_use]
    pub fn to_snapshot(&self) -> MeshSnapshot {
        MeshSnapshot {
            points: self.points.clone(),
            edges: self.edges.iter().map(|e| [e.lo, e.hi]).collect(),
        }
    }

    /// Restores a graph from persisted form, validating every edge.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::EdgeOutOfRange`] if an edge names a missing point.
    pub fn from_snapshot(snapshot: MeshSnapshot) -> Result<Self, SnapshotError> {
        let len = snapshot.points.len();
        let mut edges = BTreeSet::new();
        for [a, b] in snapshot.edges {
            if a as usize >= len || b as usize >= len {
                return Err(SnapshotError::EdgeOutOfRange { a, b, len });
            }
            edges.insert(EdgeKey::new(a as usize, b as usize));
        }
        Ok(Self {
            points: snapshot.points,
            edges,
        })
    }
}

/// Persisted graph: `{ points: [[x, y]], edges: [[u, v]] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSnapshot {
    #[serde(with = "point_list")]
    pub points: Vec<Vector2>,
    pub edges: Vec<[u32; 2]>,
}
