use std::collections::BTreeSet;

use super::PlanarGraph;
use crate::geometry::Path;

/// Outcome of walking edges away from a vertex until none remain.
struct Walk {
    visited: Vec<usize>,
    end: usize,
    closed: bool,
}

impl PlanarGraph {
    /// Reassembles the edge set into polylines and polygons.
    ///
    /// Starting from the lowest-index vertex that still has edges, the walk
    /// repeatedly consumes the most recently listed remaining edge at the
    /// current vertex. Returning to the start closes the path as a loop;
    /// otherwise the walk resumes from the start in the other direction to
    /// complete an open polyline. Every edge is emitted exactly once.
    #[must_use]
    pub fn to_paths(&self) -> Vec<Path> {
        let mut remaining = self.adjacency();
        let mut unfinished: BTreeSet<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_empty())
            .map(|(i, _)| i)
            .collect();

        let mut paths = Vec::new();
        while let Some(&start) = unfinished.first() {
            let forward = walk_edges(&mut remaining, &mut unfinished, start, start);
            let mut indices = vec![start];
            indices.extend_from_slice(&forward.visited);
            let mut closed = forward.closed;

            if !closed {
                indices.reverse();
                let backward = walk_edges(&mut remaining, &mut unfinished, start, forward.end);
                indices.extend_from_slice(&backward.visited);
                closed = backward.closed;
            }

            paths.push(Path::new(
                indices.iter().map(|&i| self.points[i]).collect(),
                closed,
            ));
        }
        paths
    }
}

/// Consumes edges from `from` onward; stops when the current vertex has no
/// edges left or the walk steps onto `stop`.
fn walk_edges(
    remaining: &mut [Vec<usize>],
    unfinished: &mut BTreeSet<usize>,
    from: usize,
    stop: usize,
) -> Walk {
    let mut visited = Vec::new();
    let mut current = from;
    loop {
        let Some(next) = remaining[current].pop() else {
            return Walk {
                visited,
                end: current,
                closed: false,
            };
        };
        if let Some(pos) = remaining[next].iter().position(|&w| w == current) {
            remaining[next].remove(pos);
        }
        if remaining[current].is_empty() {
            unfinished.remove(&current);
        }
        if remaining[next].is_empty() {
            unfinished.remove(&next);
        }

        if next == stop {
            return Walk {
                visited,
                end: next,
                closed: true,
            };
        }
        visited.push(next);
        current = next;
    }
}
