use serde::{Deserialize, Serialize};
use tracing::info;

use super::PlanarGraph;

/// One pass of the post-import cleanup pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CleanupStep {
    /// [`PlanarGraph::merge_by_dist_simple`].
    Merge { threshold: f64 },
    /// [`PlanarGraph::splice_line_intersections`].
    Splice {
        threshold: f64,
        line_line: bool,
        line_point: bool,
    },
}

impl CleanupStep {
    /// The pipeline used for imported floor plans: merge coarse duplicates,
    /// snap dangling wall ends, re-merge, split crossings, snap again at fine
    /// scale, and a final fine merge.
    #[must_use]
    pub fn default_pipeline() -> Vec<CleanupStep> {
        vec![
            CleanupStep::Merge { threshold: 2.0 },
            CleanupStep::Splice {
                threshold: 3.0,
                line_line: false,
                line_point: true,
            },
            CleanupStep::Merge { threshold: 3.0 },
            CleanupStep::Splice {
                threshold: -1.0,
                line_line: true,
                line_point: false,
            },
            CleanupStep::Splice {
                threshold: 0.1,
                line_line: false,
                line_point: true,
            },
            CleanupStep::Merge { threshold: 0.1 },
        ]
    }
}

impl PlanarGraph {
    /// Runs cleanup passes in order, then drops any self-loops left behind.
    pub fn apply_cleanup(&mut self, steps: &[CleanupStep]) {
        for step in steps {
            match *step {
                CleanupStep::Merge { threshold } => self.merge_by_dist_simple(threshold),
                CleanupStep::Splice {
                    threshold,
                    line_line,
                    line_point,
                } => self.splice_line_intersections(threshold, line_line, line_point),
            }
        }
        self.prune_self_loops();
        info!(
            steps = steps.len(),
            points = self.point_count(),
            edges = self.edge_count(),
            "graph cleanup finished"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Path;

    #[test]
    fn default_pipeline_closes_sloppy_room() {
        // A 100 x 60 room drawn as four strokes with gaps and overshoots.
        let strokes = [
            Path::from_xy(&[(0.0, 0.0), (100.0, 0.5)], false),
            Path::from_xy(&[(101.0, -2.0), (100.5, 60.0)], false),
            Path::from_xy(&[(100.0, 60.0), (0.5, 60.0)], false),
            Path::from_xy(&[(0.0, 61.5), (0.0, 1.0)], false),
        ];
        let mut g = PlanarGraph::from_paths(&strokes).unwrap();
        g.apply_cleanup(&CleanupStep::default_pipeline());
        let bounded = g.bounded_faces().unwrap();
        assert_eq!(bounded.len(), 1);
        let area = g.face_signed_area(&bounded[0]);
        assert!((area - 6000.0).abs() < 150.0, "area={area}");
    }

    #[test]
    fn steps_round_trip_through_json() {
        let steps = CleanupStep::default_pipeline();
        let json = serde_json::to_string(&steps).unwrap();
        assert!(json.contains(r#""op":"merge""#));
        let back: Vec<CleanupStep> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, steps);
    }
}
