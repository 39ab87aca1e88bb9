use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cyclic::{
    circular_slice, drop_adjacent_repeats, drop_later_duplicates, drop_spurs, remove_between,
};
use crate::geometry::AxisBox;
use crate::graph::PlanarGraph;
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Vector2;

/// Broad use of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Hallway,
    DiningHall,
    Kitchen,
    Lounge,
    Lobby,
    CommonArea,
    Bathroom,
    Sleep,
    Gym,
    Workshop,
    #[default]
    Other,
}

impl RoomType {
    pub const ALL: [RoomType; 11] = [
        RoomType::Hallway,
        RoomType::DiningHall,
        RoomType::Kitchen,
        RoomType::Lounge,
        RoomType::Lobby,
        RoomType::CommonArea,
        RoomType::Bathroom,
        RoomType::Sleep,
        RoomType::Gym,
        RoomType::Workshop,
        RoomType::Other,
    ];

    /// Human-readable name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RoomType::Hallway => "hallway",
            RoomType::DiningHall => "dining hall",
            RoomType::Kitchen => "kitchen",
            RoomType::Lounge => "lounge",
            RoomType::Lobby => "lobby",
            RoomType::CommonArea => "common area",
            RoomType::Bathroom => "bathroom",
            RoomType::Sleep => "sleep",
            RoomType::Gym => "gym",
            RoomType::Workshop => "workshop",
            RoomType::Other => "other",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operator-facing description of a room.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomInfo {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: RoomType,
    #[serde(default)]
    pub nickname: Option<String>,
}

/// A maximal run of boundary vertices two rooms have in common.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedRun {
    /// Position of the run's first vertex in this room's path.
    pub start: usize,
    /// Position of the same vertex in the compared list.
    pub part_start: usize,
    pub len: usize,
}

/// A room boundary as a cycle of graph vertex indices, plus holes.
///
/// After every edit the cycle holds no repeated index, which also rules out
/// equal neighbours and out-and-back spurs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Room {
    pub info: RoomInfo,
    pub path: Vec<usize>,
    pub path_negatives: Vec<Vec<usize>>,
}

impl Room {
    #[must_use]
    pub fn new(info: RoomInfo, path: Vec<usize>, path_negatives: Vec<Vec<usize>>) -> Self {
        let mut room = Self {
            info,
            path,
            path_negatives,
        };
        room.fix();
        room
    }

    /// A fresh, unlabelled room bounded by a traced face.
    #[must_use]
    pub fn from_face(face: &[usize]) -> Self {
        Self::new(RoomInfo::default(), face.to_vec(), Vec::new())
    }

    /// Restores the cycle invariants: equal neighbours are merged,
    /// out-and-back spurs collapse, and later repeats of an index are dropped.
    pub fn fix(&mut self) {
        while drop_adjacent_repeats(&mut self.path) | drop_spurs(&mut self.path) {}
        drop_later_duplicates(&mut self.path);
    }

    /// Removes the boundary run strictly between vertices `a` and `b`,
    /// walking forward from `a`.
    ///
    /// Returns `false` without changes when either vertex is missing, they
    /// are the same vertex, or `b` directly follows `a`.
    pub fn cut(&mut self, a: usize, b: usize) -> bool {
        self.fix();
        let (Some(ia), Some(ib)) = (self.position(a), self.position(b)) else {
            return false;
        };
        if ia == ib || ib == (ia + 1) % self.path.len() {
            return false;
        }
        let removed = remove_between(&mut self.path, ia, ib);
        debug!(a, b, removed, "cut room boundary");
        removed > 0
    }

    /// Absorbs `other` across a shared wall.
    ///
    /// `other`'s boundary is reversed and matched against this one; see
    /// [`Self::shared_run`]. On success this room's copy of the wall is
    /// replaced by the rest of `other`'s boundary and its holes are appended.
    /// Both rooms are expected to wind the same way, so a failed join may
    /// still succeed in the other direction.
    pub fn join(&mut self, other: &Room) -> bool {
        let part: Vec<usize> = other.path.iter().rev().copied().collect();
        let Some(run) = self.shared_run(&part) else {
            return false;
        };
        let n = self.path.len();
        let wall_start = self.path[run.start];
        let wall_end = self.path[(run.start + run.len - 1) % n];
        let Some(from) = other.position(wall_start) else {
            return false;
        };
        // Starts at the wall start, then runs the non-shared side of `other`.
        let absorbed = circular_slice(&other.path, from, other.path.len() - run.len + 1);

        self.cut(wall_start, wall_end);
        let Some(at) = self.position(wall_start) else {
            return false;
        };
        self.path.splice(at + 1..at + 1, absorbed.into_iter().skip(1));
        self.fix();
        self.path_negatives.extend(other.path_negatives.iter().cloned());
        debug!(wall = run.len, len = self.path.len(), "joined rooms");
        true
    }

    /// Finds the shared wall between this boundary and `part`.
    ///
    /// The run starts at the first vertex of this cycle that is in `part`
    /// while its predecessor is not (or at position 0 if no such transition
    /// exists), and extends while both cycles step through the same
    /// vertices. Rejected when the run is shorter than one edge, covers
    /// either cycle entirely, or the two remainders still share a vertex.
    #[must_use]
    pub fn shared_run(&self, part: &[usize]) -> Option<SharedRun> {
        let n = self.path.len();
        if n == 0 || part.is_empty() {
            return None;
        }
        let in_part: HashSet<usize> = part.iter().copied().collect();

        let mut was_shared = in_part.contains(&self.path[0]);
        let mut first = was_shared.then_some(0);
        for (i, v) in self.path.iter().enumerate().skip(1) {
            let is_shared = in_part.contains(v);
            if !was_shared && is_shared {
                first = Some(i);
                break;
            }
            was_shared = is_shared;
        }
        let start = first?;
        let part_start = part.iter().position(|&v| v == self.path[start])?;

        let len = 1 + (1..n)
            .take_while(|off| self.path[(start + off) % n] == part[(part_start + off) % part.len()])
            .count();
        if len < 2 || len >= n || len >= part.len() {
            return None;
        }

        let rest_part: HashSet<usize> =
            circular_slice(part, part_start + len, part.len() - len).into_iter().collect();
        let overlaps = circular_slice(&self.path, start + len, n - len)
            .iter()
            .any(|v| rest_part.contains(v));
        if overlaps {
            return None;
        }
        Some(SharedRun {
            start,
            part_start,
            len,
        })
    }

    /// Boundary positions, skipping indices the graph does not have.
    #[must_use]
    pub fn points(&self, graph: &PlanarGraph) -> Vec<Vector2> {
        self.path.iter().filter_map(|&i| graph.point(i).copied()).collect()
    }

    #[must_use]
    pub fn bounding_box(&self, graph: &PlanarGraph) -> Option<AxisBox> {
        AxisBox::from_points(&self.points(graph))
    }

    /// Signed area of the outer boundary, ignoring holes.
    #[must_use]
    pub fn signed_area(&self, graph: &PlanarGraph) -> f64 {
        signed_area_2d(&self.points(graph))
    }

    fn position(&self, v: usize) -> Option<usize> {
        self.path.iter().position(|&w| w == v)
    }
}
