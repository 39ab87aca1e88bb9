use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{GraphError, SnapshotError};
use crate::geometry::Path;
use crate::graph::{MeshSnapshot, PlanarGraph};
use crate::layout::{FloorLayout, Room, RoomInfo};
use crate::matching::Word;

/// One imported floor: source geometry, recognized text, the cleaned graph,
/// and the rooms drawn over it.
#[derive(Debug, Clone, Default)]
pub struct Floor {
    pub building: String,
    pub floor: i32,
    /// Geometry the words and graph were derived from.
    pub raw: Vec<Path>,
    pub words: Vec<Word>,
    pub graph: PlanarGraph,
    pub layout: FloorLayout,
}

/// Persisted room: info plus vertex cycles into the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RoomRecord {
    info: RoomInfo,
    path: Vec<usize>,
    #[serde(default)]
    path_negatives: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FloorSnapshot {
    building: String,
    floor: i32,
    raw: Vec<Path>,
    words: Vec<Word>,
    mesh: MeshSnapshot,
    rooms: Vec<RoomRecord>,
}

impl Floor {
    /// Bounded faces of the graph, the candidates for new rooms.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError::UnclosedFace`] for a corrupt graph.
    pub fn candidate_rooms(&self) -> Result<Vec<Vec<usize>>, GraphError> {
        self.graph.bounded_faces()
    }

    /// Serializes the floor; doors are not persisted.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, SnapshotError> {
        let snapshot = FloorSnapshot {
            building: self.building.clone(),
            floor: self.floor,
            raw: self.raw.clone(),
            words: self.words.clone(),
            mesh: self.graph.to_snapshot(),
            rooms: self
                .layout
                .rooms()
                .map(|(_, room)| RoomRecord {
                    info: room.info.clone(),
                    path: room.path.clone(),
                    path_negatives: room.path_negatives.clone(),
                })
                .collect(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Restores a floor, checking that every edge and room names an existing
    /// point. Room cycles are re-fixed on load.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] for malformed JSON, and
    /// [`SnapshotError::EdgeOutOfRange`] or [`SnapshotError::RoomOutOfRange`]
    /// for dangling indices.
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: FloorSnapshot = serde_json::from_str(json)?;
        let graph = PlanarGraph::from_snapshot(snapshot.mesh)?;
        let len = graph.point_count();

        let mut layout = FloorLayout::new();
        for record in snapshot.rooms {
            let dangling = record
                .path
                .iter()
                .chain(record.path_negatives.iter().flatten())
                .find(|&&i| i >= len);
            if let Some(&index) = dangling {
                return Err(SnapshotError::RoomOutOfRange { index, len });
            }
            layout.add_room(Room::new(record.info, record.path, record.path_negatives));
        }

        info!(
            building = %snapshot.building,
            floor = snapshot.floor,
            rooms = layout.room_count(),
            "loaded floor"
        );
        Ok(Self {
            building: snapshot.building,
            floor: snapshot.floor,
            raw: snapshot.raw,
            words: snapshot.words,
            graph,
            layout,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::tests::unit_square_at;
    use crate::layout::RoomType;

    fn two_room_floor() -> Floor {
        let raw = vec![unit_square_at(0.0, 0.0), unit_square_at(1.0, 0.0)];
        let mut graph = PlanarGraph::from_paths(&raw).unwrap();
        graph.merge_by_dist_simple(0.01);
        let mut floor = Floor {
            building: "north hall".into(),
            floor: 2,
            raw,
            graph,
            ..Floor::default()
        };
        for face in floor.candidate_rooms().unwrap() {
            floor.layout.add_room(Room::from_face(&face));
        }
        floor
    }

    #[test]
    fn candidate_rooms_are_bounded_faces() {
        let floor = two_room_floor();
        assert_eq!(floor.candidate_rooms().unwrap().len(), 2);
        assert_eq!(floor.layout.room_count(), 2);
    }

    #[test]
    fn json_round_trip() {
        let mut floor = two_room_floor();
        let (id, _) = floor.layout.rooms().next().unwrap();
        floor.layout.room_mut(id).unwrap().info = RoomInfo {
            id: "204".into(),
            kind: RoomType::Lounge,
            nickname: None,
        };

        let json = floor.to_json_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["building"], "north hall");
        assert_eq!(value["mesh"]["points"].as_array().unwrap().len(), 6);
        assert_eq!(value["raw"][0]["loop"], true);
        assert!(value["raw"][0].get("filled").is_none());
        assert_eq!(value["rooms"][0]["info"]["type"], "lounge");

        let back = Floor::from_json_str(&json).unwrap();
        assert_eq!(back.floor, 2);
        assert_eq!(back.graph, floor.graph);
        let before: Vec<&Room> = floor.layout.rooms().map(|(_, r)| r).collect();
        let after: Vec<&Room> = back.layout.rooms().map(|(_, r)| r).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn dangling_room_index_is_rejected() {
        let json = r#"{
            "building": "b", "floor": 0, "raw": [], "words": [],
            "mesh": { "points": [[0, 0], [1, 0], [0, 1]], "edges": [[0, 1]] },
            "rooms": [{ "info": { "id": "", "type": "other", "nickname": null }, "path": [0, 1, 5] }]
        }"#;
        assert!(matches!(
            Floor::from_json_str(json),
            Err(SnapshotError::RoomOutOfRange { index: 5, len: 3 })
        ));
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let json = r#"{
            "building": "b", "floor": 0, "raw": [], "words": [],
            "mesh": { "points": [[0, 0]], "edges": [[0, 4]] },
            "rooms": []
        }"#;
        assert!(matches!(
            Floor::from_json_str(json),
            Err(SnapshotError::EdgeOutOfRange { .. })
        ));
    }
}
