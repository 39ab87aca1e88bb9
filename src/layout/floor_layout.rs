use slotmap::SlotMap;

use super::room::Room;
use crate::error::LayoutError;

slotmap::new_key_type! {
    /// Stable handle to a room in a [`FloorLayout`].
    pub struct RoomId;
}

slotmap::new_key_type! {
    /// Stable handle to a door in a [`FloorLayout`].
    pub struct DoorId;
}

/// A door as a run of graph vertex indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Door {
    pub path: Vec<usize>,
}

impl Door {
    #[must_use]
    pub fn new(path: Vec<usize>) -> Self {
        Self { path }
    }
}

/// Deep copy of a layout's rooms and doors.
#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    rooms: SlotMap<RoomId, Room>,
    doors: SlotMap<DoorId, Door>,
}

/// Rooms and doors of one floor.
///
/// Both live in arenas keyed by generational ids, so handles held by a
/// caller stay valid across unrelated removals and across a restore.
#[derive(Debug, Clone, Default)]
pub struct FloorLayout {
    rooms: SlotMap<RoomId, Room>,
    doors: SlotMap<DoorId, Door>,
}

impl FloorLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_room(&mut self, room: Room) -> RoomId {
        self.rooms.insert(room)
    }

    /// Returns the room, or an error if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RoomNotFound`] for a stale or foreign id.
    pub fn room(&self, id: RoomId) -> Result<&Room, LayoutError> {
        self.rooms.get(id).ok_or(LayoutError::RoomNotFound)
    }

    /// # Errors
    ///
    /// Returns [`LayoutError::RoomNotFound`] for a stale or foreign id.
    pub fn room_mut(&mut self, id: RoomId) -> Result<&mut Room, LayoutError> {
        self.rooms.get_mut(id).ok_or(LayoutError::RoomNotFound)
    }

    /// # Errors
    ///
    /// Returns [`LayoutError::RoomNotFound`] for a stale or foreign id.
    pub fn remove_room(&mut self, id: RoomId) -> Result<Room, LayoutError> {
        self.rooms.remove(id).ok_or(LayoutError::RoomNotFound)
    }

    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &Room)> + '_ {
        self.rooms.iter()
    }

    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn add_door(&mut self, door: Door) -> DoorId {
        self.doors.insert(door)
    }

    /// # Errors
    ///
    /// Returns [`LayoutError::DoorNotFound`] for a stale or foreign id.
    pub fn door(&self, id: DoorId) -> Result<&Door, LayoutError> {
        self.doors.get(id).ok_or(LayoutError::DoorNotFound)
    }

    /// # Errors
    ///
    /// Returns [`LayoutError::DoorNotFound`] for a stale or foreign id.
    pub fn remove_door(&mut self, id: DoorId) -> Result<Door, LayoutError> {
        self.doors.remove(id).ok_or(LayoutError::DoorNotFound)
    }

    pub fn doors(&self) -> impl Iterator<Item = (DoorId, &Door)> + '_ {
        self.doors.iter()
    }

    #[must_use]
    pub fn door_count(&self) -> usize {
        self.doors.len()
    }

    /// Deep copy of the current rooms and doors.
    #[must_use]
    pub fn export_state(&self) -> LayoutState {
        LayoutState {
            rooms: self.rooms.clone(),
            doors: self.doors.clone(),
        }
    }

    /// Replaces rooms and doors with a previously exported state. Ids from
    /// that state are valid again afterwards.
    pub fn revert_state(&mut self, state: LayoutState) {
        self.rooms = state.rooms;
        self.doors = state.doors;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_survive_unrelated_removal() {
        let mut layout = FloorLayout::new();
        let a = layout.add_room(Room::from_face(&[0, 1, 2]));
        let b = layout.add_room(Room::from_face(&[3, 4, 5]));
        layout.remove_room(a).unwrap();
        assert_eq!(layout.room(b).unwrap().path, vec![3, 4, 5]);
        assert!(matches!(layout.room(a), Err(LayoutError::RoomNotFound)));
        assert!(layout.remove_room(a).is_err());
    }

    #[test]
    fn revert_restores_rooms_and_doors() {
        let mut layout = FloorLayout::new();
        let a = layout.add_room(Room::from_face(&[0, 1, 2, 3]));
        let d = layout.add_door(Door::new(vec![1, 2]));
        let saved = layout.export_state();

        layout.room_mut(a).unwrap().cut(0, 2);
        layout.remove_door(d).unwrap();
        layout.add_room(Room::from_face(&[7, 8, 9]));
        assert_eq!(layout.room_count(), 2);

        layout.revert_state(saved);
        assert_eq!(layout.room_count(), 1);
        assert_eq!(layout.room(a).unwrap().path, vec![0, 1, 2, 3]);
        assert_eq!(layout.door(d).unwrap().path, vec![1, 2]);
        assert_eq!(layout.door_count(), 1);
    }
}
