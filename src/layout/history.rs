use tracing::{debug, info};

use super::floor_layout::{Door, DoorId, FloorLayout, LayoutState, RoomId};
use super::room::{Room, RoomInfo};
use crate::error::LayoutError;
use crate::graph::PlanarGraph;
use crate::matching::Word;

/// How to take back one edit.
#[derive(Debug, Clone)]
enum UndoEntry {
    /// Restore the whole layout.
    Snapshot(LayoutState),
    RemoveRoom(RoomId),
    RemoveDoor(DoorId),
    RestorePath { room: RoomId, path: Vec<usize> },
    RestoreInfo { room: RoomId, info: RoomInfo },
    /// Drop the room split off and restore the original boundary.
    Unsplit {
        room: RoomId,
        path: Vec<usize>,
        added: RoomId,
    },
}

/// The most recent cut, kept so it can be moved to the other side.
#[derive(Debug, Clone)]
struct PendingFlip {
    room: RoomId,
    path: Vec<usize>,
    a: usize,
    b: usize,
}

/// Interactive editor over a [`FloorLayout`] with a linear undo stack.
///
/// Operations that find nothing to do return `Ok(false)` or `Ok(None)`
/// and record no undo entry.
#[derive(Debug, Clone, Default)]
pub struct LayoutEditor {
    layout: FloorLayout,
    undo: Vec<UndoEntry>,
    flip: Option<PendingFlip>,
}

impl LayoutEditor {
    #[must_use]
    pub fn new(layout: FloorLayout) -> Self {
        Self {
            layout,
            undo: Vec::new(),
            flip: None,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &FloorLayout {
        &self.layout
    }

    #[must_use]
    pub fn into_layout(self) -> FloorLayout {
        self.layout
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    fn record(&mut self, entry: UndoEntry) {
        self.undo.push(entry);
        self.flip = None;
    }

    /// Promotes a traced face to an unlabelled room.
    pub fn add_room(&mut self, face: &[usize]) -> RoomId {
        let id = self.layout.add_room(Room::from_face(face));
        self.record(UndoEntry::RemoveRoom(id));
        id
    }

    pub fn add_door(&mut self, path: Vec<usize>) -> DoorId {
        let id = self.layout.add_door(Door::new(path));
        self.record(UndoEntry::RemoveDoor(id));
        id
    }

    /// Merges two rooms across their shared wall, trying `first` as the
    /// absorbing room before `second`. Returns the surviving room.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RoomNotFound`] if either id is stale.
    pub fn join(&mut self, first: RoomId, second: RoomId) -> Result<Option<RoomId>, LayoutError> {
        if first == second {
            return Ok(None);
        }
        let saved = self.layout.export_state();
        let a = self.layout.room(first)?.clone();
        let b = self.layout.room(second)?.clone();

        let (kept, absorbed) = if self.layout.room_mut(first)?.join(&b) {
            (first, second)
        } else if self.layout.room_mut(second)?.join(&a) {
            (second, first)
        } else {
            debug!("rooms share no joinable wall");
            return Ok(None);
        };
        self.layout.remove_room(absorbed)?;
        self.record(UndoEntry::Snapshot(saved));
        info!(rooms = self.layout.room_count(), "joined rooms");
        Ok(Some(kept))
    }

    /// Splits a room along the chord `a`-`b`. The original keeps the side
    /// walked forward from `b` back to `a`; the new room gets the rest.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RoomNotFound`] if the id is stale.
    pub fn split(&mut self, room: RoomId, a: usize, b: usize) -> Result<Option<RoomId>, LayoutError> {
        let original = self.layout.room(room)?.clone();
        let mut kept = original.clone();
        let mut other = original.clone();
        if !(kept.cut(a, b) && other.cut(b, a)) {
            return Ok(None);
        }
        *self.layout.room_mut(room)? = kept;
        let added = self.layout.add_room(other);
        self.record(UndoEntry::Unsplit {
            room,
            path: original.path,
            added,
        });
        Ok(Some(added))
    }

    /// Removes the boundary run strictly between `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RoomNotFound`] if the id is stale.
    pub fn cut(&mut self, room: RoomId, a: usize, b: usize) -> Result<bool, LayoutError> {
        let target = self.layout.room_mut(room)?;
        let path = target.path.clone();
        if !target.cut(a, b) {
            return Ok(false);
        }
        self.record(UndoEntry::RestorePath {
            room,
            path: path.clone(),
        });
        self.flip = Some(PendingFlip { room, path, a, b });
        Ok(true)
    }

    /// Redoes the last cut on the other side of its chord. Repeating the
    /// call flips back. Undo still restores the boundary from before the cut.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RoomNotFound`] if the room was removed.
    pub fn flip_last_cut(&mut self) -> Result<bool, LayoutError> {
        let Some(pending) = self.flip.as_mut() else {
            return Ok(false);
        };
        let target = self.layout.room_mut(pending.room)?;
        target.path.clone_from(&pending.path);
        std::mem::swap(&mut pending.a, &mut pending.b);
        Ok(target.cut(pending.a, pending.b))
    }

    /// # Errors
    ///
    /// Returns [`LayoutError::RoomNotFound`] if the id is stale.
    pub fn delete(&mut self, room: RoomId) -> Result<Room, LayoutError> {
        let saved = self.layout.export_state();
        let removed = self.layout.remove_room(room)?;
        self.record(UndoEntry::Snapshot(saved));
        Ok(removed)
    }

    /// Labels a room from nearby text; see [`super::guess_room_info`].
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RoomNotFound`] if the id is stale.
    pub fn guess_info(
        &mut self,
        room: RoomId,
        graph: &PlanarGraph,
        words: &[Word],
    ) -> Result<bool, LayoutError> {
        let target = self.layout.room_mut(room)?;
        let info = target.info.clone();
        if !target.guess_info(graph, words) {
            return Ok(false);
        }
        self.record(UndoEntry::RestoreInfo { room, info });
        Ok(true)
    }

    /// Takes back the most recent edit. Returns `false` when there is
    /// nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if the entry names a missing room or door.
    pub fn undo(&mut self) -> Result<bool, LayoutError> {
        let Some(entry) = self.undo.pop() else {
            return Ok(false);
        };
        self.flip = None;
        match entry {
            UndoEntry::Snapshot(state) => self.layout.revert_state(state),
            UndoEntry::RemoveRoom(id) => {
                self.layout.remove_room(id)?;
            }
            UndoEntry::RemoveDoor(id) => {
                self.layout.remove_door(id)?;
            }
            UndoEntry::RestorePath { room, path } => self.layout.room_mut(room)?.path = path,
            UndoEntry::RestoreInfo { room, info } => self.layout.room_mut(room)?.info = info,
            UndoEntry::Unsplit { room, path, added } => {
                self.layout.remove_room(added)?;
                self.layout.room_mut(room)?.path = path;
            }
        }
        debug!(depth = self.undo.len(), "undid edit");
        Ok(true)
    }
}
