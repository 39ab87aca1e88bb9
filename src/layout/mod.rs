//! Editable room topology over planar-graph vertex indices.

pub mod cyclic;
pub mod floor_layout;
pub mod history;
pub mod label;
pub mod room;

pub use floor_layout::{Door, DoorId, FloorLayout, LayoutState, RoomId};
pub use history::LayoutEditor;
pub use label::guess_room_info;
pub use room::{Room, RoomInfo, RoomType, SharedRun};
