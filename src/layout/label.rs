use tracing::debug;

use super::room::{Room, RoomInfo, RoomType};
use crate::graph::PlanarGraph;
use crate::matching::Word;

/// Two or more digits, then only lowercase ASCII letters.
fn is_room_number(text: &str) -> bool {
    let digits = text.chars().take_while(char::is_ascii_digit).count();
    digits >= 2 && text.chars().skip(digits).all(|c| c.is_ascii_lowercase())
}

fn type_from_tag(tag: &str, current: RoomType) -> RoomType {
    match tag.replace('0', "o").as_str() {
        "" => current,
        "bath" => RoomType::Bathroom,
        "corr" => RoomType::Hallway,
        "foodsv" => RoomType::Kitchen,
        "food" => RoomType::DiningHall,
        "lounge" => RoomType::Lounge,
        "lobby" => RoomType::Lobby,
        "sleep" => RoomType::Sleep,
        _ => RoomType::Other,
    }
}

/// Reads a room number and type off the words printed inside a room.
///
/// The room number is the word overlapping the room's bounding box that
/// looks like `123` or `204b`, nearest the box centre. The word nearest to
/// that number supplies the type tag. Returns `None` when no number is
/// found; the nickname is kept as is.
#[must_use]
pub fn guess_room_info(room: &Room, graph: &PlanarGraph, words: &[Word]) -> Option<RoomInfo> {
    let bb = room.bounding_box(graph)?;
    let center = bb.center();

    let (id_index, id_word) = words
        .iter()
        .enumerate()
        .filter(|(_, w)| w.bb.intersects(&bb) && is_room_number(&w.text()))
        .min_by(|a, b| {
            let da = (a.1.bb.center() - center).norm_squared();
            let db = (b.1.bb.center() - center).norm_squared();
            da.total_cmp(&db)
        })?;

    let id_center = id_word.bb.center();
    let tag = words
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != id_index)
        .min_by(|a, b| {
            let da = (a.1.bb.center() - id_center).norm_squared();
            let db = (b.1.bb.center() - id_center).norm_squared();
            da.total_cmp(&db)
        })
        .map(|(_, w)| w.text())
        .unwrap_or_default();

    let info = RoomInfo {
        id: id_word.text(),
        kind: type_from_tag(&tag, room.info.kind),
        nickname: room.info.nickname.clone(),
    };
    debug!(id = %info.id, kind = %info.kind, tag = %tag, "guessed room info");
    Some(info)
}

impl Room {
    /// Applies [`guess_room_info`]; returns whether anything was found.
    pub fn guess_info(&mut self, graph: &PlanarGraph, words: &[Word]) -> bool {
        match guess_room_info(self, graph, words) {
            Some(info) => {
                self.info = info;
                true
            }
            None => false,
        }
    }
}
