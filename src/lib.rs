pub mod error;
pub mod floor;
pub mod geometry;
pub mod graph;
pub mod import;
pub mod layout;
pub mod matching;
pub mod math;

pub use error::{FloortraceError, Result};
pub use floor::Floor;
pub use import::{FloorImporter, ImportConfig};
