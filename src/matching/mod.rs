//! Glyph recognition over raw path lists: text symbols, words and doors.

pub mod catalog;
pub mod door;
pub mod matcher;
pub mod word;

pub use catalog::{Adjacency, CatalogConfig, SymbolSpec, SymbolVariant};
pub use door::{excise_doors, DoorMatch, DoorMatcher, DoorPattern, PathCut};
pub use matcher::{MatchedSymbol, RotatedMatch, ShapeMatcher, TemplateId, TemplateInfo};
pub use word::Word;
