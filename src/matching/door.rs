use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::catalog::{Adjacency, SymbolVariant};
use super::matcher::{ShapeMatcher, TemplateId};
use crate::geometry::{AxisBox, Path};
use crate::math::Rotation;

/// What to remove from one sub-path of a detected door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawCut", into = "RawCut")]
pub enum PathCut {
    #[default]
    Keep,
    /// Drop the whole sub-path.
    Whole,
    /// Drop the points strictly between `start` and `end`, splitting the path.
    Range { start: usize, end: usize },
}

/// Wire form: `true`, `false` or `[start, end]`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawCut {
    Flag(bool),
    Range([usize; 2]),
}

impl From<RawCut> for PathCut {
    fn from(raw: RawCut) -> Self {
        match raw {
            RawCut::Flag(false) => PathCut::Keep,
            RawCut::Flag(true) => PathCut::Whole,
            RawCut::Range([start, end]) => PathCut::Range { start, end },
        }
    }
}

impl From<PathCut> for RawCut {
    fn from(cut: PathCut) -> Self {
        match cut {
            PathCut::Keep => RawCut::Flag(false),
            PathCut::Whole => RawCut::Flag(true),
            PathCut::Range { start, end } => RawCut::Range([start, end]),
        }
    }
}

/// A door glyph and the parts of it to excise once found.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DoorPattern {
    pub paths: Vec<Path>,
    /// One entry per sub-path; missing entries keep the sub-path.
    #[serde(default)]
    pub cuts: Vec<PathCut>,
}

/// A detected door.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorMatch {
    /// Index into the matcher's pattern list.
    pub pattern: usize,
    /// Matched the variant mirrored across `y = x`.
    pub mirrored: bool,
    pub rotation: Rotation,
    pub bb: AxisBox,
    pub start: usize,
    pub len: usize,
}

/// Rotation-tolerant matcher over door patterns and their mirror images.
#[derive(Debug, Clone, Default)]
pub struct DoorMatcher {
    matcher: ShapeMatcher,
    patterns: Vec<DoorPattern>,
    variants: HashMap<TemplateId, (usize, bool)>,
}

impl DoorMatcher {
    #[must_use]
    pub fn new(patterns: Vec<DoorPattern>) -> Self {
        let mut matcher = ShapeMatcher::default();
        let mut variants = HashMap::new();
        for (index, pattern) in patterns.iter().enumerate() {
            let mirrored: Vec<Path> = pattern.paths.iter().map(Path::flipped_xy).collect();
            for (suffix, flip, paths) in [("L", false, pattern.paths.clone()), ("R", true, mirrored)] {
                let id = format!("{index}{suffix}");
                if let Some(template) =
                    matcher.add_variant(&id, Adjacency::None, &SymbolVariant::new(paths))
                {
                    variants.insert(template, (index, flip));
                }
            }
        }
        Self {
            matcher,
            patterns,
            variants,
        }
    }

    #[must_use]
    pub fn patterns(&self) -> &[DoorPattern] {
        &self.patterns
    }

    /// Finds doors at any rotation in either hinge orientation.
    #[must_use]
    pub fn find_doors(&self, paths: &[Path], thresh: f64) -> Vec<DoorMatch> {
        self.matcher
            .find_symbols_rotated(paths, thresh)
            .into_iter()
            .filter_map(|m| {
                let &(pattern, mirrored) = self.variants.get(&m.template)?;
                Some(DoorMatch {
                    pattern,
                    mirrored,
                    rotation: m.rotation,
                    bb: m.symbol.bb,
                    start: m.symbol.start,
                    len: m.symbol.len,
                })
            })
            .collect()
    }

    /// [`excise_doors`] against this matcher's patterns.
    #[must_use]
    pub fn excise(&self, paths: &[Path], doors: &[DoorMatch]) -> Vec<Path> {
        excise_doors(paths, doors, &self.patterns)
    }
}

/// Removes the geometry each door's pattern marks as cut.
///
/// Paths untouched by any door are returned unchanged and in order.
#[must_use]
pub fn excise_doors(paths: &[Path], doors: &[DoorMatch], patterns: &[DoorPattern]) -> Vec<Path> {
    let mut cuts = vec![PathCut::Keep; paths.len()];
    for door in doors {
        let Some(pattern) = patterns.get(door.pattern) else {
            warn!(pattern = door.pattern, "door references unknown pattern");
            continue;
        };
        for (offset, &cut) in pattern.cuts.iter().take(door.len).enumerate() {
            if let Some(slot) = cuts.get_mut(door.start + offset) {
                *slot = cut;
            }
        }
    }

    let mut out = Vec::with_capacity(paths.len());
    for (path, cut) in paths.iter().zip(cuts) {
        match cut {
            PathCut::Keep => out.push(path.clone()),
            PathCut::Whole => {}
            PathCut::Range { start, end } => out.extend(split_out(path, start, end)),
        }
    }
    debug!(before = paths.len(), after = out.len(), doors = doors.len(), "excised doors");
    out
}

/// Pieces left after dropping the points strictly between `start` and `end`.
fn split_out(path: &Path, start: usize, end: usize) -> Vec<Path> {
    let n = path.points.len();
    if start >= end || end >= n {
        warn!(start, end, points = n, "ignoring out-of-range door cut");
        return vec![path.clone()];
    }
    let pts = &path.points;
    let pieces = if path.closed {
        vec![pts[end..].iter().chain(&pts[..=start]).copied().collect()]
    } else {
        vec![pts[..=start].to_vec(), pts[end..].to_vec()]
    };
    pieces
        .into_iter()
        .filter(|p: &Vec<_>| p.len() >= 2)
        .map(|p| Path::new(p, false).with_filled(path.filled))
        .collect()
}
