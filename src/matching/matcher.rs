use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::catalog::{Adjacency, CatalogConfig, SymbolVariant};
use crate::geometry::{AxisBox, Path};
use crate::math::{Rotation, Vector2};

/// Index of a template in a [`ShapeMatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(pub u32);

impl TemplateId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Side-table entry describing a template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateInfo {
    pub symbol: String,
    pub adjacency: Adjacency,
    pub height_ratio: f64,
    pub y_offset: f64,
    /// Number of sub-paths a match consumes.
    pub path_count: usize,
}

/// Precomputed canonical forms of one template.
#[derive(Debug, Clone)]
struct TemplateShape {
    /// Jointly normalized paths.
    conormalized: Vec<Path>,
    /// First sub-path normalized on its own, for the cheap rejection test.
    first: Path,
    /// `conormalized` brought to canonical orientation, then renormalized.
    conormalized_rot: Vec<Path>,
    first_rot: Path,
    /// Orientation removed to reach `conormalized_rot`.
    orientation: Rotation,
}

impl TemplateShape {
    fn new(paths: &[Path]) -> Option<Self> {
        let conormalized = Path::conormalize(paths);
        let first = conormalized.first()?.normalized();
        let orientation = conormalized[0].orientation();
        let inverse = orientation.inverse();
        let rotated: Vec<Path> = conormalized.iter().map(|p| p.rotated(&inverse)).collect();
        let conormalized_rot = Path::conormalize(&rotated);
        let first_rot = rotated[0].normalized();
        Some(Self {
            conormalized,
            first,
            conormalized_rot,
            first_rot,
            orientation,
        })
    }

    fn len(&self) -> usize {
        self.conormalized.len()
    }
}

/// A recognized symbol occupying `len` paths starting at `start`.
///
/// Serializes as `{ ch, bb, bb_line, i, n }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSymbol {
    #[serde(rename = "ch")]
    pub symbol: String,
    pub bb: AxisBox,
    /// Inferred text-line box.
    #[serde(rename = "bb_line")]
    pub baseline: AxisBox,
    #[serde(rename = "i")]
    pub start: usize,
    #[serde(rename = "n")]
    pub len: usize,
}

impl MatchedSymbol {
    /// Index one past the last consumed path.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A match from the rotation-tolerant scan.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedMatch {
    pub symbol: MatchedSymbol,
    pub template: TemplateId,
    /// Rotation taking the template's drawn orientation to the candidate's.
    pub rotation: Rotation,
}

/// Catalog of normalized multi-path glyph templates.
#[derive(Debug, Clone, Default)]
pub struct ShapeMatcher {
    shapes: Vec<TemplateShape>,
    info: Vec<TemplateInfo>,
    /// Templates with more sub-paths first; ties keep registration order.
    check_order: Vec<TemplateId>,
    adjacency: HashMap<String, Adjacency>,
}

impl ShapeMatcher {
    /// Builds a matcher from a catalog. Variants without usable geometry are
    /// skipped.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let mut matcher = Self::default();
        for (symbol, spec) in &config.symbols {
            matcher.adjacency.insert(symbol.clone(), spec.adjacency);
            for variant in &spec.variants {
                matcher.add_variant(symbol, spec.adjacency, variant);
            }
        }
        debug!(templates = matcher.info.len(), "shape catalog loaded");
        matcher
    }

    /// Registers one variant, returning its id or `None` if it was rejected.
    pub fn add_variant(
        &mut self,
        symbol: &str,
        adjacency: Adjacency,
        variant: &SymbolVariant,
    ) -> Option<TemplateId> {
        if variant.paths.is_empty() || variant.paths.iter().any(|p| p.points.is_empty()) {
            warn!(symbol, "skipping template with empty geometry");
            return None;
        }
        if !(variant.height_ratio.is_finite() && variant.height_ratio > 0.0) {
            warn!(symbol, ratio = variant.height_ratio, "skipping template with bad height ratio");
            return None;
        }
        let shape = TemplateShape::new(&variant.paths)?;
        let Ok(raw_id) = u32::try_from(self.shapes.len()) else {
            warn!(symbol, "template table is full");
            return None;
        };
        let id = TemplateId(raw_id);
        self.adjacency.entry(symbol.to_owned()).or_insert(adjacency);
        self.info.push(TemplateInfo {
            symbol: symbol.to_owned(),
            adjacency,
            height_ratio: variant.height_ratio,
            y_offset: variant.y_offset,
            path_count: shape.len(),
        });
        self.shapes.push(shape);

        let shapes = &self.shapes;
        self.check_order.push(id);
        self.check_order
            .sort_by(|a, b| shapes[b.index()].len().cmp(&shapes[a.index()].len()).then(a.cmp(b)));
        Some(id)
    }

    #[must_use]
    pub fn template_count(&self) -> usize {
        self.info.len()
    }

    /// Registered templates in id order.
    pub fn templates(&self) -> impl Iterator<Item = (TemplateId, &TemplateInfo)> + '_ {
        (0u32..).map(TemplateId).zip(&self.info)
    }

    #[must_use]
    pub fn template_info(&self, id: TemplateId) -> Option<&TemplateInfo> {
        self.info.get(id.index())
    }

    /// Adjacency policy of a symbol id; unknown ids need no context.
    #[must_use]
    pub fn adjacency_of(&self, symbol: &str) -> Adjacency {
        self.adjacency.get(symbol).copied().unwrap_or_default()
    }

    /// Scans `paths` left to right for catalog symbols in their drawn
    /// orientation.
    ///
    /// At each start index templates are tried longest first. The first
    /// sub-path is compared on its own before the whole span is jointly
    /// renormalized and compared path by path. A hit consumes its span.
    #[must_use]
    pub fn find_symbols(&self, paths: &[Path], thresh: f64) -> Vec<MatchedSymbol> {
        let individual: Vec<Path> = paths.iter().map(Path::normalized).collect();
        let mut found = Vec::new();
        let mut i = 0;
        while i < paths.len() {
            let hit = self.check_order.iter().find_map(|&id| {
                let shape = &self.shapes[id.index()];
                let span = paths.get(i..i + shape.len())?;
                if !individual[i].direct_compare(&shape.first, thresh) {
                    return None;
                }
                let candidate = Path::conormalize(span);
                if !spans_match(&candidate, &shape.conormalized, thresh) {
                    return None;
                }
                self.matched(id, span, i)
            });
            match hit {
                Some(m) => {
                    i = m.end();
                    found.push(m);
                }
                None => i += 1,
            }
        }
        debug!(paths = paths.len(), symbols = found.len(), "symbol scan finished");
        found
    }

    /// Like [`Self::find_symbols`], but tolerant of drawn rotation.
    ///
    /// Candidate and template are both turned so the direction from the
    /// centroid of their first sub-path to its first point lies along +x
    /// before comparing.
    #[must_use]
    pub fn find_symbols_rotated(&self, paths: &[Path], thresh: f64) -> Vec<RotatedMatch> {
        let individual: Vec<(Path, Rotation)> =
            paths.iter().map(Path::normalized_unrotated).collect();
        let mut found = Vec::new();
        let mut i = 0;
        while i < paths.len() {
            let (first, orientation) = &individual[i];
            let inverse = orientation.inverse();
            let hit = self.check_order.iter().find_map(|&id| {
                let shape = &self.shapes[id.index()];
                let span = paths.get(i..i + shape.len())?;
                if !first.direct_compare(&shape.first_rot, thresh) {
                    return None;
                }
                let rotated: Vec<Path> = span.iter().map(|p| p.rotated(&inverse)).collect();
                let candidate = Path::conormalize(&rotated);
                if !spans_match(&candidate, &shape.conormalized_rot, thresh) {
                    return None;
                }
                Some(RotatedMatch {
                    symbol: self.matched(id, span, i)?,
                    template: id,
                    rotation: *orientation * shape.orientation.inverse(),
                })
            });
            match hit {
                Some(m) => {
                    i = m.symbol.end();
                    found.push(m);
                }
                None => i += 1,
            }
        }
        debug!(paths = paths.len(), symbols = found.len(), "rotated symbol scan finished");
        found
    }

    fn matched(&self, id: TemplateId, span: &[Path], start: usize) -> Option<MatchedSymbol> {
        let info = &self.info[id.index()];
        let bb = AxisBox::merge_all(span.iter().filter_map(Path::bounding_box))?;
        let line_height = bb.height() / info.height_ratio;
        let baseline = AxisBox::new(
            Vector2::new(bb.x_min(), bb.y_min() + line_height * info.y_offset),
            Vector2::new(bb.width(), line_height),
        );
        Some(MatchedSymbol {
            symbol: info.symbol.clone(),
            bb,
            baseline,
            start,
            len: span.len(),
        })
    }
}

fn spans_match(candidate: &[Path], template: &[Path], thresh: f64) -> bool {
    candidate.len() == template.len()
        && candidate
            .iter()
            .zip(template)
            .all(|(c, t)| c.direct_compare(t, thresh))
}
