use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{GraphError, SnapshotError};
use crate::floor::Floor;
use crate::geometry::{AxisBox, Path};
use crate::graph::{CleanupStep, PlanarGraph};
use crate::layout::FloorLayout;
use crate::matching::{CatalogConfig, DoorMatcher, DoorPattern, ShapeMatcher};

/// Rescales imported geometry so one reference path has a known width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleReference {
    /// Index of the reference path in the imported list.
    pub path: usize,
    /// Real-world width of that path's bounding box.
    pub width: f64,
}

/// Tunables of the import pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub scale: Option<ScaleReference>,
    /// Keep only geometry inside the largest outline and move it to the origin.
    pub crop_to_outline: bool,
    pub symbol_threshold: f64,
    pub word_threshold: f64,
    pub excise_doors: bool,
    pub door_threshold: f64,
    pub cleanup: Vec<CleanupStep>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            scale: None,
            crop_to_outline: true,
            symbol_threshold: 0.1,
            word_threshold: 0.1,
            excise_doors: true,
            door_threshold: 0.1,
            cleanup: CleanupStep::default_pipeline(),
        }
    }
}

impl ImportConfig {
    /// Parses a config; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] on malformed input.
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Turns raw vector line art into a [`Floor`].
#[derive(Debug, Clone)]
pub struct FloorImporter {
    config: ImportConfig,
    symbols: ShapeMatcher,
    doors: DoorMatcher,
}

impl FloorImporter {
    #[must_use]
    pub fn new(config: ImportConfig, catalog: &CatalogConfig, doors: Vec<DoorPattern>) -> Self {
        Self {
            config,
            symbols: ShapeMatcher::new(catalog),
            doors: DoorMatcher::new(doors),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Runs the full pipeline: scale, crop, recognize and remove text,
    /// excise doors, build the graph and clean it up.
    ///
    /// The floor's `raw` paths are the scaled and cropped input, which is
    /// what the recognized words index into. The layout starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooManyPoints`] if the cleaned geometry has more
    /// points than the graph can index.
    pub fn import(&self, building: &str, floor: i32, paths: Vec<Path>) -> Result<Floor, GraphError> {
        let cfg = &self.config;
        let mut paths = paths;
        if let Some(reference) = cfg.scale {
            paths = scale_to_reference(paths, reference);
        }
        if cfg.crop_to_outline {
            paths = crop_to_outline(paths);
        }

        let symbols = self.symbols.find_symbols(&paths, cfg.symbol_threshold);
        let words = self.symbols.wordify(&symbols, cfg.word_threshold);
        let mut is_text = vec![false; paths.len()];
        for symbol in words.iter().flat_map(|w| &w.symbols) {
            for flag in is_text.iter_mut().skip(symbol.start).take(symbol.len) {
                *flag = true;
            }
        }
        let mut cleaned: Vec<Path> = paths
            .iter()
            .zip(&is_text)
            .filter(|(_, &text)| !text)
            .map(|(p, _)| p.clone())
            .collect();
        debug!(
            symbols = symbols.len(),
            words = words.len(),
            remaining = cleaned.len(),
            "removed text"
        );

        if cfg.excise_doors {
            let doors = self.doors.find_doors(&cleaned, cfg.door_threshold);
            if !doors.is_empty() {
                cleaned = self.doors.excise(&cleaned, &doors);
            }
        }

        let mut graph = PlanarGraph::from_paths(&cleaned)?;
        graph.apply_cleanup(&cfg.cleanup);
        info!(
            building,
            floor,
            paths = paths.len(),
            words = words.len(),
            points = graph.point_count(),
            edges = graph.edge_count(),
            "imported floor"
        );

        Ok(Floor {
            building: building.to_owned(),
            floor,
            raw: paths,
            words,
            graph,
            layout: FloorLayout::new(),
        })
    }
}

/// Scales every path about the origin so the reference path's bounding box
/// is `reference.width` wide. Unusable references leave the input as is.
#[must_use]
pub fn scale_to_reference(paths: Vec<Path>, reference: ScaleReference) -> Vec<Path> {
    let current = paths
        .get(reference.path)
        .and_then(Path::bounding_box)
        .map(|bb| bb.width());
    let factor = match current {
        Some(w) if w > 0.0 && reference.width.is_finite() && reference.width > 0.0 => {
            reference.width / w
        }
        _ => {
            warn!(path = reference.path, "unusable scale reference");
            return paths;
        }
    };
    paths
        .into_iter()
        .map(|mut p| {
            p.points.iter_mut().for_each(|q| *q *= factor);
            p
        })
        .collect()
}

/// Keeps paths that overlap the largest bounding box while being strictly
/// smaller than it, then translates them so their joint box starts at the
/// origin. The outline itself is dropped.
#[must_use]
pub fn crop_to_outline(paths: Vec<Path>) -> Vec<Path> {
    let boxes: Vec<Option<AxisBox>> = paths.iter().map(Path::bounding_box).collect();
    let Some(outer) = boxes
        .iter()
        .flatten()
        .max_by(|a, b| a.dim.norm_squared().total_cmp(&b.dim.norm_squared()))
        .copied()
    else {
        return paths;
    };
    let outer_size = outer.dim.norm_squared();

    let kept: Vec<Path> = paths
        .into_iter()
        .zip(boxes)
        .filter_map(|(p, bb)| {
            let bb = bb?;
            (bb.intersects(&outer) && bb.dim.norm_squared() < outer_size).then_some(p)
        })
        .collect();
    let Some(joint) = AxisBox::from_points(kept.iter().flat_map(|p| &p.points)) else {
        return kept;
    };
    let offset = -joint.pos;
    debug!(kept = kept.len(), x = joint.x_min(), y = joint.y_min(), "cropped to outline");
    kept.iter().map(|p| p.translated(&offset)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::layout::LayoutEditor;
    use crate::matching::{Adjacency, PathCut, SymbolVariant};
    use crate::math::Vector2;
    use approx::assert_relative_eq;

    fn init_tracing() {
        let env_filter = tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init();
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Path {
        Path::from_xy(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)], true)
    }

    fn one() -> Path {
        Path::from_xy(&[(0.3, 0.2), (0.5, 0.0), (0.5, 1.0)], false)
    }

    fn zero() -> Path {
        Path::from_xy(&[(0.25, 0.0), (0.5, 0.5), (0.25, 1.0), (0.0, 0.5)], true)
    }

    fn digits() -> CatalogConfig {
        CatalogConfig::new()
            .with_variant("1", Adjacency::None, SymbolVariant::new(vec![one()]))
            .with_variant("0", Adjacency::None, SymbolVariant::new(vec![zero()]))
    }

    fn glyph(p: &Path, scale: f64, x: f64, y: f64) -> Path {
        Path::new(
            p.points.iter().map(|q| q * scale + Vector2::new(x, y)).collect(),
            p.closed,
        )
    }

    /// Two rooms side by side on a sheet border, with "10" printed in the left one.
    fn sheet() -> Vec<Path> {
        vec![
            rect(-10.0, -10.0, 320.0, 220.0),
            rect(5.0, 7.0, 105.0, 107.0),
            rect(105.0, 7.0, 205.0, 107.0),
            glyph(&one(), 10.0, 40.0, 40.0),
            glyph(&zero(), 10.0, 47.0, 40.0),
        ]
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg = ImportConfig::from_json_str(r#"{ "excise_doors": false }"#).unwrap();
        assert!(!cfg.excise_doors);
        assert!(cfg.crop_to_outline);
        assert_eq!(cfg.cleanup, CleanupStep::default_pipeline());
        assert_relative_eq!(cfg.symbol_threshold, 0.1);
    }

    #[test]
    fn crop_drops_border_and_moves_to_origin() {
        let far = rect(1000.0, 1000.0, 1001.0, 1001.0);
        let mut input = sheet();
        input.push(far);
        let cropped = crop_to_outline(input);
        assert_eq!(cropped.len(), 4);
        let bb = AxisBox::merge_all(cropped.iter().filter_map(Path::bounding_box)).unwrap();
        assert_relative_eq!(bb.x_min(), 0.0);
        assert_relative_eq!(bb.y_min(), 0.0);
        assert_relative_eq!(bb.x_max(), 200.0);
    }

    #[test]
    fn scale_uses_reference_width() {
        let scaled = scale_to_reference(
            vec![rect(0.0, 0.0, 100.0, 10.0)],
            ScaleReference { path: 0, width: 3048.0 },
        );
        assert_relative_eq!(scaled[0].points[2].x, 3048.0);
        assert_relative_eq!(scaled[0].points[2].y, 304.8);

        let untouched = scale_to_reference(vec![rect(0.0, 0.0, 1.0, 1.0)], ScaleReference { path: 4, width: 1.0 });
        assert_relative_eq!(untouched[0].points[2].x, 1.0);
    }

    #[test]
    fn imports_rooms_and_labels() {
        init_tracing();
        let importer = FloorImporter::new(ImportConfig::default(), &digits(), Vec::new());
        let floor = importer.import("annex", 1, sheet()).unwrap();

        assert_eq!(floor.raw.len(), 4);
        assert_eq!(floor.words.len(), 1);
        assert_eq!(floor.words[0].text(), "10");
        assert_eq!(floor.graph.point_count(), 6);
        assert_eq!(floor.graph.edge_count(), 7);

        let faces = floor.candidate_rooms().unwrap();
        assert_eq!(faces.len(), 2);

        let mut editor = LayoutEditor::new(floor.layout.clone());
        let rooms: Vec<_> = faces.iter().map(|f| editor.add_room(f)).collect();
        let labelled: Vec<bool> = rooms
            .iter()
            .map(|&r| editor.guess_info(r, &floor.graph, &floor.words).unwrap())
            .collect();
        assert_eq!(labelled.iter().filter(|&&l| l).count(), 1);

        let joined = editor.join(rooms[0], rooms[1]).unwrap().unwrap();
        let room = editor.layout().room(joined).unwrap();
        assert_relative_eq!(room.signed_area(&floor.graph), 20000.0);
    }

    #[test]
    fn door_excision_removes_swing() {
        init_tracing();
        let leaf = Path::from_xy(&[(0.0, 0.0), (0.0, 1.0)], false);
        let swing = Path::from_xy(&[(0.0, 1.0), (0.7, 0.7), (1.0, 0.0)], false);
        let pattern = DoorPattern {
            paths: vec![leaf.clone(), swing.clone()],
            cuts: vec![PathCut::Whole, PathCut::Whole],
        };
        let cfg = ImportConfig {
            crop_to_outline: false,
            ..ImportConfig::default()
        };
        let importer = FloorImporter::new(cfg, &CatalogConfig::new(), vec![pattern]);
        let input = vec![
            rect(0.0, 0.0, 100.0, 100.0),
            glyph(&leaf, 20.0, 40.0, 40.0),
            glyph(&swing, 20.0, 40.0, 40.0),
        ];
        let floor = importer.import("annex", 0, input).unwrap();
        assert_eq!(floor.raw.len(), 3);
        assert_eq!(floor.graph.point_count(), 4);
        assert_eq!(floor.candidate_rooms().unwrap().len(), 1);
    }
}
