use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::geometry::Path;

/// How much surrounding text a symbol needs before a lone match is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjacency {
    /// Always kept.
    #[default]
    None,
    /// Dropped when it ends up alone in its word.
    Weak,
    /// Dropped when every member of its word is also `Strong`.
    Strong,
}

/// One drawn form of a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolVariant {
    pub paths: Vec<Path>,
    /// Glyph height as a fraction of the text line height.
    #[serde(default = "unit_ratio")]
    pub height_ratio: f64,
    /// Offset of the line top from the glyph top, in line heights.
    #[serde(default)]
    pub y_offset: f64,
}

fn unit_ratio() -> f64 {
    1.0
}

impl SymbolVariant {
    /// A variant that fills the whole line.
    #[must_use]
    pub fn new(paths: Vec<Path>) -> Self {
        Self {
            paths,
            height_ratio: 1.0,
            y_offset: 0.0,
        }
    }

    #[must_use]
    pub fn with_baseline(mut self, height_ratio: f64, y_offset: f64) -> Self {
        self.height_ratio = height_ratio;
        self.y_offset = y_offset;
        self
    }
}

/// Catalog entry for one symbol id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SymbolSpec {
    #[serde(default)]
    pub adjacency: Adjacency,
    pub variants: Vec<SymbolVariant>,
}

/// Declarative glyph catalog, keyed by symbol id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub symbols: BTreeMap<String, SymbolSpec>,
}

impl CatalogConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variant to `symbol`, creating the entry if needed.
    ///
    /// The adjacency policy of an existing entry is overwritten.
    #[must_use]
    pub fn with_variant(
        mut self,
        symbol: impl Into<String>,
        adjacency: Adjacency,
        variant: SymbolVariant,
    ) -> Self {
        let spec = self.symbols.entry(symbol.into()).or_default();
        spec.adjacency = adjacency;
        spec.variants.push(variant);
        self
    }

    /// Parses a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] on malformed input.
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the catalog to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_defaults() {
        let json = r#"{
            "symbols": {
                "1": {
                    "adjacency": "weak",
                    "variants": [{ "paths": [{ "points": [[0, 0], [0, 1]], "loop": false }] }]
                }
            }
        }"#;
        let cfg = CatalogConfig::from_json_str(json).unwrap();
        let spec = &cfg.symbols["1"];
        assert_eq!(spec.adjacency, Adjacency::Weak);
        assert!((spec.variants[0].height_ratio - 1.0).abs() < f64::EPSILON);
        assert!(spec.variants[0].y_offset.abs() < f64::EPSILON);
    }

    #[test]
    fn builder_round_trips() {
        let bar = Path::from_xy(&[(0.0, 0.0), (0.0, 1.0)], false);
        let cfg = CatalogConfig::new()
            .with_variant("1", Adjacency::Strong, SymbolVariant::new(vec![bar.clone()]))
            .with_variant("1", Adjacency::Strong, SymbolVariant::new(vec![bar]).with_baseline(0.5, 0.25));
        assert_eq!(cfg.symbols["1"].variants.len(), 2);
        let back = CatalogConfig::from_json_str(&cfg.to_json_string().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            CatalogConfig::from_json_str("{ nope"),
            Err(SnapshotError::Json(_))
        ));
    }
}
