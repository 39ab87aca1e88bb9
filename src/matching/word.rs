use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::Adjacency;
use super::matcher::{MatchedSymbol, ShapeMatcher};
use crate::geometry::AxisBox;

/// A run of symbols sharing one text line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    #[serde(rename = "str")]
    pub symbols: Vec<MatchedSymbol>,
    /// Merged line box of the members.
    pub bb: AxisBox,
}

impl Word {
    /// Concatenated symbol ids.
    #[must_use]
    pub fn text(&self) -> String {
        self.symbols.iter().map(|s| s.symbol.as_str()).collect()
    }

    /// Line height of the word.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bb.height()
    }
}

impl ShapeMatcher {
    /// Groups matches into words along shared baselines.
    ///
    /// Matches are taken left to right. A later match joins the current word
    /// when its line box starts within half a line height of the word's right
    /// edge and its top and height agree with the word's within `thresh`,
    /// relative to the word's line height. Adjacency policies are applied to
    /// the finished words, then words whose height strays more than 50% from
    /// the median are dropped.
    #[must_use]
    pub fn wordify(&self, matches: &[MatchedSymbol], thresh: f64) -> Vec<Word> {
        let mut pending: Vec<&MatchedSymbol> = matches.iter().collect();
        pending.sort_by(|a, b| a.bb.x_min().total_cmp(&b.bb.x_min()));

        let mut words = Vec::new();
        let mut i = 0;
        while i < pending.len() {
            let first = pending[i];
            let mut word = Word {
                symbols: vec![first.clone()],
                bb: first.baseline,
            };
            let mut j = i + 1;
            while j < pending.len() {
                let line = word.bb;
                let h = line.height();
                let next = pending[j].baseline;
                if next.x_min() > line.x_max() + h * 0.5 {
                    break;
                }
                let aligned = ((next.y_min() - line.y_min()) / h).abs() <= thresh
                    && ((next.height() - h) / h).abs() <= thresh;
                if aligned {
                    word.symbols.push(pending.remove(j).clone());
                    word.bb.set_x_max(line.x_max().max(next.x_max()));
                } else {
                    j += 1;
                }
            }
            i += 1;
            if self.keeps(&word) {
                words.push(word);
            }
        }

        let kept = drop_height_outliers(words);
        debug!(symbols = matches.len(), words = kept.len(), "grouped words");
        kept
    }

    fn keeps(&self, word: &Word) -> bool {
        let policies: Vec<Adjacency> = word
            .symbols
            .iter()
            .map(|s| self.adjacency_of(&s.symbol))
            .collect();
        if policies.iter().all(|&a| a == Adjacency::Strong) {
            return false;
        }
        !(policies.len() == 1 && policies[0] == Adjacency::Weak)
    }
}

fn drop_height_outliers(words: Vec<Word>) -> Vec<Word> {
    let mut heights: Vec<f64> = words.iter().map(Word::height).collect();
    heights.sort_by(f64::total_cmp);
    let Some(&median) = heights.get(heights.len() / 2) else {
        return words;
    };
    words
        .into_iter()
        .filter(|w| (1.0 - w.height() / median).abs() < 0.5)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::matching::catalog::CatalogConfig;
    use crate::math::Vector2;

    fn sym(symbol: &str, x: f64, y: f64, w: f64, h: f64) -> MatchedSymbol {
        let bb = AxisBox::new(Vector2::new(x, y), Vector2::new(w, h));
        MatchedSymbol {
            symbol: symbol.to_owned(),
            bb,
            baseline: bb,
            start: 0,
            len: 1,
        }
    }

    fn matcher() -> ShapeMatcher {
        let mut cfg = CatalogConfig::new();
        for (id, adjacency) in [("a", Adjacency::None), ("-", Adjacency::Weak), ("'", Adjacency::Strong)] {
            cfg.symbols.entry(id.to_owned()).or_default().adjacency = adjacency;
        }
        ShapeMatcher::new(&cfg)
    }

    #[test]
    fn groups_a_line_of_text() {
        let input = vec![
            sym("b", 1.2, 0.0, 1.0, 1.0),
            sym("a", 0.0, 0.0, 1.0, 1.0),
            sym("c", 2.4, 0.05, 1.0, 1.0),
            sym("z", 10.0, 0.0, 1.0, 1.0),
        ];
        let words = matcher().wordify(&input, 0.1);
        let texts: Vec<String> = words.iter().map(Word::text).collect();
        assert_eq!(texts, vec!["abc", "z"]);
        assert!((words[0].bb.x_max() - 3.4).abs() < 1e-12);
    }

    #[test]
    fn mismatched_heights_stay_apart() {
        let input = vec![sym("a", 0.0, 0.0, 1.0, 1.0), sym("b", 1.1, 0.0, 1.0, 1.3)];
        let words = matcher().wordify(&input, 0.2);
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| w.symbols.len() == 1));
    }

    #[test]
    fn adjacency_policies() {
        let m = matcher();
        // A lone weak symbol is dropped; beside a letter it survives.
        assert!(m.wordify(&[sym("-", 0.0, 0.0, 1.0, 1.0)], 0.1).is_empty());
        let paired = m.wordify(&[sym("a", 0.0, 0.0, 1.0, 1.0), sym("-", 1.0, 0.0, 1.0, 1.0)], 0.1);
        assert_eq!(paired[0].text(), "a-");
        // A word made only of strong symbols is dropped.
        let strong = [sym("'", 0.0, 0.0, 1.0, 1.0), sym("'", 1.0, 0.0, 1.0, 1.0)];
        assert!(m.wordify(&strong, 0.1).is_empty());
    }

    #[test]
    fn height_outliers_are_removed() {
        let input = vec![
            sym("a", 0.0, 0.0, 1.0, 1.0),
            sym("b", 0.0, 10.0, 1.0, 1.1),
            sym("c", 0.0, 20.0, 1.0, 0.9),
            sym("d", 0.0, 30.0, 8.0, 8.0),
        ];
        let words = matcher().wordify(&input, 0.1);
        let texts: Vec<String> = words.iter().map(Word::text).collect();
        assert_eq!(texts.len(), 3);
        assert!(!texts.contains(&"d".to_owned()));
    }

    #[test]
    fn word_json_uses_str_key() {
        let words = matcher().wordify(&[sym("a", 0.0, 0.0, 1.0, 1.0)], 0.1);
        let json = serde_json::to_value(&words[0]).unwrap();
        assert_eq!(json["str"][0]["ch"], "a");
    }
}
