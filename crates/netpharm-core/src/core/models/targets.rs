use super::symbol::Symbol;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

const PERCENT_SCALE: f64 = 100.0;

/// The prediction service a target came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TargetSource {
    SwissTargetPrediction,
    SuperPred,
}

impl fmt::Display for TargetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SwissTargetPrediction => f.write_str("SwissTargetPrediction"),
            Self::SuperPred => f.write_str("SuperPred"),
        }
    }
}

/// One row as delivered by the target-prediction collaborator, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedTarget {
    pub symbol: String,
    pub probability: f64,
    pub source: TargetSource,
}

impl PredictedTarget {
    pub fn new(symbol: impl Into<String>, probability: f64, source: TargetSource) -> Self {
        Self {
            symbol: symbol.into(),
            probability,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetEvidence {
    pub probability: f64,
    pub sources: BTreeSet<TargetSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetSummary {
    pub swiss_count: usize,
    pub superpred_count: usize,
    pub predicted_by_both: usize,
    pub total_unique: usize,
}

/// Symbols predicted as molecular targets of the compound, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TargetSet {
    targets: IndexMap<Symbol, TargetEvidence>,
}

impl TargetSet {
    /// Merges raw predictions from every source into a single set.
    ///
    /// Each source is filtered independently: a source whose maximum probability exceeds 1
    /// is assumed to report percentages and is rescaled first, then rows whose probability
    /// is not strictly greater than that source's threshold are discarded. Surviving rows
    /// are merged per symbol, keeping the highest probability and every contributing source.
    ///
    /// # Arguments
    ///
    /// * `predictions` - Raw rows from the target-prediction collaborator.
    /// * `swiss_threshold` - Minimum probability for SwissTargetPrediction rows.
    /// * `superpred_threshold` - Minimum probability for SuperPred rows.
    pub fn from_predictions(
        predictions: &[PredictedTarget],
        swiss_threshold: f64,
        superpred_threshold: f64,
    ) -> (Self, TargetSummary) {
        let mut set = Self::default();
        let mut summary = TargetSummary::default();

        for source in [TargetSource::SwissTargetPrediction, TargetSource::SuperPred] {
            let rows: Vec<&PredictedTarget> =
                predictions.iter().filter(|p| p.source == source).collect();
            let scale = if rows.iter().any(|p| p.probability > 1.0) {
                PERCENT_SCALE
            } else {
                1.0
            };
            let threshold = match source {
                TargetSource::SwissTargetPrediction => swiss_threshold,
                TargetSource::SuperPred => superpred_threshold,
            };

            let mut kept = 0;
            for row in rows {
                let probability = row.probability / scale;
                if probability.is_nan() || probability <= threshold {
                    continue;
                }
                let Some(symbol) = Symbol::new(&row.symbol) else {
                    continue;
                };
                kept += 1;
                set.insert(symbol, probability, source);
            }

            match source {
                TargetSource::SwissTargetPrediction => summary.swiss_count = kept,
                TargetSource::SuperPred => summary.superpred_count = kept,
            }
        }

        summary.predicted_by_both = set
            .targets
            .values()
            .filter(|evidence| evidence.sources.len() > 1)
            .count();
        summary.total_unique = set.len();
        (set, summary)
    }

    fn insert(&mut self, symbol: Symbol, probability: f64, source: TargetSource) {
        let evidence = self.targets.entry(symbol).or_insert_with(|| TargetEvidence {
            probability,
            sources: BTreeSet::new(),
        });
        evidence.probability = evidence.probability.max(probability);
        evidence.sources.insert(source);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.targets.contains_key(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&TargetEvidence> {
        self.targets.get(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.targets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &TargetEvidence)> {
        self.targets.iter()
    }
}

impl FromIterator<Symbol> for TargetSet {
    /// Builds a set from bare symbols with no probability information.
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut set = Self::default();
        for symbol in iter {
            set.targets.entry(symbol).or_insert_with(|| TargetEvidence {
                probability: 0.0,
                sources: BTreeSet::new(),
            });
        }
        set
    }
}
