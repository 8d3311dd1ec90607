use super::symbol::Symbol;
use serde::Serialize;
use thiserror::Error;

/// Upper bound of the raw interaction confidence scale.
pub const MAX_SCORE: f64 = 1000.0;

/// One row of the tabular edge list produced by the interaction-query collaborator.
///
/// Scores arrive as text and are only coerced when the row is turned into an
/// [`InteractionEdge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInteraction {
    pub entity_a: String,
    pub entity_b: String,
    pub score: String,
}

impl RawInteraction {
    pub fn new(
        entity_a: impl Into<String>,
        entity_b: impl Into<String>,
        score: impl Into<String>,
    ) -> Self {
        Self {
            entity_a: entity_a.into(),
            entity_b: entity_b.into(),
            score: score.into(),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRejection {
    #[error("blank entity identifier")]
    BlankIdentifier,
    #[error("score is not numeric")]
    NonNumericScore,
    #[error("score outside 0..=1000")]
    ScoreOutOfRange,
    #[error("self-interaction")]
    SelfLoop,
}

/// A validated undirected interaction between two distinct entities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionEdge {
    a: Symbol,
    b: Symbol,
    score: f64,
}

impl InteractionEdge {
    pub fn new(a: Symbol, b: Symbol, score: f64) -> Result<Self, EdgeRejection> {
        if !score.is_finite() {
            return Err(EdgeRejection::NonNumericScore);
        }
        if !(0.0..=MAX_SCORE).contains(&score) {
            return Err(EdgeRejection::ScoreOutOfRange);
        }
        if a == b {
            return Err(EdgeRejection::SelfLoop);
        }
        Ok(Self { a, b, score })
    }

    /// Coerces a raw row, stripping species prefixes and normalizing case.
    pub fn from_raw(raw: &RawInteraction) -> Result<Self, EdgeRejection> {
        let a = Symbol::new(strip_species_prefix(&raw.entity_a))
            .ok_or(EdgeRejection::BlankIdentifier)?;
        let b = Symbol::new(strip_species_prefix(&raw.entity_b))
            .ok_or(EdgeRejection::BlankIdentifier)?;
        let score = raw
            .score
            .trim()
            .parse::<f64>()
            .map_err(|_| EdgeRejection::NonNumericScore)?;
        Self::new(a, b, score)
    }

    pub fn a(&self) -> &Symbol {
        &self.a
    }

    pub fn b(&self) -> &Symbol {
        &self.b
    }

    /// Raw confidence score in `0..=1000`.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Edge weight on the unit interval.
    pub fn weight(&self) -> f64 {
        self.score / MAX_SCORE
    }
}

/// Removes a leading NCBI taxon prefix such as `9606.` from an identifier.
pub fn strip_species_prefix(id: &str) -> &str {
    let id = id.trim();
    match id.split_once('.') {
        Some((taxon, rest))
            if !taxon.is_empty() && taxon.bytes().all(|b| b.is_ascii_digit()) =>
        {
            rest
        }
        _ => id,
    }
}

/// Result of coercing a whole table of raw rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeCoercion {
    pub edges: Vec<InteractionEdge>,
    pub rows_seen: usize,
    pub rows_dropped: usize,
}

pub fn coerce_rows(rows: &[RawInteraction]) -> EdgeCoercion {
    let mut coercion = EdgeCoercion {
        edges: Vec::with_capacity(rows.len()),
        rows_seen: rows.len(),
        rows_dropped: 0,
    };
    for row in rows {
        match InteractionEdge::from_raw(row) {
            Ok(edge) => coercion.edges.push(edge),
            Err(reason) => {
                tracing::debug!(
                    a = %row.entity_a,
                    b = %row.entity_b,
                    score = %row.score,
                    %reason,
                    "Dropping interaction row."
                );
                coercion.rows_dropped += 1;
            }
        }
    }
    coercion
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_normalizes_identifiers_and_parses_score() {
        let edge = InteractionEdge::from_raw(&RawInteraction::new("9606.tp53", "MDM2", " 999 "))
            .unwrap();
        assert_eq!(edge.a().as_str(), "TP53");
        assert_eq!(edge.b().as_str(), "MDM2");
        assert_eq!(edge.score(), 999.0);
        assert!((edge.weight() - 0.999).abs() < 1e-12);
    }

    #[test]
    fn rejects_invalid_rows() {
        let cases = [
            (RawInteraction::new("A", "B", "high"), EdgeRejection::NonNumericScore),
            (RawInteraction::new("A", "B", "NaN"), EdgeRejection::NonNumericScore),
            (RawInteraction::new("A", "B", "1200"), EdgeRejection::ScoreOutOfRange),
            (RawInteraction::new("A", "B", "-1"), EdgeRejection::ScoreOutOfRange),
            (RawInteraction::new("a", "A", "500"), EdgeRejection::SelfLoop),
            (RawInteraction::new("", "A", "500"), EdgeRejection::BlankIdentifier),
        ];
        for (row, expected) in cases {
            assert_eq!(InteractionEdge::from_raw(&row), Err(expected), "{:?}", row);
        }
    }

    #[test]
    fn new_enforces_the_same_checks_as_row_coercion() {
        let tp53 = Symbol::new("TP53").unwrap();
        let mdm2 = Symbol::new("MDM2").unwrap();
        assert_eq!(
            InteractionEdge::new(tp53.clone(), mdm2.clone(), 1000.5),
            Err(EdgeRejection::ScoreOutOfRange)
        );
        assert_eq!(
            InteractionEdge::new(tp53.clone(), tp53.clone(), 500.0),
            Err(EdgeRejection::SelfLoop)
        );
        assert_eq!(
            InteractionEdge::new(tp53.clone(), mdm2.clone(), f64::INFINITY),
            Err(EdgeRejection::NonNumericScore)
        );
        let edge = InteractionEdge::new(tp53, mdm2, 0.0).unwrap();
        assert_eq!(edge.a().as_str(), "TP53");
        assert_eq!(edge.b().as_str(), "MDM2");
        assert_eq!(edge.weight(), 0.0);
    }

    #[test]
    fn species_prefix_only_strips_numeric_taxa() {
        assert_eq!(strip_species_prefix("9606.EGFR"), "EGFR");
        assert_eq!(strip_species_prefix(" 10090.Egfr "), "Egfr");
        assert_eq!(strip_species_prefix("HLA-A.1"), "HLA-A.1");
        assert_eq!(strip_species_prefix(".X"), ".X");
        assert_eq!(strip_species_prefix("EGFR"), "EGFR");
    }

    #[test]
    fn coerce_rows_counts_dropped_rows() {
        let rows = vec![
            RawInteraction::new("A", "B", "900"),
            RawInteraction::new("B", "B", "900"),
            RawInteraction::new("B", "C", "n/a"),
            RawInteraction::new("C", "A", "400"),
        ];
        let coercion = coerce_rows(&rows);
        assert_eq!(coercion.rows_seen, 4);
        assert_eq!(coercion.rows_dropped, 2);
        assert_eq!(coercion.edges.len(), 2);
    }
}
