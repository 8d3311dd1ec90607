use super::symbol::Symbol;
use serde::Serialize;
use std::cmp::Ordering;

/// A functional annotation term reported by the enrichment collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentTerm {
    /// Annotation source, e.g. `GO:BP`, `KEGG`, `REAC`.
    pub source: String,
    pub term_id: String,
    pub name: String,
    pub p_value: f64,
    pub adjusted_p_value: f64,
    pub term_size: usize,
    pub intersections: Vec<Symbol>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentResult {
    /// Significant terms, most significant first.
    pub terms: Vec<EnrichmentTerm>,
    pub terms_returned: usize,
    pub query_size: usize,
}

impl EnrichmentResult {
    /// Keeps terms whose adjusted p-value is at or below `threshold`, sorted ascending.
    ///
    /// The sort is stable, so terms with equal adjusted p-values keep the order in which
    /// the collaborator reported them.
    pub fn select_significant(
        terms: Vec<EnrichmentTerm>,
        threshold: f64,
        query_size: usize,
    ) -> Self {
        let terms_returned = terms.len();
        let mut significant: Vec<EnrichmentTerm> = terms
            .into_iter()
            .filter(|term| term.adjusted_p_value <= threshold)
            .collect();
        significant.sort_by(|a, b| {
            a.adjusted_p_value
                .partial_cmp(&b.adjusted_p_value)
                .unwrap_or(Ordering::Equal)
        });
        Self {
            terms: significant,
            terms_returned,
            query_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
