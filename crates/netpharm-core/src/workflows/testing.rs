//! Scripted collaborators shared by the workflow tests.

use crate::core::models::compound::{Compound, CompoundQuery};
use crate::core::models::enrichment::EnrichmentTerm;
use crate::core::models::interaction::RawInteraction;
use crate::core::models::pathways::{PathwayHit, PathwayParticipant};
use crate::core::models::symbol::Symbol;
use crate::core::models::targets::{PredictedTarget, TargetSource};
use crate::engine::collaborators::{
    Collaborators, CompoundSource, EnrichmentSource, InteractionSource, PathwaySource,
    TargetPredictor,
};
use crate::engine::config::{PipelineConfig, PipelineConfigBuilder, RetryConfig};
use crate::engine::error::FetchError;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Default)]
pub struct MockCompounds {
    pub failure: Option<FetchError>,
    pub calls: Cell<usize>,
}

impl CompoundSource for MockCompounds {
    fn lookup(&self, query: &CompoundQuery) -> Result<Compound, FetchError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let mut compound = Compound::from_smiles("COc1cc(C=CC(=O)CC(=O)C=Cc2ccc(O)c(OC)c2)ccc1O");
        if let CompoundQuery::Cid(cid) = query {
            compound.cid = Some(*cid);
        }
        compound.molecular_formula = Some("C21H20O6".to_string());
        Ok(compound)
    }
}

#[derive(Default)]
pub struct MockTargets {
    pub rows: Vec<PredictedTarget>,
    pub calls: Cell<usize>,
}

impl TargetPredictor for MockTargets {
    fn predict(&self, _compound: &Compound) -> Result<Vec<PredictedTarget>, FetchError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.rows.clone())
    }
}

#[derive(Default)]
pub struct MockPathways {
    pub hits: HashMap<String, Vec<PathwayHit>>,
    pub members: HashMap<String, Vec<PathwayParticipant>>,
    /// Failures keyed by search keyword or pathway ID.
    pub failures: HashMap<String, FetchError>,
    pub search_calls: Cell<usize>,
    pub participant_calls: Cell<usize>,
}

impl MockPathways {
    pub fn with_hits(mut self, keyword: &str, hits: &[(&str, &str)]) -> Self {
        let hits = hits
            .iter()
            .map(|(id, name)| PathwayHit {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();
        self.hits.insert(keyword.to_string(), hits);
        self
    }

    pub fn with_members(mut self, pathway_id: &str, members: &[(&str, &str)]) -> Self {
        let members = members
            .iter()
            .map(|(symbol, reference)| PathwayParticipant::new(*symbol, *reference))
            .collect();
        self.members.insert(pathway_id.to_string(), members);
        self
    }

    pub fn failing(mut self, key: &str, err: FetchError) -> Self {
        self.failures.insert(key.to_string(), err);
        self
    }
}

impl PathwaySource for MockPathways {
    fn search(&self, keyword: &str) -> Result<Vec<PathwayHit>, FetchError> {
        self.search_calls.set(self.search_calls.get() + 1);
        if let Some(err) = self.failures.get(keyword) {
            return Err(err.clone());
        }
        Ok(self.hits.get(keyword).cloned().unwrap_or_default())
    }

    fn participants(&self, pathway_id: &str) -> Result<Vec<PathwayParticipant>, FetchError> {
        self.participant_calls.set(self.participant_calls.get() + 1);
        if let Some(err) = self.failures.get(pathway_id) {
            return Err(err.clone());
        }
        Ok(self.members.get(pathway_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct MockInteractions {
    pub rows: Vec<RawInteraction>,
    pub calls: Cell<usize>,
    pub last_request: RefCell<Option<(Vec<String>, u32)>>,
}

impl MockInteractions {
    pub fn from_rows(rows: &[(&str, &str, &str)]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|(a, b, score)| RawInteraction::new(*a, *b, *score))
                .collect(),
            ..Self::default()
        }
    }
}

impl InteractionSource for MockInteractions {
    fn query(
        &self,
        genes: &[Symbol],
        required_score: u32,
    ) -> Result<Vec<RawInteraction>, FetchError> {
        self.calls.set(self.calls.get() + 1);
        let genes = genes.iter().map(|g| g.to_string()).collect();
        *self.last_request.borrow_mut() = Some((genes, required_score));
        Ok(self.rows.clone())
    }
}

#[derive(Default)]
pub struct MockEnrichment {
    pub terms: Vec<EnrichmentTerm>,
    pub calls: Cell<usize>,
}

impl EnrichmentSource for MockEnrichment {
    fn enrich(&self, _genes: &[Symbol]) -> Result<Vec<EnrichmentTerm>, FetchError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.terms.clone())
    }
}

pub fn term(source: &str, id: &str, adjusted_p_value: f64) -> EnrichmentTerm {
    EnrichmentTerm {
        source: source.to_string(),
        term_id: id.to_string(),
        name: format!("term {}", id),
        p_value: adjusted_p_value / 10.0,
        adjusted_p_value,
        term_size: 120,
        intersections: vec![Symbol::new("AKT1").unwrap()],
    }
}

/// A complete, consistent set of collaborator responses.
///
/// Targets: EGFR, SRC, AKT1, MTOR, TP53, MAPK1 (PIK3CA falls below the SuperPred cutoff).
/// Pathways: R-HSA-168256 and R-HSA-1280218 via the "immune system" keyword; the direct
/// R-HSA-1280218 term is a duplicate. Overlap: EGFR, SRC, AKT1, MTOR, MAPK1.
/// Interactions: seven valid edges among the overlap plus a self-loop and a
/// non-numeric row.
pub struct Fixture {
    pub compounds: MockCompounds,
    pub targets: MockTargets,
    pub pathways: MockPathways,
    pub interactions: MockInteractions,
    pub enrichment: MockEnrichment,
}

impl Fixture {
    pub fn new() -> Self {
        let targets = MockTargets {
            rows: vec![
                PredictedTarget::new("EGFR", 0.9, TargetSource::SwissTargetPrediction),
                PredictedTarget::new("SRC", 0.8, TargetSource::SwissTargetPrediction),
                PredictedTarget::new("akt1", 0.7, TargetSource::SwissTargetPrediction),
                PredictedTarget::new("MTOR", 0.6, TargetSource::SwissTargetPrediction),
                PredictedTarget::new("TP53", 0.1, TargetSource::SwissTargetPrediction),
                PredictedTarget::new("EGFR", 95.0, TargetSource::SuperPred),
                PredictedTarget::new("PIK3CA", 40.0, TargetSource::SuperPred),
                PredictedTarget::new("MAPK1", 60.0, TargetSource::SuperPred),
            ],
            ..MockTargets::default()
        };

        let pathways = MockPathways::default()
            .with_hits(
                "immune system",
                &[
                    ("R-HSA-168256", "Immune System"),
                    ("R-HSA-1280218", "Adaptive Immune System"),
                ],
            )
            .with_members(
                "R-HSA-168256",
                &[
                    ("EGFR", "P00533"),
                    ("SRC", "P12931"),
                    ("GRB2", "P62993"),
                    ("AKT1", "P31749"),
                ],
            )
            .with_members(
                "R-HSA-1280218",
                &[
                    ("AKT1", "P31749"),
                    ("MTOR", "P42345"),
                    ("MAPK1", "P28482"),
                    ("LCK", "P06239"),
                ],
            );

        let interactions = MockInteractions::from_rows(&[
            ("EGFR", "SRC", "950"),
            ("EGFR", "AKT1", "900"),
            ("SRC", "AKT1", "850"),
            ("AKT1", "MTOR", "990"),
            ("MTOR", "MAPK1", "720"),
            ("EGFR", "MAPK1", "800"),
            ("9606.SRC", "9606.MAPK1", "780"),
            ("AKT1", "AKT1", "999"),
            ("EGFR", "MTOR", "n/a"),
        ]);

        let enrichment = MockEnrichment {
            terms: vec![
                term("GO:BP", "GO:0007169", 0.001),
                term("KEGG", "KEGG:04151", 0.01),
                term("GO:BP", "GO:0008150", 0.2),
            ],
            ..MockEnrichment::default()
        };

        Self {
            compounds: MockCompounds::default(),
            targets,
            pathways,
            interactions,
            enrichment,
        }
    }

    pub fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            compounds: &self.compounds,
            targets: &self.targets,
            pathways: &self.pathways,
            interactions: &self.interactions,
            enrichment: &self.enrichment,
        }
    }
}

/// Retry timing that never sleeps.
pub fn instant_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        base_delay: Duration::ZERO,
        request_delay: Duration::ZERO,
    }
}

pub fn config_builder() -> PipelineConfigBuilder {
    PipelineConfigBuilder::new()
        .search_terms(["immune system", "R-HSA-1280218"])
        .retry(instant_retry(2))
}

pub fn config() -> PipelineConfig {
    config_builder().build().unwrap()
}
