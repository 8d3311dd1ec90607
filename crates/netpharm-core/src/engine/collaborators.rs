//! Interfaces to the external services the pipeline consults.
//!
//! Every method performs at most one remote call and classifies its own failures as
//! [`FetchError::Transient`] or [`FetchError::Permanent`]; retrying is left to the
//! [`RetryPolicy`](super::retry::RetryPolicy).

use super::error::FetchError;
use crate::core::models::compound::{Compound, CompoundQuery};
use crate::core::models::enrichment::EnrichmentTerm;
use crate::core::models::interaction::RawInteraction;
use crate::core::models::pathways::{PathwayHit, PathwayParticipant};
use crate::core::models::symbol::Symbol;
use crate::core::models::targets::PredictedTarget;

/// Chemical database lookup.
pub trait CompoundSource {
    fn lookup(&self, query: &CompoundQuery) -> Result<Compound, FetchError>;
}

/// Target prediction services. Rows from every service are returned together, each
/// tagged with its source.
pub trait TargetPredictor {
    fn predict(&self, compound: &Compound) -> Result<Vec<PredictedTarget>, FetchError>;
}

/// Pathway knowledge base.
pub trait PathwaySource {
    /// Keyword search, best matches first.
    fn search(&self, keyword: &str) -> Result<Vec<PathwayHit>, FetchError>;

    /// Proteins participating in a pathway.
    fn participants(&self, pathway_id: &str) -> Result<Vec<PathwayParticipant>, FetchError>;
}

/// Protein-protein interaction database.
pub trait InteractionSource {
    /// Interactions among `genes` with a combined score of at least `required_score`
    /// on the 0..=1000 scale.
    fn query(
        &self,
        genes: &[Symbol],
        required_score: u32,
    ) -> Result<Vec<RawInteraction>, FetchError>;
}

/// Functional enrichment service.
pub trait EnrichmentSource {
    fn enrich(&self, genes: &[Symbol]) -> Result<Vec<EnrichmentTerm>, FetchError>;
}

/// The full set of collaborators a pipeline run talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub compounds: &'a dyn CompoundSource,
    pub targets: &'a dyn TargetPredictor,
    pub pathways: &'a dyn PathwaySource,
    pub interactions: &'a dyn InteractionSource,
    pub enrichment: &'a dyn EnrichmentSource,
}
