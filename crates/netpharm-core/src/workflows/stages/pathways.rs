use super::StageFailure;
use crate::core::models::pathways::{
    OverlapSet, PathwayOrigin, PathwayProteinSet, PathwayRef,
};
use crate::core::models::targets::TargetSet;
use crate::core::models::validation::validate_pathway_id;
use crate::engine::collaborators::PathwaySource;
use crate::engine::context::StageContext;
use crate::engine::error::{EmptyReason, PipelineError};
use crate::engine::progress::Progress;
use crate::engine::state::{ItemTally, Stage};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

const DIRECT_ID_PREFIX: &str = "R-";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathwayAnalysis {
    pub pathways: Vec<PathwayRef>,
    pub proteins: PathwayProteinSet,
    pub overlap: OverlapSet,
    /// One item per search term.
    pub search: ItemTally,
    /// One item per selected pathway.
    pub extraction: ItemTally,
}

impl PathwayAnalysis {
    pub fn tally(&self) -> ItemTally {
        self.search.merge(self.extraction)
    }
}

/// Selects pathways, extracts their proteins, and intersects them with the targets.
///
/// Failures for individual search terms or pathways are logged and skipped. The stage
/// fails only when a step leaves nothing to continue with; the failure carries the
/// tally of every term and pathway tried so far.
#[instrument(skip_all, name = "pathways_stage")]
pub fn run(
    targets: &TargetSet,
    source: &dyn PathwaySource,
    ctx: &StageContext,
) -> Result<PathwayAnalysis, StageFailure> {
    let empty = |reason, tally| {
        StageFailure::new(
            PipelineError::EmptyResult {
                stage: Stage::Pathways,
                reason,
            },
            tally,
        )
    };
    ctx.reporter.report(Progress::PhaseStart {
        name: Stage::Pathways.name(),
    });

    let (pathways, search) = search_pathways(source, ctx);
    if pathways.is_empty() {
        return Err(empty(EmptyReason::NoPathways, search));
    }

    let (proteins, extraction) = extract_proteins(&pathways, source, ctx);
    if proteins.is_empty() {
        let reason = EmptyReason::NoPathwayProteins {
            pathways: pathways.len(),
        };
        return Err(empty(reason, search.merge(extraction)));
    }

    let overlap = OverlapSet::intersect(targets, &proteins);
    info!(
        pathways = pathways.len(),
        proteins = proteins.len(),
        targets = targets.len(),
        overlap = overlap.len(),
        "Pathway overlap computed."
    );
    if overlap.is_empty() {
        let reason = EmptyReason::NoOverlap {
            targets: targets.len(),
        };
        return Err(empty(reason, search.merge(extraction)));
    }

    let analysis = PathwayAnalysis {
        pathways,
        proteins,
        overlap,
        search,
        extraction,
    };
    ctx.reporter.report(Progress::StageSummary {
        stage: Stage::Pathways,
        tally: analysis.tally(),
    });
    ctx.reporter.report(Progress::PhaseFinish);
    Ok(analysis)
}

/// Resolves the configured search terms to a deduplicated pathway list.
///
/// Terms starting with `R-` are taken as pathway IDs; anything else is a keyword whose
/// first `max_hits_per_term` hits are kept. The first occurrence of a pathway wins.
pub fn search_pathways(
    source: &dyn PathwaySource,
    ctx: &StageContext,
) -> (Vec<PathwayRef>, ItemTally) {
    let terms: Vec<&str> = ctx
        .config
        .pathways
        .search_terms
        .iter()
        .map(|term| term.trim())
        .filter(|term| !term.is_empty())
        .collect();
    let max_hits = ctx.config.pathways.max_hits_per_term;

    let mut selected: IndexMap<String, PathwayRef> = IndexMap::new();
    let mut tally = ItemTally::default();
    ctx.reporter.report(Progress::TaskStart {
        total_steps: terms.len() as u64,
    });

    for term in terms {
        let outcome = if term.starts_with(DIRECT_ID_PREFIX) {
            validate_pathway_id(term)
                .map(|id| vec![PathwayRef::direct(id)])
                .map_err(|err| err.to_string())
        } else {
            ctx.retry
                .fetch(term, || source.search(term))
                .map_err(|err| err.to_string())
                .and_then(|hits| {
                    if hits.is_empty() {
                        Err("no pathways found".to_string())
                    } else {
                        Ok(hits
                            .into_iter()
                            .take(max_hits)
                            .map(|hit| PathwayRef {
                                id: hit.id,
                                name: hit.name,
                                origin: PathwayOrigin::Keyword(term.to_string()),
                            })
                            .collect())
                    }
                })
        };

        match outcome {
            Ok(found) => {
                debug!(term, found = found.len(), "Search term resolved.");
                tally.record_success();
                for pathway in found {
                    selected.entry(pathway.id.clone()).or_insert(pathway);
                }
            }
            Err(reason) => {
                warn!(term, %reason, "Skipping search term.");
                tally.record_failure();
                ctx.reporter.report(Progress::ItemSkipped {
                    item: term.to_string(),
                    reason,
                });
            }
        }
        ctx.reporter.report(Progress::TaskIncrement);
    }

    ctx.reporter.report(Progress::TaskFinish);
    (selected.into_values().collect(), tally)
}

/// Fetches the participants of every pathway, dropping duplicate (symbol, pathway) pairs.
pub fn extract_proteins(
    pathways: &[PathwayRef],
    source: &dyn PathwaySource,
    ctx: &StageContext,
) -> (PathwayProteinSet, ItemTally) {
    let mut proteins = PathwayProteinSet::new();
    let mut tally = ItemTally::default();
    ctx.reporter.report(Progress::TaskStart {
        total_steps: pathways.len() as u64,
    });

    for pathway in pathways {
        match ctx
            .retry
            .fetch(&pathway.id, || source.participants(&pathway.id))
        {
            Ok(participants) => {
                let added = participants
                    .iter()
                    .filter(|participant| proteins.insert(participant, &pathway.id))
                    .count();
                debug!(
                    pathway = %pathway.id,
                    participants = participants.len(),
                    added,
                    "Pathway proteins extracted."
                );
                tally.record_success();
            }
            Err(err) => {
                warn!(pathway = %pathway.id, error = %err, "Skipping pathway.");
                tally.record_failure();
                ctx.reporter.report(Progress::ItemSkipped {
                    item: pathway.id.clone(),
                    reason: err.to_string(),
                });
            }
        }
        ctx.reporter.report(Progress::TaskIncrement);
    }

    ctx.reporter.report(Progress::TaskFinish);
    (proteins, tally)
}
