use super::remote_failure;
use crate::core::models::enrichment::EnrichmentResult;
use crate::core::models::pathways::OverlapSet;
use crate::core::models::symbol::Symbol;
use crate::engine::collaborators::EnrichmentSource;
use crate::engine::context::StageContext;
use crate::engine::error::{EmptyReason, PipelineError};
use crate::engine::progress::Progress;
use crate::engine::state::{ItemTally, Stage};
use tracing::{info, instrument};

/// Runs functional enrichment over the overlap genes and keeps the significant terms.
#[instrument(skip_all, name = "enrichment_stage")]
pub fn run(
    overlap: &OverlapSet,
    source: &dyn EnrichmentSource,
    ctx: &StageContext,
) -> Result<EnrichmentResult, PipelineError> {
    ctx.reporter.report(Progress::PhaseStart {
        name: Stage::Enrichment.name(),
    });

    let threshold = ctx.config.enrichment.significance_threshold;
    let genes: Vec<Symbol> = overlap.symbols().cloned().collect();
    let terms = ctx
        .retry
        .fetch("functional enrichment", || source.enrich(&genes))
        .map_err(remote_failure(Stage::Enrichment))?;

    let result = EnrichmentResult::select_significant(terms, threshold, genes.len());
    info!(
        genes = genes.len(),
        returned = result.terms_returned,
        significant = result.terms.len(),
        threshold,
        "Enrichment complete."
    );
    if result.is_empty() {
        return Err(PipelineError::EmptyResult {
            stage: Stage::Enrichment,
            reason: EmptyReason::NoEnrichment {
                threshold,
                terms_returned: result.terms_returned,
            },
        });
    }

    ctx.reporter.report(Progress::StageSummary {
        stage: Stage::Enrichment,
        tally: ItemTally::single_success(),
    });
    ctx.reporter.report(Progress::PhaseFinish);
    Ok(result)
}
