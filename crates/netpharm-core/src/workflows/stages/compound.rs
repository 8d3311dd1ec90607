use super::remote_failure;
use crate::core::models::compound::{Compound, CompoundQuery};
use crate::engine::collaborators::CompoundSource;
use crate::engine::context::StageContext;
use crate::engine::error::PipelineError;
use crate::engine::progress::Progress;
use crate::engine::state::Stage;
use tracing::{info, instrument};

/// Looks the compound up in the chemical database.
#[instrument(skip_all, name = "compound_stage", fields(compound = %query))]
pub fn run(
    query: &CompoundQuery,
    database: &dyn CompoundSource,
    ctx: &StageContext,
) -> Result<Compound, PipelineError> {
    ctx.reporter.report(Progress::PhaseStart {
        name: Stage::Compound.name(),
    });

    let compound = ctx
        .retry
        .fetch(&query.label(), || database.lookup(query))
        .map_err(remote_failure(Stage::Compound))?;

    info!(
        cid = ?compound.cid,
        formula = compound.molecular_formula.as_deref().unwrap_or("-"),
        smiles = %compound.canonical_smiles,
        "Compound retrieved."
    );
    ctx.reporter.report(Progress::PhaseFinish);
    Ok(compound)
}
