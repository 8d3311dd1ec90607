use super::remote_failure;
use crate::core::models::compound::Compound;
use crate::core::models::targets::{TargetSet, TargetSummary};
use crate::engine::collaborators::TargetPredictor;
use crate::engine::context::StageContext;
use crate::engine::error::{EmptyReason, PipelineError};
use crate::engine::progress::Progress;
use crate::engine::state::{ItemTally, Stage};
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetPrediction {
    pub targets: TargetSet,
    pub summary: TargetSummary,
}

/// Predicts targets and merges every source into one [`TargetSet`].
#[instrument(skip_all, name = "targets_stage")]
pub fn run(
    compound: &Compound,
    predictor: &dyn TargetPredictor,
    ctx: &StageContext,
) -> Result<TargetPrediction, PipelineError> {
    ctx.reporter.report(Progress::PhaseStart {
        name: Stage::Targets.name(),
    });

    let predictions = ctx
        .retry
        .fetch("target prediction", || predictor.predict(compound))
        .map_err(remote_failure(Stage::Targets))?;

    let thresholds = &ctx.config.targets;
    let (targets, summary) = TargetSet::from_predictions(
        &predictions,
        thresholds.swiss_threshold,
        thresholds.superpred_threshold,
    );
    info!(
        rows = predictions.len(),
        swiss = summary.swiss_count,
        superpred = summary.superpred_count,
        both = summary.predicted_by_both,
        unique = summary.total_unique,
        "Targets predicted."
    );

    if targets.is_empty() {
        return Err(PipelineError::EmptyResult {
            stage: Stage::Targets,
            reason: EmptyReason::NoTargets,
        });
    }

    ctx.reporter.report(Progress::StageSummary {
        stage: Stage::Targets,
        tally: ItemTally::single_success(),
    });
    ctx.reporter.report(Progress::PhaseFinish);
    Ok(TargetPrediction { targets, summary })
}
