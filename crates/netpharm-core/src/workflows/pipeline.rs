use super::stages::network::NetworkAnalysis;
use super::stages::pathways::PathwayAnalysis;
use super::stages::targets::TargetPrediction;
use super::stages::{StageFailure, compound, enrichment, network, pathways, targets};
use crate::core::models::compound::{Compound, CompoundQuery};
use crate::core::models::enrichment::EnrichmentResult;
use crate::engine::collaborators::Collaborators;
use crate::engine::config::PipelineConfig;
use crate::engine::context::StageContext;
use crate::engine::error::PipelineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::retry::RetryPolicy;
use crate::engine::state::{
    ItemTally, PipelineState, RunReport, Stage, StageOutcome, StageStatus,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// A single pipeline run for one compound.
///
/// Stages can be driven one at a time or all at once with [`Pipeline::run_to_completion`].
/// Each stage method checks that the state it depends on has been reached and returns
/// [`PipelineError::OutOfOrder`] otherwise. Running a stage again discards the results of
/// every later stage.
pub struct Pipeline<'a> {
    query: CompoundQuery,
    config: PipelineConfig,
    collaborators: Collaborators<'a>,
    reporter: ProgressReporter<'a>,
    retry: RetryPolicy,

    state: PipelineState,
    compound: Option<Compound>,
    targets: Option<TargetPrediction>,
    pathways: Option<PathwayAnalysis>,
    network: Option<NetworkAnalysis>,
    enrichment: Option<EnrichmentResult>,
    outcomes: BTreeMap<Stage, StageOutcome>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        query: CompoundQuery,
        config: PipelineConfig,
        collaborators: Collaborators<'a>,
    ) -> Self {
        let retry = RetryPolicy::new(&config.retry);
        Self {
            query,
            config,
            collaborators,
            reporter: ProgressReporter::new(),
            retry,
            state: PipelineState::Init,
            compound: None,
            targets: None,
            pathways: None,
            network: None,
            enrichment: None,
            outcomes: BTreeMap::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: ProgressReporter<'a>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }
    pub fn query(&self) -> &CompoundQuery {
        &self.query
    }
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
    pub fn compound(&self) -> Option<&Compound> {
        self.compound.as_ref()
    }
    pub fn targets(&self) -> Option<&TargetPrediction> {
        self.targets.as_ref()
    }
    pub fn pathways(&self) -> Option<&PathwayAnalysis> {
        self.pathways.as_ref()
    }
    pub fn network(&self) -> Option<&NetworkAnalysis> {
        self.network.as_ref()
    }
    pub fn enrichment(&self) -> Option<&EnrichmentResult> {
        self.enrichment.as_ref()
    }

    pub fn retrieve_compound(&mut self) -> Result<&Compound, PipelineError> {
        self.begin(Stage::Compound)?;
        let result = compound::run(&self.query, self.collaborators.compounds, &self.context());
        let found = result.map_err(|e| self.fail(Stage::Compound, e.into()))?;

        let detail = match (&found.cid, &found.molecular_formula) {
            (Some(cid), Some(formula)) => format!("CID {} ({})", cid, formula),
            (Some(cid), None) => format!("CID {}", cid),
            (None, _) => format!("SMILES {}", found.canonical_smiles),
        };
        self.complete(Stage::Compound, ItemTally::single_success(), detail);
        Ok(&*self.compound.insert(found))
    }

    pub fn predict_targets(&mut self) -> Result<&TargetPrediction, PipelineError> {
        self.begin(Stage::Targets)?;
        let compound = self
            .compound
            .as_ref()
            .ok_or_else(|| self.out_of_order(Stage::Targets))?;
        let result = targets::run(compound, self.collaborators.targets, &self.context());
        let prediction = result.map_err(|e| self.fail(Stage::Targets, e.into()))?;

        let summary = &prediction.summary;
        let detail = format!(
            "{} unique target(s): {} SwissTargetPrediction, {} SuperPred, {} from both",
            summary.total_unique,
            summary.swiss_count,
            summary.superpred_count,
            summary.predicted_by_both
        );
        self.complete(Stage::Targets, ItemTally::single_success(), detail);
        Ok(&*self.targets.insert(prediction))
    }

    pub fn analyze_pathways(&mut self) -> Result<&PathwayAnalysis, PipelineError> {
        self.begin(Stage::Pathways)?;
        let prediction = self
            .targets
            .as_ref()
            .ok_or_else(|| self.out_of_order(Stage::Pathways))?;
        let result = pathways::run(
            &prediction.targets,
            self.collaborators.pathways,
            &self.context(),
        );
        let analysis = result.map_err(|failure| self.fail(Stage::Pathways, failure))?;

        let detail = format!(
            "{} pathway(s), {} protein(s), {} overlapping target(s)",
            analysis.pathways.len(),
            analysis.proteins.len(),
            analysis.overlap.len()
        );
        self.complete(Stage::Pathways, analysis.tally(), detail);
        Ok(&*self.pathways.insert(analysis))
    }

    pub fn build_network(&mut self) -> Result<&NetworkAnalysis, PipelineError> {
        self.begin(Stage::Network)?;
        let (prediction, pathway_analysis) = self
            .targets
            .as_ref()
            .zip(self.pathways.as_ref())
            .ok_or_else(|| self.out_of_order(Stage::Network))?;
        let result = network::run(
            &prediction.targets,
            &pathway_analysis.overlap,
            self.collaborators.interactions,
            &self.context(),
        );
        let analysis = result.map_err(|e| self.fail(Stage::Network, e.into()))?;

        let display = match &analysis.display {
            Some(subgraph) => format!(
                "display {} node(s), {} edge(s)",
                subgraph.node_count(),
                subgraph.edge_count()
            ),
            None => "no display subgraph".to_string(),
        };
        let detail = format!(
            "{} node(s), {} edge(s), {} row(s) dropped; {}",
            analysis.graph.node_count(),
            analysis.graph.edge_count(),
            analysis.build.rows_dropped,
            display
        );
        self.complete(Stage::Network, ItemTally::single_success(), detail);
        Ok(&*self.network.insert(analysis))
    }

    pub fn run_enrichment(&mut self) -> Result<&EnrichmentResult, PipelineError> {
        self.begin(Stage::Enrichment)?;
        let pathway_analysis = self
            .pathways
            .as_ref()
            .ok_or_else(|| self.out_of_order(Stage::Enrichment))?;
        let outcome = enrichment::run(
            &pathway_analysis.overlap,
            self.collaborators.enrichment,
            &self.context(),
        );
        let result = outcome.map_err(|e| self.fail(Stage::Enrichment, e.into()))?;

        let detail = format!(
            "{} significant of {} term(s) returned",
            result.terms.len(),
            result.terms_returned
        );
        self.complete(Stage::Enrichment, ItemTally::single_success(), detail);
        Ok(&*self.enrichment.insert(result))
    }

    /// Runs a single stage by name, discarding its output reference.
    pub fn run_stage(&mut self, stage: Stage) -> Result<(), PipelineError> {
        match stage {
            Stage::Compound => self.retrieve_compound().map(|_| ()),
            Stage::Targets => self.predict_targets().map(|_| ()),
            Stage::Pathways => self.analyze_pathways().map(|_| ()),
            Stage::Network => self.build_network().map(|_| ()),
            Stage::Enrichment => self.run_enrichment().map(|_| ()),
        }
    }

    /// Runs every stage not yet completed, in order, and marks the run complete.
    ///
    /// The first fatal error aborts the run; stages completed before it keep their
    /// results and can be inspected through the accessors.
    #[instrument(skip_all, name = "pipeline", fields(compound = %self.query))]
    pub fn run_to_completion(&mut self) -> Result<RunReport, PipelineError> {
        for stage in Stage::ALL {
            if stage.produces() > self.state {
                self.run_stage(stage)?;
            }
        }
        self.state = PipelineState::Complete;
        let report = self.report();
        info!(failures = report.total_failures(), "Pipeline complete.");
        Ok(report)
    }

    /// Summary of the stages run so far, including a failed one.
    pub fn report(&self) -> RunReport {
        RunReport {
            compound: self.query.label(),
            state: self.state,
            outcomes: self.outcomes.values().cloned().collect(),
        }
    }

    fn context(&self) -> StageContext<'_> {
        StageContext::new(&self.config, &self.reporter, &self.retry)
    }

    fn out_of_order(&self, stage: Stage) -> PipelineError {
        PipelineError::OutOfOrder {
            stage,
            requires: stage.requires(),
            current: self.state,
        }
    }

    /// Checks the stage's precondition and rewinds any later results.
    fn begin(&mut self, stage: Stage) -> Result<(), PipelineError> {
        if self.state < stage.requires() {
            return Err(self.out_of_order(stage));
        }
        if self.state > stage.requires() {
            debug!(%stage, from = %self.state, "Re-running stage; discarding downstream results.");
            self.discard_from(stage);
        }
        self.state = stage.requires();
        Ok(())
    }

    fn discard_from(&mut self, stage: Stage) {
        if stage <= Stage::Compound {
            self.compound = None;
        }
        if stage <= Stage::Targets {
            self.targets = None;
        }
        if stage <= Stage::Pathways {
            self.pathways = None;
        }
        if stage <= Stage::Network {
            self.network = None;
        }
        self.enrichment = None;
        self.outcomes.retain(|&done, _| done < stage);
    }

    fn complete(&mut self, stage: Stage, tally: ItemTally, detail: String) {
        info!(%stage, %tally, "{}", detail);
        self.outcomes.insert(
            stage,
            StageOutcome {
                stage,
                status: StageStatus::Completed,
                tally,
                detail,
            },
        );
        self.state = stage.produces();
    }

    /// Records a fatal stage error in the report and closes the stage's progress phase.
    /// The state stays at the stage's requirement so the stage can be run again.
    fn fail(&mut self, stage: Stage, failure: StageFailure) -> PipelineError {
        let StageFailure { error, tally } = failure;
        warn!(%stage, %tally, %error, "Stage failed.");
        self.reporter.report(Progress::StageSummary { stage, tally });
        self.reporter.report(Progress::PhaseFinish);
        self.outcomes.insert(
            stage,
            StageOutcome {
                stage,
                status: StageStatus::Failed,
                tally,
                detail: error.to_string(),
            },
        );
        error
    }
}
