use serde::Serialize;
use std::fmt;

/// The five pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Compound,
    Targets,
    Pathways,
    Network,
    Enrichment,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Compound,
        Stage::Targets,
        Stage::Pathways,
        Stage::Network,
        Stage::Enrichment,
    ];

    /// Human-readable phase name used in progress output.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Compound => "Compound Retrieval",
            Stage::Targets => "Target Prediction",
            Stage::Pathways => "Pathway Analysis",
            Stage::Network => "Network Construction",
            Stage::Enrichment => "Functional Enrichment",
        }
    }

    /// The state the pipeline must have reached before this stage may run.
    pub fn requires(self) -> PipelineState {
        match self {
            Stage::Compound => PipelineState::Init,
            Stage::Targets => PipelineState::CompoundRetrieved,
            Stage::Pathways => PipelineState::TargetsPredicted,
            Stage::Network => PipelineState::PathwaysAnalyzed,
            Stage::Enrichment => PipelineState::NetworkBuilt,
        }
    }

    /// The state the pipeline moves to when this stage succeeds.
    pub fn produces(self) -> PipelineState {
        match self {
            Stage::Compound => PipelineState::CompoundRetrieved,
            Stage::Targets => PipelineState::TargetsPredicted,
            Stage::Pathways => PipelineState::PathwaysAnalyzed,
            Stage::Network => PipelineState::NetworkBuilt,
            Stage::Enrichment => PipelineState::EnrichmentDone,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress of a pipeline run. Ordering follows the run: a later state implies every
/// earlier stage's output is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum PipelineState {
    #[default]
    Init,
    CompoundRetrieved,
    TargetsPredicted,
    PathwaysAnalyzed,
    NetworkBuilt,
    EnrichmentDone,
    Complete,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Init => "Init",
            PipelineState::CompoundRetrieved => "CompoundRetrieved",
            PipelineState::TargetsPredicted => "TargetsPredicted",
            PipelineState::PathwaysAnalyzed => "PathwaysAnalyzed",
            PipelineState::NetworkBuilt => "NetworkBuilt",
            PipelineState::EnrichmentDone => "EnrichmentDone",
            PipelineState::Complete => "Complete",
        };
        f.write_str(name)
    }
}

/// Per-item bookkeeping for the remote calls a stage issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ItemTally {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl ItemTally {
    pub fn single_success() -> Self {
        Self {
            attempted: 1,
            succeeded: 1,
            failed: 0,
        }
    }

    pub fn single_failure() -> Self {
        Self {
            attempted: 1,
            succeeded: 0,
            failed: 1,
        }
    }

    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self) {
        self.attempted += 1;
        self.failed += 1;
    }

    pub fn nothing_succeeded(&self) -> bool {
        self.succeeded == 0
    }

    pub fn merge(self, other: ItemTally) -> Self {
        Self {
            attempted: self.attempted + other.attempted,
            succeeded: self.succeeded + other.succeeded,
            failed: self.failed + other.failed,
        }
    }
}

impl fmt::Display for ItemTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} succeeded, {} failed",
            self.succeeded, self.attempted, self.failed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Completed,
    Failed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::Completed => f.write_str("ok"),
            StageStatus::Failed => f.write_str("FAILED"),
        }
    }
}

/// What a finished stage reports for the operator summary. A failed stage keeps the
/// tally gathered before it gave up and the error text as its detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    pub stage: Stage,
    pub status: StageStatus,
    pub tally: ItemTally,
    pub detail: String,
}

/// Summary of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub compound: String,
    pub state: PipelineState,
    pub outcomes: Vec<StageOutcome>,
}

impl RunReport {
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.outcomes.iter().find(|outcome| outcome.stage == stage)
    }

    pub fn total_failures(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.tally.failed).sum()
    }

    pub fn failed_stage(&self) -> Option<&StageOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.status == StageStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_chain_requirements_to_products() {
        let mut state = PipelineState::Init;
        for stage in Stage::ALL {
            assert_eq!(stage.requires(), state);
            assert!(stage.produces() > state);
            state = stage.produces();
        }
        assert_eq!(state, PipelineState::EnrichmentDone);
        assert!(PipelineState::Complete > state);
    }

    #[test]
    fn tally_tracks_successes_and_failures() {
        let mut tally = ItemTally::default();
        assert!(tally.nothing_succeeded());
        tally.record_failure();
        tally.record_failure();
        assert!(tally.nothing_succeeded());
        tally.record_success();
        assert!(!tally.nothing_succeeded());
        assert_eq!(tally.to_string(), "1/3 succeeded, 2 failed");

        let merged = tally.merge(ItemTally::single_success());
        assert_eq!(
            merged,
            ItemTally {
                attempted: 4,
                succeeded: 2,
                failed: 2
            }
        );
    }
}
