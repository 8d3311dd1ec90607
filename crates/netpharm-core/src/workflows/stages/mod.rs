//! The five pipeline stages as plain functions.
//!
//! Each stage takes the records it depends on plus a [`StageContext`] and returns a new
//! record; none of them hold state between calls. The [`Pipeline`] decides when each
//! may run.
//!
//! [`StageContext`]: crate::engine::context::StageContext
//! [`Pipeline`]: super::pipeline::Pipeline

pub mod compound;
pub mod enrichment;
pub mod network;
pub mod pathways;
pub mod targets;

use crate::engine::error::{PipelineError, RemoteError};
use crate::engine::state::{ItemTally, Stage};

/// A fatal stage error with the per-item tally gathered before the stage gave up.
#[derive(Debug)]
pub struct StageFailure {
    pub error: PipelineError,
    pub tally: ItemTally,
}

impl StageFailure {
    pub fn new(error: PipelineError, tally: ItemTally) -> Self {
        Self { error, tally }
    }
}

impl From<PipelineError> for StageFailure {
    /// Tally for stages built around one remote call: a remote error is that call
    /// failing, anything else came after a call that answered.
    fn from(error: PipelineError) -> Self {
        let tally = match error {
            PipelineError::Remote { .. } => ItemTally::single_failure(),
            _ => ItemTally::single_success(),
        };
        Self { error, tally }
    }
}

pub(crate) fn remote_failure(stage: Stage) -> impl Fn(RemoteError) -> PipelineError {
    move |source| PipelineError::Remote { stage, source }
}
