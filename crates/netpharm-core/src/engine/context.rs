use super::config::PipelineConfig;
use super::progress::ProgressReporter;
use super::retry::RetryPolicy;

/// Read-only state shared by every stage of a run.
#[derive(Clone, Copy)]
pub struct StageContext<'a> {
    pub config: &'a PipelineConfig,
    pub reporter: &'a ProgressReporter<'a>,
    pub retry: &'a RetryPolicy,
}

impl<'a> StageContext<'a> {
    pub fn new(
        config: &'a PipelineConfig,
        reporter: &'a ProgressReporter<'a>,
        retry: &'a RetryPolicy,
    ) -> Self {
        Self {
            config,
            reporter,
            retry,
        }
    }
}
