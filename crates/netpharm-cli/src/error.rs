use netpharm::core::graph::error::GraphError;
use netpharm::engine::error::PipelineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("{path}: {source}", path = path.display())]
    Graph {
        path: PathBuf,
        #[source]
        source: GraphError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Operator-facing suggestions; only pipeline and graph failures carry any.
    pub fn remediation(&self) -> Vec<&'static str> {
        match self {
            CliError::Pipeline(err) => err.remediation(),
            CliError::Graph { source, .. } => source.remediation(),
            _ => Vec::new(),
        }
    }
}
