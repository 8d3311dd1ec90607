use thiserror::Error;

use super::config::ConfigError;
use super::state::{PipelineState, Stage};
use crate::core::models::validation::ValidationError;

/// Failure of a single call to an external collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection refused, timeout, service unavailable. Worth retrying.
    #[error("transient failure: {0}")]
    Transient(String),
    /// Malformed response, client error. Retrying cannot help.
    #[error("permanent failure: {0}")]
    Permanent(String),
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

/// Outcome of a remote call after the retry policy has given up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("gave up after {attempts} attempt(s): {message}")]
    Transient { attempts: u32, message: String },

    #[error("request rejected: {message}")]
    Permanent { message: String },
}

/// Why a stage produced nothing the rest of the run can use.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmptyReason {
    #[error("no targets passed the probability thresholds")]
    NoTargets,

    #[error("no pathways found for any search term")]
    NoPathways,

    #[error("no proteins extracted from {pathways} pathway(s)")]
    NoPathwayProteins { pathways: usize },

    #[error("none of the {targets} predicted target(s) participate in the analyzed pathways")]
    NoOverlap { targets: usize },

    #[error(
        "no interactions found at score >= {required_score} ({rows_seen} row(s) received, {rows_dropped} dropped)"
    )]
    NoInteractions {
        required_score: u32,
        rows_seen: usize,
        rows_dropped: usize,
    },

    #[error("no term reached adjusted p <= {threshold} ({terms_returned} term(s) returned)")]
    NoEnrichment {
        threshold: f64,
        terms_returned: usize,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} produced no usable output: {reason}")]
    EmptyResult { stage: Stage, reason: EmptyReason },

    #[error("{stage} invoked out of order: requires {requires}, pipeline is at {current}")]
    OutOfOrder {
        stage: Stage,
        requires: PipelineState,
        current: PipelineState,
    },

    #[error("{stage} failed: {source}")]
    Remote {
        stage: Stage,
        #[source]
        source: RemoteError,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

impl PipelineError {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::EmptyResult { stage, .. }
            | PipelineError::OutOfOrder { stage, .. }
            | PipelineError::Remote { stage, .. } => Some(*stage),
            PipelineError::Config(_) | PipelineError::Validation(_) => None,
        }
    }

    /// Suggestions an operator can act on. Contract violations have none.
    pub fn remediation(&self) -> Vec<&'static str> {
        match self {
            PipelineError::EmptyResult { reason, .. } => match reason {
                EmptyReason::NoTargets => vec![
                    "Lower the target probability thresholds (targets.swiss-threshold, targets.superpred-threshold)",
                    "Check that the compound identifier or SMILES is correct",
                ],
                EmptyReason::NoPathways => vec![
                    "Try broader keywords (e.g. 'immune system', 'signaling')",
                    "Use specific pathway IDs (e.g. R-HSA-1280218)",
                ],
                EmptyReason::NoPathwayProteins { .. } => vec![
                    "Check that the pathway service is reachable and retry later",
                    "Use different pathway IDs",
                ],
                EmptyReason::NoOverlap { .. } => vec![
                    "The compound may not target these pathways; try different pathways",
                    "Check gene name formats in the target predictions",
                    "Use network.scope = \"all-targets\" to build the network from every target",
                ],
                EmptyReason::NoInteractions { .. } => vec![
                    "Lower the network confidence threshold (e.g. 0.4)",
                    "Check that the gene names are correct",
                    "Try with more genes (network.scope = \"all-targets\")",
                ],
                EmptyReason::NoEnrichment { .. } => vec![
                    "The gene list may be too small for significant enrichment",
                    "Raise enrichment.significance-threshold",
                    "Check that gene names are recognized by the enrichment service",
                ],
            },
            PipelineError::Remote { source, .. } => match source {
                RemoteError::Transient { .. } => vec![
                    "The service appears unavailable; check connectivity and retry later",
                    "Increase retry.max-retries or retry.base-delay-ms",
                ],
                RemoteError::Permanent { .. } => {
                    vec!["The service rejected the request; check the input identifiers"]
                }
            },
            PipelineError::Config(_) => vec!["Review the configuration file and overrides"],
            PipelineError::Validation(_) => vec!["Correct the compound or pathway identifier"],
            PipelineError::OutOfOrder { .. } => vec![],
        }
    }
}
