use crate::core::graph::hubs::DEFAULT_HUB_COUNT;
use crate::core::models::interaction::MAX_SCORE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SWISS_THRESHOLD: f64 = 0.0;
pub const DEFAULT_SUPERPRED_THRESHOLD: f64 = 0.5;
pub const DEFAULT_MAX_HITS_PER_TERM: usize = 5;
pub const DEFAULT_CONFIDENCE: f64 = 0.700;
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: f64 = 0.05;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter '{name}' is out of range: {value} (expected {expected})")]
    OutOfRange {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Unknown value '{value}' for '{name}'")]
    UnknownValue { name: &'static str, value: String },
}

/// Which genes are sent to the interaction-query collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkScope {
    /// Targets that also appear in the analyzed pathways.
    #[default]
    Overlap,
    /// Every predicted target, regardless of pathway membership.
    AllTargets,
}

impl fmt::Display for NetworkScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkScope::Overlap => f.write_str("overlap"),
            NetworkScope::AllTargets => f.write_str("all-targets"),
        }
    }
}

impl FromStr for NetworkScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overlap" => Ok(NetworkScope::Overlap),
            "all-targets" | "all_targets" | "all" => Ok(NetworkScope::AllTargets),
            _ => Err(ConfigError::UnknownValue {
                name: "network.scope",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetConfig {
    pub swiss_threshold: f64,
    pub superpred_threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathwayConfig {
    pub search_terms: Vec<String>,
    pub max_hits_per_term: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    /// Minimum interaction confidence on the 0..=1 scale.
    pub confidence: f64,
    pub scope: NetworkScope,
    pub hub_count: usize,
}

impl NetworkConfig {
    /// The confidence threshold on the collaborator's 0..=1000 scale, truncated.
    pub fn required_score(&self) -> u32 {
        (self.confidence * MAX_SCORE) as u32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentConfig {
    pub significance_threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt; a call is tried at most `max_retries + 1` times.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for every retry after that.
    pub base_delay: Duration,
    /// Fixed pause before every remote call.
    pub request_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub targets: TargetConfig,
    pub pathways: PathwayConfig,
    pub network: NetworkConfig,
    pub enrichment: EnrichmentConfig,
    pub retry: RetryConfig,
}

/// Assembles a [`PipelineConfig`].
///
/// Only the pathway search terms are required; every other parameter falls back to its
/// documented default. `build` rejects values outside their valid ranges.
#[derive(Default)]
pub struct PipelineConfigBuilder {
    swiss_threshold: Option<f64>,
    superpred_threshold: Option<f64>,
    search_terms: Option<Vec<String>>,
    max_hits_per_term: Option<usize>,
    confidence: Option<f64>,
    scope: Option<NetworkScope>,
    hub_count: Option<usize>,
    significance_threshold: Option<f64>,
    retry: Option<RetryConfig>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn swiss_threshold(mut self, threshold: f64) -> Self {
        self.swiss_threshold = Some(threshold);
        self
    }
    pub fn superpred_threshold(mut self, threshold: f64) -> Self {
        self.superpred_threshold = Some(threshold);
        self
    }
    pub fn search_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_terms = Some(terms.into_iter().map(Into::into).collect());
        self
    }
    pub fn max_hits_per_term(mut self, hits: usize) -> Self {
        self.max_hits_per_term = Some(hits);
        self
    }
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
    pub fn scope(mut self, scope: NetworkScope) -> Self {
        self.scope = Some(scope);
        self
    }
    pub fn hub_count(mut self, count: usize) -> Self {
        self.hub_count = Some(count);
        self
    }
    pub fn significance_threshold(mut self, threshold: f64) -> Self {
        self.significance_threshold = Some(threshold);
        self
    }
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let search_terms = self
            .search_terms
            .filter(|terms| terms.iter().any(|t| !t.trim().is_empty()))
            .ok_or(ConfigError::MissingParameter("search_terms"))?;

        let targets = TargetConfig {
            swiss_threshold: unit_interval(
                "targets.swiss_threshold",
                self.swiss_threshold.unwrap_or(DEFAULT_SWISS_THRESHOLD),
            )?,
            superpred_threshold: unit_interval(
                "targets.superpred_threshold",
                self.superpred_threshold
                    .unwrap_or(DEFAULT_SUPERPRED_THRESHOLD),
            )?,
        };
        let pathways = PathwayConfig {
            search_terms,
            max_hits_per_term: at_least_one(
                "pathways.max_hits_per_term",
                self.max_hits_per_term.unwrap_or(DEFAULT_MAX_HITS_PER_TERM),
            )?,
        };
        let network = NetworkConfig {
            confidence: unit_interval(
                "network.confidence",
                self.confidence.unwrap_or(DEFAULT_CONFIDENCE),
            )?,
            scope: self.scope.unwrap_or_default(),
            hub_count: at_least_one(
                "network.hub_count",
                self.hub_count.unwrap_or(DEFAULT_HUB_COUNT),
            )?,
        };
        let significance_threshold = self
            .significance_threshold
            .unwrap_or(DEFAULT_SIGNIFICANCE_THRESHOLD);
        if !(significance_threshold > 0.0 && significance_threshold <= 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "enrichment.significance_threshold",
                value: significance_threshold.to_string(),
                expected: "0 < value <= 1",
            });
        }

        Ok(PipelineConfig {
            targets,
            pathways,
            network,
            enrichment: EnrichmentConfig {
                significance_threshold,
            },
            retry: self.retry.unwrap_or_default(),
        })
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value: value.to_string(),
            expected: "0 <= value <= 1",
        })
    }
}

fn at_least_one(name: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value >= 1 {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value: value.to_string(),
            expected: "value >= 1",
        })
    }
}
