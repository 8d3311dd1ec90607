use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use netpharm::core::models::compound::CompoundQuery;
use netpharm::engine::config::{self as core_config, NetworkScope, RetryConfig};
use serde::Deserialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialCompoundConfig {
    cid: Option<u64>,
    smiles: Option<String>,
    formula: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialDataConfig {
    swiss_targets: Option<PathBuf>,
    superpred_targets: Option<PathBuf>,
    pathways: Option<PathBuf>,
    interactions: Option<PathBuf>,
    enrichment: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialTargetConfig {
    swiss_threshold: Option<f64>,
    superpred_threshold: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialPathwayConfig {
    search_terms: Option<Vec<String>>,
    max_hits_per_term: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialNetworkConfig {
    confidence: Option<f64>,
    scope: Option<NetworkScope>,
    hub_count: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialEnrichmentConfig {
    significance_threshold: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialRetryConfig {
    max_retries: Option<u32>,
    base_delay_ms: Option<u64>,
    request_delay_ms: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialRunConfig {
    compound: Option<PartialCompoundConfig>,
    data: Option<PartialDataConfig>,
    targets: Option<PartialTargetConfig>,
    pathways: Option<PartialPathwayConfig>,
    network: Option<PartialNetworkConfig>,
    enrichment: Option<PartialEnrichmentConfig>,
    retry: Option<PartialRetryConfig>,
}

/// Compound properties supplied by the configuration file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundRecord {
    pub cid: Option<u64>,
    pub smiles: Option<String>,
    pub formula: Option<String>,
    pub name: Option<String>,
}

/// The local files backing the offline collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFiles {
    pub swiss_targets: PathBuf,
    pub superpred_targets: PathBuf,
    pub pathways: PathBuf,
    pub interactions: PathBuf,
    pub enrichment: PathBuf,
}

/// Everything the `run` command needs, fully resolved.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub query: CompoundQuery,
    pub compound: CompoundRecord,
    pub data: DataFiles,
    pub pipeline: core_config::PipelineConfig,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Applies CLI overrides and resolves the final settings.
    ///
    /// Precedence, highest first: dedicated flags, `-S` values, the file, library
    /// defaults. Relative data paths are resolved against `base_dir`.
    pub fn merge_with_cli(mut self, args: &RunArgs, base_dir: &Path) -> Result<RunSettings> {
        self.apply_set_values(&args.set_values)?;

        let compound = self.compound.take().unwrap_or_default();
        let query = Self::resolve_query(&compound)?;
        let data = Self::resolve_data(self.data.take().unwrap_or_default(), base_dir)?;

        let targets = self.targets.take().unwrap_or_default();
        let pathways = self.pathways.take().unwrap_or_default();
        let network = self.network.take().unwrap_or_default();
        let enrichment = self.enrichment.take().unwrap_or_default();
        let retry = Self::merge_retry(self.retry.take().unwrap_or_default());

        let search_terms = pathways.search_terms.ok_or_else(|| {
            CliError::Config("`pathways.search-terms` is required.".to_string())
        })?;

        let mut builder = core_config::PipelineConfigBuilder::new()
            .search_terms(search_terms)
            .retry(retry);
        if let Some(threshold) = targets.swiss_threshold {
            builder = builder.swiss_threshold(threshold);
        }
        if let Some(threshold) = targets.superpred_threshold {
            builder = builder.superpred_threshold(threshold);
        }
        if let Some(hits) = pathways.max_hits_per_term {
            builder = builder.max_hits_per_term(hits);
        }
        if let Some(confidence) = args.confidence.or(network.confidence) {
            builder = builder.confidence(confidence);
        }
        if let Some(scope) = args.scope.or(network.scope) {
            builder = builder.scope(scope);
        }
        if let Some(count) = args.top_n.or(network.hub_count) {
            builder = builder.hub_count(count);
        }
        if let Some(threshold) = enrichment.significance_threshold {
            builder = builder.significance_threshold(threshold);
        }

        let pipeline = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(RunSettings {
            query,
            compound: CompoundRecord {
                cid: compound.cid,
                smiles: compound.smiles,
                formula: compound.formula,
                name: compound.name,
            },
            data,
            pipeline,
        })
    }

    fn resolve_query(compound: &PartialCompoundConfig) -> Result<CompoundQuery> {
        let query = match (&compound.cid, &compound.smiles) {
            (Some(cid), _) => CompoundQuery::cid(&cid.to_string()),
            (None, Some(smiles)) => CompoundQuery::smiles(smiles),
            (None, None) => {
                return Err(CliError::Config(
                    "`compound.cid` or `compound.smiles` is required.".to_string(),
                ));
            }
        };
        query.map_err(|e| CliError::Config(e.to_string()))
    }

    fn resolve_data(partial: PartialDataConfig, base_dir: &Path) -> Result<DataFiles> {
        let resolve = |value: Option<PathBuf>, key: &str| -> Result<PathBuf> {
            let path = value
                .ok_or_else(|| CliError::Config(format!("`data.{}` is required.", key)))?;
            let path = if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            };
            if !path.exists() {
                return Err(CliError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Data file for `data.{}` does not exist: {}", key, path.display()),
                )));
            }
            Ok(path)
        };

        Ok(DataFiles {
            swiss_targets: resolve(partial.swiss_targets, "swiss-targets")?,
            superpred_targets: resolve(partial.superpred_targets, "superpred-targets")?,
            pathways: resolve(partial.pathways, "pathways")?,
            interactions: resolve(partial.interactions, "interactions")?,
            enrichment: resolve(partial.enrichment, "enrichment")?,
        })
    }

    fn merge_retry(partial: PartialRetryConfig) -> RetryConfig {
        let defaults = RetryConfig::default();
        RetryConfig {
            max_retries: partial.max_retries.unwrap_or(defaults.max_retries),
            base_delay: partial
                .base_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.base_delay),
            request_delay: partial
                .request_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_delay),
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();
            let value_str = value_str.trim();

            match key {
                "targets.swiss-threshold" => {
                    self.targets
                        .get_or_insert_with(Default::default)
                        .swiss_threshold = Some(parse_value(key, value_str)?);
                }
                "targets.superpred-threshold" => {
                    self.targets
                        .get_or_insert_with(Default::default)
                        .superpred_threshold = Some(parse_value(key, value_str)?);
                }
                "pathways.search-terms" => {
                    self.pathways
                        .get_or_insert_with(Default::default)
                        .search_terms = Some(
                        value_str
                            .split(',')
                            .map(|term| term.trim().to_string())
                            .filter(|term| !term.is_empty())
                            .collect(),
                    );
                }
                "pathways.max-hits-per-term" => {
                    self.pathways
                        .get_or_insert_with(Default::default)
                        .max_hits_per_term = Some(parse_value(key, value_str)?);
                }
                "network.confidence" => {
                    self.network
                        .get_or_insert_with(Default::default)
                        .confidence = Some(parse_value(key, value_str)?);
                }
                "network.scope" => {
                    self.network.get_or_insert_with(Default::default).scope =
                        Some(parse_value(key, value_str)?);
                }
                "network.hub-count" => {
                    self.network
                        .get_or_insert_with(Default::default)
                        .hub_count = Some(parse_value(key, value_str)?);
                }
                "enrichment.significance-threshold" => {
                    self.enrichment
                        .get_or_insert_with(Default::default)
                        .significance_threshold = Some(parse_value(key, value_str)?);
                }
                "retry.max-retries" => {
                    self.retry
                        .get_or_insert_with(Default::default)
                        .max_retries = Some(parse_value(key, value_str)?);
                }
                "retry.base-delay-ms" => {
                    self.retry
                        .get_or_insert_with(Default::default)
                        .base_delay_ms = Some(parse_value(key, value_str)?);
                }
                "retry.request-delay-ms" => {
                    self.retry
                        .get_or_insert_with(Default::default)
                        .request_delay_ms = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| CliError::Config(format!("Invalid value for {}: '{}' ({})", key, value, e)))
}
