use clap::{Args, Parser, Subcommand};
use netpharm::engine::config::NetworkScope;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Network Pharmacology Toolkit Contributors",
    version,
    about = "netpharm - Link a compound to its predicted targets, their pathways, and the protein interaction network between them.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline for one compound using local data files.
    Run(RunArgs),
    /// Analyze the topology and hubs of a single interaction table.
    Network(NetworkArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the pipeline configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Override `network.confidence` (0-1) from the config file.
    #[arg(long, value_name = "FLOAT")]
    pub confidence: Option<f64>,

    /// Override `network.hub-count`, the number of hubs in the display subgraph.
    #[arg(short = 'n', long, value_name = "INT")]
    pub top_n: Option<usize>,

    /// Override `network.scope`: which genes the interaction query covers.
    #[arg(long, value_name = "SCOPE", value_parser = parse_scope)]
    pub scope: Option<NetworkScope>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S retry.max-retries=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `network` subcommand.
#[derive(Args, Debug)]
pub struct NetworkArgs {
    /// Path to a tab-separated interaction table (entity_A, entity_B, score).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Number of hubs in the display subgraph.
    #[arg(short = 'n', long, value_name = "INT")]
    pub top_n: Option<usize>,
}

fn parse_scope(raw: &str) -> Result<NetworkScope, String> {
    raw.parse().map_err(|e: netpharm::engine::config::ConfigError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_accepts_overrides_and_repeated_set_values() {
        let cli = Cli::parse_from([
            "netpharm",
            "-vv",
            "run",
            "-c",
            "pipeline.toml",
            "--confidence",
            "0.4",
            "--scope",
            "all-targets",
            "-S",
            "retry.max-retries=5",
            "-S",
            "pathways.max-hits-per-term=2",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            panic!("Expected 'run' subcommand");
        };
        assert_eq!(args.config, PathBuf::from("pipeline.toml"));
        assert_eq!(args.confidence, Some(0.4));
        assert_eq!(args.scope, Some(NetworkScope::AllTargets));
        assert_eq!(args.set_values.len(), 2);
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let result =
            Cli::try_parse_from(["netpharm", "run", "-c", "x.toml", "--scope", "all-genes"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["netpharm", "-q", "-v", "network", "-i", "edges.tsv"]);
        assert!(result.is_err());
    }
}
