use crate::cli::RunArgs;
use crate::config::PartialRunConfig;
use crate::error::Result;
use crate::sources::LocalSources;
use crate::utils::progress::CliProgressHandler;
use crate::utils::tables;
use netpharm::engine::progress::ProgressReporter;
use netpharm::workflows::pipeline::Pipeline;
use std::path::Path;
use tracing::{info, warn};

pub const HUB_LISTING: usize = 10;
const ENRICHMENT_LISTING: usize = 15;

pub fn run(args: RunArgs) -> Result<()> {
    let partial_config = PartialRunConfig::from_file(&args.config)?;
    let base_dir = args.config.parent().unwrap_or(Path::new("."));
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_with_cli(&args, base_dir)?;

    info!("Loading local data files...");
    let sources = LocalSources::load(&settings.compound, &settings.data)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting network pharmacology run for {}...", settings.query);
    let mut pipeline = Pipeline::new(
        settings.query.clone(),
        settings.pipeline,
        sources.collaborators(),
    )
    .with_reporter(reporter);

    let outcome = pipeline.run_to_completion();
    println!();
    print!("{}", tables::run_report(&pipeline.report()));
    let report = outcome?;
    if report.total_failures() > 0 {
        warn!(
            failures = report.total_failures(),
            "Run completed with skipped items."
        );
    }

    if let Some(network) = pipeline.network() {
        println!(
            "\nNetwork ({} gene(s) queried at score >= {}):",
            network.genes.len(),
            network.required_score
        );
        print!("{}", tables::network_summary(&network.topology.summary));
        println!("Rows dropped:    {}", network.build.rows_dropped);

        let metrics = &network.topology.metrics;
        println!("\nTop {} hubs by degree:", HUB_LISTING.min(metrics.len()));
        print!("{}", tables::hub_table(metrics.top(HUB_LISTING)));

        match &network.display {
            Some(display) => print!("\n{}", tables::display_subgraph(display)),
            None => println!("\nNo display subgraph at this confidence threshold."),
        }
    }

    if let Some(enrichment) = pipeline.enrichment() {
        println!(
            "\nEnriched terms ({} significant of {} returned):",
            enrichment.terms.len(),
            enrichment.terms_returned
        );
        print!(
            "{}",
            tables::enrichment_terms(&enrichment.terms, ENRICHMENT_LISTING)
        );
    }

    Ok(())
}
