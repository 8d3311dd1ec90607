use super::run::HUB_LISTING;
use crate::cli::NetworkArgs;
use crate::error::{CliError, Result};
use crate::utils::tables;
use netpharm::core::graph::builder::GraphBuilder;
use netpharm::core::graph::error::GraphError;
use netpharm::core::graph::hubs::{DEFAULT_HUB_COUNT, HubSubgraphExtractor};
use netpharm::core::graph::topology::TopologyAnalyzer;
use netpharm::core::io::edge_table::EdgeTable;
use netpharm::core::io::traits::TableFile;
use tracing::{info, warn};

pub fn run(args: NetworkArgs) -> Result<()> {
    let top_n = args.top_n.unwrap_or(DEFAULT_HUB_COUNT);
    if top_n == 0 {
        return Err(CliError::Argument("--top-n must be at least 1".to_string()));
    }

    info!("Loading interaction table from {:?}", &args.input);
    let rows = EdgeTable::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    let graph_error = |source: GraphError| CliError::Graph {
        path: args.input.clone(),
        source,
    };

    let (graph, build) = GraphBuilder::build_from_rows(&rows).map_err(graph_error)?;
    if build.rows_dropped > 0 {
        warn!(
            dropped = build.rows_dropped,
            seen = build.rows_seen,
            "Some interaction rows were unusable."
        );
    }

    let analysis = TopologyAnalyzer::analyze(&graph);
    print!("{}", tables::network_summary(&analysis.summary));
    println!("Rows dropped:    {}", build.rows_dropped);

    println!(
        "\nTop {} hubs by degree:",
        HUB_LISTING.min(analysis.metrics.len())
    );
    print!("{}", tables::hub_table(analysis.metrics.top(HUB_LISTING)));

    match HubSubgraphExtractor::new(top_n).extract(&graph) {
        Ok(display) => print!("\n{}", tables::display_subgraph(&display)),
        Err(err @ GraphError::EmptySubgraph { .. }) => {
            warn!(%err, "No display subgraph.");
            println!("\nNo display subgraph: {}", err);
        }
        Err(err) => return Err(graph_error(err)),
    }

    Ok(())
}
