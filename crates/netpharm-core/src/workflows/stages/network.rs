use super::remote_failure;
use crate::core::graph::builder::{BuildReport, GraphBuilder};
use crate::core::graph::hubs::{DisplaySubgraph, HubSubgraphExtractor};
use crate::core::graph::network::InteractionGraph;
use crate::core::graph::topology::{TopologyAnalysis, TopologyAnalyzer};
use crate::core::models::pathways::OverlapSet;
use crate::core::models::symbol::Symbol;
use crate::core::models::targets::TargetSet;
use crate::engine::collaborators::InteractionSource;
use crate::engine::config::NetworkScope;
use crate::engine::context::StageContext;
use crate::engine::error::{EmptyReason, PipelineError};
use crate::engine::progress::Progress;
use crate::engine::state::{ItemTally, Stage};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct NetworkAnalysis {
    /// Genes sent to the interaction database.
    pub genes: Vec<Symbol>,
    pub required_score: u32,
    pub graph: InteractionGraph,
    pub build: BuildReport,
    pub topology: TopologyAnalysis,
    /// `None` when pruning left nothing worth drawing.
    pub display: Option<DisplaySubgraph>,
}

/// The genes whose interactions are queried under `scope`.
pub fn network_genes(targets: &TargetSet, overlap: &OverlapSet, scope: NetworkScope) -> Vec<Symbol> {
    match scope {
        NetworkScope::Overlap => overlap.symbols().cloned().collect(),
        NetworkScope::AllTargets => targets.symbols().cloned().collect(),
    }
}

/// Queries interactions, builds the graph, and analyzes its topology.
///
/// An empty network is fatal. An empty hub subgraph is not: the metrics still stand, so
/// the analysis is returned with `display` unset.
#[instrument(skip_all, name = "network_stage")]
pub fn run(
    targets: &TargetSet,
    overlap: &OverlapSet,
    source: &dyn InteractionSource,
    ctx: &StageContext,
) -> Result<NetworkAnalysis, PipelineError> {
    ctx.reporter.report(Progress::PhaseStart {
        name: Stage::Network.name(),
    });

    let settings = &ctx.config.network;
    let required_score = settings.required_score();
    let genes = network_genes(targets, overlap, settings.scope);
    let no_interactions = |rows_seen, rows_dropped| PipelineError::EmptyResult {
        stage: Stage::Network,
        reason: EmptyReason::NoInteractions {
            required_score,
            rows_seen,
            rows_dropped,
        },
    };
    if genes.is_empty() {
        return Err(no_interactions(0, 0));
    }

    info!(
        genes = genes.len(),
        required_score,
        scope = %settings.scope,
        "Querying interactions."
    );
    let rows = ctx
        .retry
        .fetch("interaction query", || source.query(&genes, required_score))
        .map_err(remote_failure(Stage::Network))?;
    if rows.is_empty() {
        return Err(no_interactions(0, 0));
    }

    // Building only fails once every row has been dropped.
    let (graph, build) = GraphBuilder::build_from_rows(&rows).map_err(|err| {
        warn!(error = %err, "No usable interaction rows.");
        no_interactions(rows.len(), rows.len())
    })?;
    if build.rows_dropped > 0 {
        warn!(
            dropped = build.rows_dropped,
            seen = build.rows_seen,
            "Dropped malformed interaction rows."
        );
    }

    let topology = TopologyAnalyzer::analyze(&graph);

    let extractor = HubSubgraphExtractor::new(settings.hub_count);
    let display = match extractor.extract(&graph) {
        Ok(subgraph) => Some(subgraph),
        Err(err) => {
            warn!(error = %err, "No hub subgraph to display.");
            ctx.reporter.report(Progress::Message(err.to_string()));
            None
        }
    };

    ctx.reporter.report(Progress::StageSummary {
        stage: Stage::Network,
        tally: ItemTally::single_success(),
    });
    ctx.reporter.report(Progress::PhaseFinish);
    Ok(NetworkAnalysis {
        genes,
        required_score,
        graph,
        build,
        topology,
        display,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::PipelineConfig;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::retry::RetryPolicy;
    use crate::workflows::testing::{MockInteractions, config, config_builder};

    fn symbols(raw: &[&str]) -> Vec<Symbol> {
        raw.iter().filter_map(|s| Symbol::new(s)).collect()
    }

    fn overlap_of(raw: &[&str]) -> (TargetSet, OverlapSet) {
        use crate::core::models::pathways::PathwayProteinSet;
        let targets: TargetSet = symbols(raw).into_iter().collect();
        let proteins: PathwayProteinSet = symbols(raw)
            .into_iter()
            .map(|s| (s, "R-HSA-1".to_string()))
            .collect();
        let overlap = OverlapSet::intersect(&targets, &proteins);
        (targets, overlap)
    }

    fn analyze(
        config: &PipelineConfig,
        targets: &TargetSet,
        overlap: &OverlapSet,
        source: &MockInteractions,
    ) -> Result<NetworkAnalysis, PipelineError> {
        let reporter = ProgressReporter::new();
        let retry = RetryPolicy::new(&config.retry);
        let ctx = StageContext::new(config, &reporter, &retry);
        run(targets, overlap, source, &ctx)
    }

    #[test]
    fn builds_graph_and_reports_dropped_rows() {
        let (targets, overlap) = overlap_of(&["A", "B", "C"]);
        let source = MockInteractions::from_rows(&[
            ("A", "B", "900"),
            ("B", "C", "800"),
            ("A", "C", "700"),
            ("C", "C", "999"),
        ]);

        let analysis = analyze(&config(), &targets, &overlap, &source).unwrap();
        assert_eq!(analysis.graph.node_count(), 3);
        assert_eq!(analysis.graph.edge_count(), 3);
        assert_eq!(analysis.build.rows_dropped, 1);
        assert_eq!(analysis.topology.metrics.len(), 3);
        assert_eq!(analysis.required_score, 700);
        assert_eq!(analysis.display.unwrap().node_count(), 3);

        let (genes, score) = source.last_request.borrow().clone().unwrap();
        assert_eq!(genes, vec!["A", "B", "C"]);
        assert_eq!(score, 700);
    }

    #[test]
    fn all_unusable_rows_are_fatal() {
        let (targets, overlap) = overlap_of(&["A", "B"]);
        let source = MockInteractions::from_rows(&[("A", "A", "900"), ("A", "B", "x")]);

        let err = analyze(&config(), &targets, &overlap, &source).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::EmptyResult {
                stage: Stage::Network,
                reason: EmptyReason::NoInteractions {
                    required_score: 700,
                    rows_seen: 2,
                    rows_dropped: 2
                }
            }
        ));
    }

    #[test]
    fn empty_hub_subgraph_is_recoverable() {
        let (targets, overlap) = overlap_of(&["HUB", "A", "B", "C"]);
        let source =
            MockInteractions::from_rows(&[("HUB", "A", "900"), ("HUB", "B", "900"), ("HUB", "C", "900")]);
        let config = config_builder().hub_count(1).build().unwrap();

        let analysis = analyze(&config, &targets, &overlap, &source).unwrap();
        assert!(analysis.display.is_none());
        assert_eq!(analysis.topology.metrics.rows()[0].protein.as_str(), "HUB");
    }

    #[test]
    fn scope_selects_query_genes() {
        let targets: TargetSet = symbols(&["A", "B", "C"]).into_iter().collect();
        let (_, overlap) = overlap_of(&["B"]);
        let names = |genes: Vec<Symbol>| -> Vec<String> {
            genes.into_iter().map(|g| g.to_string()).collect()
        };

        assert_eq!(
            names(network_genes(&targets, &overlap, NetworkScope::Overlap)),
            vec!["B"]
        );
        assert_eq!(
            names(network_genes(&targets, &overlap, NetworkScope::AllTargets)),
            vec!["A", "B", "C"]
        );
    }
}
