use super::error::GraphError;
use super::network::InteractionGraph;
use crate::core::models::interaction::{InteractionEdge, RawInteraction, coerce_rows};
use serde::Serialize;
use tracing::{debug, info};

/// Bookkeeping from building a graph out of raw tabular rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub rows_seen: usize,
    pub rows_dropped: usize,
    /// Edges whose weight was replaced by a later row for the same pair.
    pub overwritten_edges: usize,
}

/// Turns interaction edge lists into an [`InteractionGraph`].
pub struct GraphBuilder;

impl GraphBuilder {
    /// Builds a graph from validated edges in a single pass.
    ///
    /// Each edge is upserted with weight `score / 1000`; a later edge for the same
    /// unordered pair overwrites the earlier weight.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyNetwork`] when `edges` is empty.
    pub fn build(edges: &[InteractionEdge]) -> Result<InteractionGraph, GraphError> {
        let (graph, _) = Self::assemble(edges)?;
        Ok(graph)
    }

    /// Coerces raw rows and builds the graph from those that survive.
    ///
    /// Rows with non-numeric or out-of-range scores, blank identifiers, or identical
    /// endpoints are dropped and counted in the returned [`BuildReport`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyNetwork`] when no row survives coercion.
    pub fn build_from_rows(
        rows: &[RawInteraction],
    ) -> Result<(InteractionGraph, BuildReport), GraphError> {
        let coercion = coerce_rows(rows);
        if coercion.edges.is_empty() {
            return Err(GraphError::EmptyNetwork {
                rows_seen: coercion.rows_seen,
                rows_dropped: coercion.rows_dropped,
            });
        }

        let (graph, overwritten_edges) = Self::assemble(&coercion.edges)?;
        let report = BuildReport {
            rows_seen: coercion.rows_seen,
            rows_dropped: coercion.rows_dropped,
            overwritten_edges,
        };
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped = report.rows_dropped,
            "Interaction network built."
        );
        Ok((graph, report))
    }

    fn assemble(edges: &[InteractionEdge]) -> Result<(InteractionGraph, usize), GraphError> {
        if edges.is_empty() {
            return Err(GraphError::EmptyNetwork {
                rows_seen: 0,
                rows_dropped: 0,
            });
        }

        let mut graph = InteractionGraph::new();
        let mut overwritten = 0;
        for edge in edges {
            if !graph.upsert_edge(edge.a(), edge.b(), edge.weight()) {
                overwritten += 1;
            }
        }
        debug!(overwritten, "Duplicate interaction pairs collapsed.");

        if graph.edge_count() == 0 {
            return Err(GraphError::EmptyNetwork {
                rows_seen: edges.len(),
                rows_dropped: edges.len(),
            });
        }
        Ok((graph, overwritten))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::symbol::Symbol;

    fn edge(a: &str, b: &str, score: f64) -> InteractionEdge {
        InteractionEdge::new(Symbol::new(a).unwrap(), Symbol::new(b).unwrap(), score).unwrap()
    }

    #[test]
    fn triangle_has_expected_nodes_edges_and_weights() {
        let graph =
            GraphBuilder::build(&[edge("A", "B", 900.0), edge("B", "C", 700.0), edge("A", "C", 500.0)])
                .unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!((graph.weight("A", "B").unwrap() - 0.9).abs() < 1e-12);
        assert!((graph.weight("B", "C").unwrap() - 0.7).abs() < 1e-12);
        assert!((graph.weight("A", "C").unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn reversed_duplicate_is_last_write_wins() {
        let graph = GraphBuilder::build(&[edge("A", "B", 300.0), edge("B", "A", 800.0)]).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!((graph.weight("A", "B").unwrap() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn empty_edge_list_is_an_error() {
        assert_eq!(
            GraphBuilder::build(&[]).unwrap_err(),
            GraphError::EmptyNetwork {
                rows_seen: 0,
                rows_dropped: 0
            }
        );
    }

    #[test]
    fn rows_that_all_fail_coercion_are_an_error() {
        let rows = vec![
            RawInteraction::new("A", "A", "900"),
            RawInteraction::new("A", "B", "strong"),
        ];
        assert_eq!(
            GraphBuilder::build_from_rows(&rows).unwrap_err(),
            GraphError::EmptyNetwork {
                rows_seen: 2,
                rows_dropped: 2
            }
        );
    }

    #[test]
    fn build_from_rows_reports_drops_and_overwrites() {
        let rows = vec![
            RawInteraction::new("9606.EGFR", "9606.GRB2", "999"),
            RawInteraction::new("GRB2", "egfr", "950"),
            RawInteraction::new("EGFR", "SRC", "bogus"),
            RawInteraction::new("SRC", "GRB2", "720"),
        ];
        let (graph, report) = GraphBuilder::build_from_rows(&rows).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(
            report,
            BuildReport {
                rows_seen: 4,
                rows_dropped: 1,
                overwritten_edges: 1
            }
        );
        assert!((graph.weight("EGFR", "GRB2").unwrap() - 0.95).abs() < 1e-12);
    }
}
