use super::network::InteractionGraph;
use super::view::AdjacencyView;
use crate::core::models::ids::NodeId;
use crate::core::models::symbol::Symbol;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Nodes ordered by descending degree.
///
/// The sort is stable over the graph's first-seen node order, so nodes with equal
/// degree keep the order in which they first appeared in the edge list. The metrics
/// table and hub selection both rank through this function, which keeps "top-K by
/// degree" identical wherever it is read.
pub fn rank_by_degree(graph: &InteractionGraph) -> Vec<NodeId> {
    let mut ranked: Vec<NodeId> = graph.node_ids().collect();
    ranked.sort_by(|&a, &b| graph.degree(b).cmp(&graph.degree(a)));
    ranked
}

/// Per-node centrality measures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    #[serde(skip)]
    pub node: NodeId,
    pub protein: Symbol,
    pub degree: usize,
    pub degree_centrality: f64,
    pub betweenness_centrality: f64,
    pub closeness_centrality: f64,
}

/// Centrality metrics for every node, sorted by descending degree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsTable {
    rows: Vec<MetricsRow>,
}

impl MetricsTable {
    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `k` rows, i.e. the top-`k` nodes by degree.
    pub fn top(&self, k: usize) -> &[MetricsRow] {
        &self.rows[..k.min(self.rows.len())]
    }

    pub fn get(&self, protein: &str) -> Option<&MetricsRow> {
        self.rows.iter().find(|row| row.protein.as_str() == protein)
    }

    pub fn degree_sum(&self) -> usize {
        self.rows.iter().map(|row| row.degree).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Connectivity {
    Connected {
        diameter: usize,
        average_shortest_path: f64,
    },
    Disconnected {
        components: usize,
    },
}

/// Network-level statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub average_degree: f64,
    pub density: f64,
    pub connectivity: Connectivity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyAnalysis {
    pub metrics: MetricsTable,
    pub summary: NetworkSummary,
}

/// Computes centrality metrics and the network summary of an [`InteractionGraph`].
///
/// All path-based measures use hop counts; edge weights are ignored.
pub struct TopologyAnalyzer;

impl TopologyAnalyzer {
    #[instrument(skip_all, name = "topology_analysis")]
    pub fn analyze(graph: &InteractionGraph) -> TopologyAnalysis {
        let view = AdjacencyView::from_graph(graph);
        let n = view.node_count;

        let distances: Vec<Vec<Option<usize>>> =
            (0..n).map(|source| view.bfs_distances(source)).collect();
        let betweenness = Self::normalized_betweenness(&view);

        let mut rows: Vec<MetricsRow> = (0..n)
            .filter_map(|idx| {
                let node = view.index_to_node[idx];
                let degree = view.neighbors[idx].len();
                Some(MetricsRow {
                    node,
                    protein: graph.symbol(node)?.clone(),
                    degree,
                    degree_centrality: Self::degree_centrality(degree, n),
                    betweenness_centrality: betweenness[idx],
                    closeness_centrality: Self::closeness(&distances[idx], n),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.degree.cmp(&a.degree));

        let summary = Self::summarize(graph, &view, &distances);
        info!(
            nodes = summary.node_count,
            edges = summary.edge_count,
            density = summary.density,
            "Network topology analyzed."
        );

        TopologyAnalysis {
            metrics: MetricsTable { rows },
            summary,
        }
    }

    fn degree_centrality(degree: usize, n: usize) -> f64 {
        if n <= 1 {
            0.0
        } else {
            degree as f64 / (n - 1) as f64
        }
    }

    /// Brandes betweenness scaled by `1 / ((n-1)(n-2))`, the undirected normalization for
    /// a raw count that visits every pair from both ends.
    fn normalized_betweenness(view: &AdjacencyView) -> Vec<f64> {
        let n = view.node_count;
        let raw = view.brandes_betweenness();
        if n <= 2 {
            return raw;
        }
        let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
        raw.into_iter().map(|value| value * scale).collect()
    }

    /// Closeness with the Wasserman-Faust correction for disconnected graphs: the
    /// reciprocal mean distance to reachable nodes, scaled by the reachable fraction.
    fn closeness(distances: &[Option<usize>], n: usize) -> f64 {
        let (reachable, total) = distances
            .iter()
            .flatten()
            .fold((0usize, 0usize), |(count, sum), &d| (count + 1, sum + d));
        if total == 0 || n <= 1 {
            return 0.0;
        }
        let others = (reachable - 1) as f64;
        (others / total as f64) * (others / (n - 1) as f64)
    }

    fn summarize(
        graph: &InteractionGraph,
        view: &AdjacencyView,
        distances: &[Vec<Option<usize>>],
    ) -> NetworkSummary {
        let n = graph.node_count();
        let m = graph.edge_count();
        let average_degree = if n == 0 {
            0.0
        } else {
            2.0 * m as f64 / n as f64
        };
        let density = if n <= 1 {
            0.0
        } else {
            2.0 * m as f64 / (n as f64 * (n - 1) as f64)
        };

        let components = view.connected_components();
        let connectivity = if components == 1 {
            let mut diameter = 0;
            let mut path_sum = 0usize;
            for row in distances {
                for d in row.iter().flatten() {
                    diameter = diameter.max(*d);
                    path_sum += d;
                }
            }
            let average_shortest_path = if n <= 1 {
                0.0
            } else {
                path_sum as f64 / (n as f64 * (n - 1) as f64)
            };
            Connectivity::Connected {
                diameter,
                average_shortest_path,
            }
        } else {
            debug!(components, "Network is disconnected; diameter undefined.");
            Connectivity::Disconnected { components }
        };

        NetworkSummary {
            node_count: n,
            edge_count: m,
            average_degree,
            density,
            connectivity,
        }
    }
}
