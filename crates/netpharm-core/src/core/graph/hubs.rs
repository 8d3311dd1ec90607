use super::error::GraphError;
use super::network::InteractionGraph;
use super::topology::rank_by_degree;
use crate::core::models::ids::NodeId;
use crate::core::models::symbol::Symbol;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, instrument};

pub const DEFAULT_HUB_COUNT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Hub,
    Connector,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Hub => write!(f, "hub"),
            NodeRole::Connector => write!(f, "connector"),
        }
    }
}

/// A node of the display subgraph as handed to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayNode {
    pub symbol: Symbol,
    pub role: NodeRole,
    /// Degree inside the display subgraph.
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayEdge {
    pub a: Symbol,
    pub b: Symbol,
    pub weight: f64,
}

/// The pruned hub + first-neighbor subgraph with a role for every retained node.
#[derive(Debug, Clone)]
pub struct DisplaySubgraph {
    graph: InteractionGraph,
    /// Hubs in rank order, including any hub later removed as isolated.
    hubs: Vec<NodeId>,
    roles: IndexMap<NodeId, NodeRole>,
}

impl DisplaySubgraph {
    pub fn graph(&self) -> &InteractionGraph {
        &self.graph
    }

    /// Hubs still present in the subgraph, in rank order.
    pub fn hubs(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.hubs.iter().copied().filter(|&id| self.graph.contains(id))
    }

    pub fn role(&self, id: NodeId) -> Option<NodeRole> {
        self.roles.get(&id).copied()
    }

    pub fn roles(&self) -> &IndexMap<NodeId, NodeRole> {
        &self.roles
    }

    /// Rendering size for a node: its degree inside this subgraph.
    pub fn node_size(&self, id: NodeId) -> usize {
        self.graph.degree(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn connector_count(&self) -> usize {
        self.roles
            .values()
            .filter(|&&role| role == NodeRole::Connector)
            .count()
    }

    pub fn nodes(&self) -> Vec<DisplayNode> {
        self.roles
            .iter()
            .filter_map(|(&id, &role)| {
                Some(DisplayNode {
                    symbol: self.graph.symbol(id)?.clone(),
                    role,
                    size: self.node_size(id),
                })
            })
            .collect()
    }

    pub fn edges(&self) -> Vec<DisplayEdge> {
        self.graph
            .edges()
            .into_iter()
            .filter_map(|(u, v, weight)| {
                Some(DisplayEdge {
                    a: self.graph.symbol(u)?.clone(),
                    b: self.graph.symbol(v)?.clone(),
                    weight,
                })
            })
            .collect()
    }
}

/// Derives the display subgraph of hubs and the connectors that bridge them.
///
/// Connectors are first neighbors of hubs. Pruning drops connectors with fewer than
/// two edges inside the induced neighborhood and repeats until nothing changes; hubs
/// left without any edge are removed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubSubgraphExtractor {
    top_n: usize,
}

impl Default for HubSubgraphExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_COUNT)
    }
}

impl HubSubgraphExtractor {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// The `top_n` nodes by degree in the full graph.
    ///
    /// Ties keep the graph's first-seen node order, the same rule the metrics table
    /// uses, so the two rankings always agree.
    pub fn select_hubs(graph: &InteractionGraph, top_n: usize) -> Vec<NodeId> {
        let mut ranked = rank_by_degree(graph);
        ranked.truncate(top_n);
        ranked
    }

    /// Extracts the display subgraph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptySubgraph`] if no node survives pruning.
    #[instrument(skip_all, name = "hub_extraction", fields(top_n = self.top_n))]
    pub fn extract(&self, graph: &InteractionGraph) -> Result<DisplaySubgraph, GraphError> {
        let hubs = Self::select_hubs(graph, self.top_n);
        let hub_set: HashSet<NodeId> = hubs.iter().copied().collect();

        let mut candidates: IndexSet<NodeId> = hubs.iter().copied().collect();
        for &hub in &hubs {
            candidates.extend(graph.neighbors(hub).map(|(neighbor, _)| neighbor));
        }
        let keep: HashSet<NodeId> = candidates.into_iter().collect();
        let mut subgraph = graph.induced_subgraph(&keep);
        debug!(
            hubs = hubs.len(),
            candidates = subgraph.node_count(),
            "Induced hub neighborhood."
        );

        let mut pruned = 0;
        loop {
            let removed = Self::prune_pass(&mut subgraph, &hub_set);
            if removed == 0 {
                break;
            }
            pruned += removed;
        }

        let isolated: Vec<NodeId> = subgraph
            .node_ids()
            .filter(|&id| subgraph.degree(id) == 0)
            .collect();
        subgraph.remove_nodes(&isolated);

        if subgraph.is_empty() {
            return Err(GraphError::EmptySubgraph {
                top_n: self.top_n,
                node_count: graph.node_count(),
            });
        }

        let roles: IndexMap<NodeId, NodeRole> = subgraph
            .node_ids()
            .map(|id| {
                let role = if hub_set.contains(&id) {
                    NodeRole::Hub
                } else {
                    NodeRole::Connector
                };
                (id, role)
            })
            .collect();

        info!(
            nodes = subgraph.node_count(),
            edges = subgraph.edge_count(),
            pruned,
            isolated = isolated.len(),
            "Hub subgraph extracted."
        );

        Ok(DisplaySubgraph {
            graph: subgraph,
            hubs,
            roles,
        })
    }

    /// Removes every connector whose degree, measured before this pass removes anything,
    /// is below two. Returns the number of nodes removed.
    fn prune_pass(subgraph: &mut InteractionGraph, hubs: &HashSet<NodeId>) -> usize {
        let doomed: Vec<NodeId> = subgraph
            .node_ids()
            .filter(|id| !hubs.contains(id) && subgraph.degree(*id) < 2)
            .collect();
        subgraph.remove_nodes(&doomed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from(pairs: &[(&str, &str)]) -> InteractionGraph {
        let mut graph = InteractionGraph::new();
        for (a, b) in pairs {
            graph.upsert_edge(&Symbol::new(a).unwrap(), &Symbol::new(b).unwrap(), 0.8);
        }
        graph
    }

    fn names(graph: &InteractionGraph, ids: impl IntoIterator<Item = NodeId>) -> Vec<String> {
        ids.into_iter()
            .map(|id| graph.symbol(id).unwrap().to_string())
            .collect()
    }

    fn sorted_names(display: &DisplaySubgraph) -> Vec<String> {
        let mut sorted = names(display.graph(), display.graph().node_ids());
        sorted.sort();
        sorted
    }

    fn assert_display_invariants(display: &DisplaySubgraph) {
        let graph = display.graph();
        for id in graph.node_ids() {
            let degree = graph.degree(id);
            assert!(degree > 0, "isolated node {}", graph.symbol(id).unwrap());
            match display.role(id) {
                Some(NodeRole::Connector) => assert!(degree >= 2),
                Some(NodeRole::Hub) => {}
                None => panic!("node without a role"),
            }
        }
        assert_eq!(display.roles().len(), graph.node_count());
    }

    /// H1 (degree 4) and H2 (degree 4) share connector X and edge H1-H2. H1 also has a
    /// leaf L and a chain P - Q - R; H2 has a triangle with Y and Z.
    fn bridged_hubs() -> InteractionGraph {
        graph_from(&[
            ("H1", "X"),
            ("H2", "X"),
            ("H1", "L"),
            ("H1", "P"),
            ("P", "Q"),
            ("Q", "R"),
            ("H2", "Y"),
            ("H2", "Z"),
            ("Y", "Z"),
            ("H1", "H2"),
        ])
    }

    #[test]
    fn hubs_rank_by_global_degree_with_first_seen_ties() {
        let graph = graph_from(&[("A", "B"), ("C", "D"), ("C", "E"), ("B", "F")]);
        let hubs = HubSubgraphExtractor::select_hubs(&graph, 3);
        assert_eq!(names(&graph, hubs), vec!["B", "C", "A"]);
    }

    #[test]
    fn extraction_keeps_bridging_connectors_and_drops_leaves() {
        let graph = bridged_hubs();
        let display = HubSubgraphExtractor::new(2).extract(&graph).unwrap();
        assert_display_invariants(&display);

        assert_eq!(names(display.graph(), display.hubs()), vec!["H1", "H2"]);
        assert_eq!(sorted_names(&display), vec!["H1", "H2", "X", "Y", "Z"]);
        assert_eq!(
            display.role(graph.find("X").unwrap()),
            Some(NodeRole::Connector)
        );
        assert_eq!(display.connector_count(), 3);
    }

    #[test]
    fn node_size_is_degree_inside_the_subgraph() {
        let graph = bridged_hubs();
        let display = HubSubgraphExtractor::new(2).extract(&graph).unwrap();
        let h1 = graph.find("H1").unwrap();
        // Global neighbors X, L, P, H2; L and P are pruned.
        assert_eq!(graph.degree(h1), 4);
        assert_eq!(display.node_size(h1), 2);

        let node = display
            .nodes()
            .into_iter()
            .find(|n| n.symbol.as_str() == "H1")
            .unwrap();
        assert_eq!(node.size, 2);
        assert_eq!(node.role, NodeRole::Hub);
        assert_eq!(display.edges().len(), display.edge_count());
    }

    #[test]
    fn connectors_bridging_only_through_pruned_nodes_are_dropped() {
        // C's second edge runs to D, which is not a hub neighbor and never enters the
        // induced neighborhood, so C keeps only its hub edge.
        let graph = graph_from(&[
            ("H", "A"),
            ("H", "B"),
            ("H", "C"),
            ("H", "K"),
            ("A", "B"),
            ("C", "D"),
            ("D", "E"),
        ]);
        let display = HubSubgraphExtractor::new(1).extract(&graph).unwrap();
        assert_display_invariants(&display);
        assert_eq!(sorted_names(&display), vec!["A", "B", "H"]);
    }

    #[test]
    fn pruning_is_stable_after_extraction() {
        let graph = bridged_hubs();
        let display = HubSubgraphExtractor::new(2).extract(&graph).unwrap();
        let hubs: HashSet<NodeId> = display.hubs().collect();
        let mut again = display.graph().clone();
        assert_eq!(HubSubgraphExtractor::prune_pass(&mut again, &hubs), 0);
        assert_eq!(again.node_count(), display.node_count());
    }

    #[test]
    fn hub_without_retained_neighbors_is_removed_as_isolated() {
        // H2 has a triangle with P and Q; H1 outranks it but has only leaf neighbors.
        let graph = graph_from(&[
            ("H2", "P"),
            ("H2", "Q"),
            ("P", "Q"),
            ("H1", "L1"),
            ("H1", "L2"),
            ("H1", "L3"),
        ]);
        let display = HubSubgraphExtractor::new(2).extract(&graph).unwrap();
        let h1 = graph.find("H1").unwrap();
        assert!(!display.graph().contains(h1));
        assert_eq!(display.role(h1), None);
        assert_display_invariants(&display);
        assert_eq!(names(display.graph(), display.hubs()), vec!["H2"]);
    }

    #[test]
    fn star_of_leaves_yields_empty_subgraph_error() {
        let graph = graph_from(&[("HUB", "A"), ("HUB", "B"), ("HUB", "C")]);
        let err = HubSubgraphExtractor::new(1).extract(&graph).unwrap_err();
        assert_eq!(
            err,
            GraphError::EmptySubgraph {
                top_n: 1,
                node_count: 4
            }
        );
    }

    #[test]
    fn top_n_larger_than_graph_keeps_everything_connected() {
        let graph = graph_from(&[("A", "B"), ("B", "C")]);
        let display = HubSubgraphExtractor::new(15).extract(&graph).unwrap();
        assert_eq!(display.node_count(), 3);
        assert_eq!(display.connector_count(), 0);
        assert_display_invariants(&display);
    }
}
