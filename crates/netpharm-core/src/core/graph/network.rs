use crate::core::models::ids::NodeId;
use crate::core::models::symbol::Symbol;
use indexmap::{IndexMap, IndexSet};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{HashMap, HashSet};

/// An undirected, weighted, simple protein interaction graph.
///
/// Nodes are stored in a slot map so their IDs stay valid when other nodes are removed,
/// which lets an induced subgraph share IDs with the graph it was taken from. Node
/// iteration follows first-seen order; this order is the tie-breaker for every
/// degree-based ranking in the crate.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    /// Primary node storage.
    nodes: SlotMap<NodeId, Symbol>,
    /// Node IDs in the order their symbols were first seen.
    order: IndexSet<NodeId>,
    /// Lookup from canonical symbol to node.
    index: HashMap<Symbol, NodeId>,
    /// Neighbor -> weight, mirrored on both endpoints of every edge.
    adjacency: SecondaryMap<NodeId, IndexMap<NodeId, f64>>,
    edge_count: usize,
}

impl InteractionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node for `symbol`, inserting it if it is not yet present.
    pub fn add_node(&mut self, symbol: Symbol) -> NodeId {
        if let Some(&id) = self.index.get(&symbol) {
            return id;
        }
        let id = self.nodes.insert(symbol.clone());
        self.index.insert(symbol, id);
        self.adjacency.insert(id, IndexMap::new());
        self.order.insert(id);
        id
    }

    /// Inserts or overwrites the undirected edge between `a` and `b`.
    ///
    /// Both orientations map to the same edge slot; a repeated pair replaces the
    /// previous weight rather than accumulating.
    ///
    /// # Return
    ///
    /// Returns `true` if the edge did not exist before. Self-loops are refused and
    /// return `false` without touching the graph.
    pub fn upsert_edge(&mut self, a: &Symbol, b: &Symbol, weight: f64) -> bool {
        if a == b {
            return false;
        }
        let a_id = self.add_node(a.clone());
        let b_id = self.add_node(b.clone());

        let is_new = self.adjacency[a_id].insert(b_id, weight).is_none();
        self.adjacency[b_id].insert(a_id, weight);
        if is_new {
            self.edge_count += 1;
        }
        is_new
    }

    /// Removes a node together with all of its incident edges.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Symbol> {
        let symbol = self.detach(id)?;
        self.order.shift_remove(&id);
        Some(symbol)
    }

    /// Removes several nodes and their incident edges, rebuilding the node order once
    /// instead of once per node. Returns how many of `ids` were present.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> usize {
        let removed: HashSet<NodeId> = ids
            .iter()
            .copied()
            .filter(|&id| self.detach(id).is_some())
            .collect();
        if !removed.is_empty() {
            self.order.retain(|id| !removed.contains(id));
        }
        removed.len()
    }

    /// Drops a node from storage, the symbol index, and every adjacency list. The node
    /// order is left to the caller.
    fn detach(&mut self, id: NodeId) -> Option<Symbol> {
        let symbol = self.nodes.remove(id)?;
        if let Some(neighbors) = self.adjacency.remove(id) {
            for neighbor in neighbors.keys() {
                if let Some(back) = self.adjacency.get_mut(*neighbor) {
                    back.shift_remove(&id);
                }
            }
            self.edge_count -= neighbors.len();
        }
        self.index.remove(&symbol);
        Some(symbol)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Node IDs in first-seen order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    pub fn symbol(&self, id: NodeId) -> Option<&Symbol> {
        self.nodes.get(id)
    }

    pub fn find(&self, symbol: &str) -> Option<NodeId> {
        self.index.get(symbol).copied()
    }

    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|neighbors| neighbors.iter().map(|(&n, &w)| (n, w)))
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency.get(id).map_or(0, IndexMap::len)
    }

    /// Weight of the edge between two symbols, in either orientation.
    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        let a_id = self.find(a)?;
        let b_id = self.find(b)?;
        self.adjacency.get(a_id)?.get(&b_id).copied()
    }

    /// Every edge exactly once, ordered by the first-seen order of its first endpoint.
    pub fn edges(&self) -> Vec<(NodeId, NodeId, f64)> {
        let mut visited = HashSet::with_capacity(self.order.len());
        let mut edges = Vec::with_capacity(self.edge_count);
        for &u in &self.order {
            visited.insert(u);
            for (v, w) in self.neighbors(u) {
                if !visited.contains(&v) {
                    edges.push((u, v, w));
                }
            }
        }
        edges
    }

    /// The subgraph induced on `keep`, sharing node IDs with `self`.
    pub fn induced_subgraph(&self, keep: &HashSet<NodeId>) -> Self {
        let dropped: Vec<NodeId> = self
            .order
            .iter()
            .copied()
            .filter(|id| !keep.contains(id))
            .collect();
        let mut subgraph = self.clone();
        subgraph.remove_nodes(&dropped);
        subgraph
    }
}
