//! Dense, integer-indexed view of an [`InteractionGraph`] for path-based metrics.

use super::network::InteractionGraph;
use crate::core::models::ids::NodeId;
use std::collections::{HashMap, VecDeque};

/// Adjacency lists over dense indices `0..node_count`, in the graph's node order.
pub struct AdjacencyView {
    pub node_count: usize,
    /// Mapping from dense index back to the graph's `NodeId`.
    pub index_to_node: Vec<NodeId>,
    /// Neighbor indices of each node.
    pub neighbors: Vec<Vec<usize>>,
}

impl AdjacencyView {
    pub fn from_graph(graph: &InteractionGraph) -> Self {
        let index_to_node: Vec<NodeId> = graph.node_ids().collect();
        let node_to_index: HashMap<NodeId, usize> = index_to_node
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();
        let neighbors = index_to_node
            .iter()
            .map(|&id| {
                graph
                    .neighbors(id)
                    .filter_map(|(n, _)| node_to_index.get(&n).copied())
                    .collect()
            })
            .collect();

        Self {
            node_count: index_to_node.len(),
            index_to_node,
            neighbors,
        }
    }

    /// Unweighted hop distances from `source`; `None` for unreachable nodes.
    pub fn bfs_distances(&self, source: usize) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.node_count];
        let mut queue = VecDeque::new();
        dist[source] = Some(0);
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            let next = dist[v].map_or(0, |d| d + 1);
            for &w in &self.neighbors[v] {
                if dist[w].is_none() {
                    dist[w] = Some(next);
                    queue.push_back(w);
                }
            }
        }
        dist
    }

    pub fn connected_components(&self) -> usize {
        let mut seen = vec![false; self.node_count];
        let mut components = 0;
        for start in 0..self.node_count {
            if seen[start] {
                continue;
            }
            components += 1;
            let mut stack = vec![start];
            seen[start] = true;
            while let Some(v) = stack.pop() {
                for &w in &self.neighbors[v] {
                    if !seen[w] {
                        seen[w] = true;
                        stack.push(w);
                    }
                }
            }
        }
        components
    }

    /// Unnormalized shortest-path betweenness (Brandes), summed over ordered source nodes.
    ///
    /// On an undirected graph every unordered pair is visited from both ends, so each
    /// value is twice the undirected pair count.
    pub fn brandes_betweenness(&self) -> Vec<f64> {
        let n = self.node_count;
        let mut centrality = vec![0.0; n];

        for s in 0..n {
            let mut stack = Vec::with_capacity(n);
            let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
            let mut sigma = vec![0.0_f64; n];
            let mut dist: Vec<Option<usize>> = vec![None; n];
            let mut queue = VecDeque::new();

            sigma[s] = 1.0;
            dist[s] = Some(0);
            queue.push_back(s);

            while let Some(v) = queue.pop_front() {
                stack.push(v);
                let dv = dist[v].unwrap_or(0);
                for &w in &self.neighbors[v] {
                    if dist[w].is_none() {
                        dist[w] = Some(dv + 1);
                        queue.push_back(w);
                    }
                    if dist[w] == Some(dv + 1) {
                        sigma[w] += sigma[v];
                        predecessors[w].push(v);
                    }
                }
            }

            let mut delta = vec![0.0_f64; n];
            while let Some(w) = stack.pop() {
                for &v in &predecessors[w] {
                    delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
                }
                if w != s {
                    centrality[w] += delta[w];
                }
            }
        }
        centrality
    }
}
