use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error(
        "No valid interactions remain ({rows_seen} row(s) received, {rows_dropped} dropped)"
    )]
    EmptyNetwork {
        rows_seen: usize,
        rows_dropped: usize,
    },

    #[error(
        "Hub subgraph is empty after pruning (top_n = {top_n}, {node_count} node(s) in network)"
    )]
    EmptySubgraph { top_n: usize, node_count: usize },
}

impl GraphError {
    /// Suggestions an operator can act on.
    pub fn remediation(&self) -> Vec<&'static str> {
        match self {
            GraphError::EmptyNetwork { .. } => vec![
                "Check that the table has entity_A, entity_B and score columns with scores in 0..=1000",
                "Self-interactions and blank identifiers are dropped; supply rows between distinct proteins",
            ],
            GraphError::EmptySubgraph { .. } => vec![
                "Raise --top-n so more hubs are kept before pruning",
                "Lower the confidence threshold to obtain a denser network",
            ],
        }
    }
}
