//! # Graph Module
//!
//! The protein-protein interaction graph and the analytics run over it.
//!
//! - [`network`] - `InteractionGraph`, an undirected, weighted, simple graph keyed by `NodeId`
//! - [`builder`] - Construction from validated edges or raw tabular rows
//! - [`view`] - A dense, index-based adjacency view used by the path-based metrics
//! - [`topology`] - Degree, betweenness and closeness centrality plus network-level summary
//! - [`hubs`] - Hub selection and the pruned hub + first-neighbor display subgraph
//! - [`error`] - Failure kinds for graph construction and extraction
//!
//! Shortest paths are always unweighted; edge weights only carry interaction confidence
//! through to the rendering collaborator.

pub mod builder;
pub mod error;
pub mod hubs;
pub mod network;
pub mod topology;
pub mod view;
