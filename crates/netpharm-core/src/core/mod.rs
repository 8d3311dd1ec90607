//! # Core Module
//!
//! Stateless building blocks of the pipeline.
//!
//! - **Data Models** ([`models`]) - Entity symbols, compounds, target and pathway sets,
//!   interaction edges, and enrichment terms
//! - **Graph Analytics** ([`graph`]) - The weighted interaction graph, its builder,
//!   topology metrics, and the hub + first-neighbor display subgraph
//! - **Tabular Input** ([`io`]) - Reading tab-separated interaction tables into raw rows
//!
//! Nothing in this module performs remote calls, sleeps, or holds state across runs.

pub mod graph;
pub mod io;
pub mod models;
