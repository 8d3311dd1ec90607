//! # netpharm Core Library
//!
//! Links a small molecule to predicted protein targets, intersects those targets with
//! pathway membership, builds a protein-protein interaction network over the intersection,
//! and summarizes its topology to surface hub proteins.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Symbol`, `TargetSet`,
//!   `OverlapSet`, `InteractionGraph`) and the pure graph analytics built on them:
//!   graph construction, centrality metrics, and hub-subgraph extraction.
//!
//! - **[`engine`]: The Policy Layer.** Configuration, the error taxonomy, the reusable
//!   retry policy wrapped around every remote call, the progress reporting interface,
//!   and the traits describing the external collaborators the pipeline talks to.
//!
//! - **[`workflows`]: The Public API.** The staged pipeline orchestrator, which sequences
//!   compound lookup, target prediction, pathway analysis, network construction and
//!   enrichment, gating every stage on the output of the previous one.

pub mod core;
pub mod engine;
pub mod workflows;
