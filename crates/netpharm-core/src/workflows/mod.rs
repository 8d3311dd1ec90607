//! # Workflows Module
//!
//! The top-level entry point of the library: a staged pipeline that takes one compound
//! from identifier to interaction network and enrichment.
//!
//! ## Architecture
//!
//! - **Pipeline** ([`pipeline`]) - Owns the run state, gates every stage on the output of
//!   the previous one, and collects a per-stage report.
//! - **Stages** ([`stages`]) - Compound lookup, target prediction, pathway analysis,
//!   network construction and enrichment as plain functions over immutable records.
//!
//! Fatal conditions (nothing usable left after a stage) abort the run with
//! [`PipelineError`](crate::engine::error::PipelineError); per-item failures inside a
//! stage are logged, reported as skipped, and counted in that stage's tally.

pub mod pipeline;
pub mod stages;

#[cfg(test)]
pub(crate) mod testing;
