//! # Engine Module
//!
//! Policy shared by every pipeline stage: how remote calls are retried and paced, how
//! a run is configured, how failures are classified, and how progress is reported.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Thresholds, network scope, hub count, and retry
//!   timing, assembled and range-checked by `PipelineConfigBuilder`
//! - **Retry Policy** ([`retry`]) - One reusable wrapper around every remote call:
//!   request pacing, exponential backoff on transient failures, no retry on permanent ones
//! - **Collaborators** ([`collaborators`]) - Traits for the compound, target, pathway,
//!   interaction and enrichment services
//! - **State Tracking** ([`state`]) - Stage order, pipeline states, per-item tallies,
//!   and the run report
//! - **Progress Monitoring** ([`progress`]) - A context-passed callback interface; the
//!   library never installs global logging state
//! - **Error Handling** ([`error`]) - Transient/permanent fetch failures and the fatal
//!   run-level taxonomy with remediation hints

pub mod collaborators;
pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod retry;
pub mod state;
