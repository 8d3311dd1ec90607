//! # Core Models Module
//!
//! Data records passed between pipeline stages. Every record is produced once by a
//! stage and read-only afterwards.
//!
//! - [`symbol`] - Case-normalized protein/gene identifiers
//! - [`compound`] - Compound queries and the record returned by compound lookup
//! - [`targets`] - Predicted targets and the merged `TargetSet`
//! - [`pathways`] - Pathway references, pathway membership, and the `OverlapSet`
//! - [`interaction`] - Raw interaction rows and validated `InteractionEdge`s
//! - [`enrichment`] - Functional enrichment terms and significance filtering
//! - [`validation`] - Input format checks shared by the models
//! - [`ids`] - Slot-map keys for graph nodes

pub mod compound;
pub mod enrichment;
pub mod ids;
pub mod interaction;
pub mod pathways;
pub mod symbol;
pub mod targets;
pub mod validation;
