//! Reading tabular inputs produced by external collaborators.
//!
//! The core owns no persisted format of its own; this module only turns delimited
//! text into the raw row types the rest of the crate validates.

pub mod edge_table;
pub mod traits;
