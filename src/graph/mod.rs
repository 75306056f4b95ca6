//! Contract graph construction
//!
//! This module implements the institution-vendor network:
//! - Insertion-ordered vertices keyed by display name, one shared
//!   namespace for institutions, vendors and linked aliases
//! - Undirected edges stored once under a canonical vertex-id pair;
//!   contract edges accumulate weight, alias links carry none
//! - A builder that validates the input tables, extracts records and
//!   runs the two edge passes

pub mod build;
pub mod record;
pub mod store;
pub mod types;

// Re-export main types
pub use build::GraphBuilder;
pub use record::{ContractRecord, LinkRecord};
pub use store::ContractGraph;
pub use types::{EdgeKey, VertexId};
