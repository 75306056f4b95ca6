//! Vinculo — contract network analysis toolkit
//!
//! Builds a weighted undirected graph of institutions, vendors and linked
//! aliases from two CSV tables (a contracts table and an identity-links
//! table), then derives read-only reports from the finalized graph: a
//! vertex identity table, a node-size map for rendering, and degree
//! rankings. A set of CSV cleaning transforms (tax-id formatting, name
//! normalization, column removal, deduplication) prepares the inputs.
//!
//! # Example
//!
//! ```rust
//! use vinculo::{GraphBuilder, Table};
//!
//! let mut contracts = Table::new(["institution", "name", "tax_id", "contract_value"]);
//! contracts.push_row(["City Health Dept", "Acme Supplies", "19131243000197", "1500.0"]);
//! contracts.push_row(["City Health Dept", "Acme Supplies", "19131243000197", "500.0"]);
//! let links = Table::new(["tax_id", "name"]);
//!
//! let graph = GraphBuilder::from_tables(&contracts, &links).unwrap().build();
//!
//! assert_eq!(graph.vertex_count(), 2);
//! assert_eq!(graph.edge_weight("City Health Dept", "Acme Supplies"), Some(2000.0));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod clean;
pub mod graph;
pub mod report;
pub mod table;

// Re-export main types for convenience
pub use graph::{ContractGraph, ContractRecord, GraphBuilder, LinkRecord, VertexId};
pub use report::{DegreeEntry, DegreeFilter, VertexEntry};
pub use table::{Table, TableError, TableResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
