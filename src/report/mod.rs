//! Derived reports over a finalized contract graph
//!
//! Every function here is a read-only projection: the graph is built once
//! and never mutated afterwards. Reports walk vertices in insertion order
//! so output rows are stable across runs.

use crate::graph::{ContractGraph, ContractRecord, LinkRecord, VertexId};
use crate::table::{TableError, TableResult};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// Sentinel written when no table resolves a vertex's tax id
pub const TAX_ID_UNAVAILABLE: &str = "not available";

/// Minimum rendered node size
pub const BASE_NODE_SIZE: f64 = 300.0;

/// Extra size span distributed proportionally to contract value
pub const NODE_SIZE_SPAN: f64 = 1000.0;

/// One row of the vertex identity table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VertexEntry {
    /// 1-based position in vertex insertion order
    pub number: usize,
    pub name: String,
    pub tax_id: String,
}

/// One row of a degree ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegreeEntry {
    pub name: String,
    pub degree: usize,
}

/// Which vertices a degree ranking keeps
#[derive(Debug, Clone)]
pub enum DegreeFilter<'a> {
    /// Vertices whose degree exceeds the threshold
    MinDegree(usize),

    /// Vertices whose name appears in the reference set
    Members(&'a FxHashSet<String>),
}

/// Compute the rendered size of every vertex
///
/// Raw value per vertex: max contract value over rows where it is the
/// institution, else the sum over rows where it is the vendor, else 1.0
/// for aliases. Sizes scale the raw value against the global maximum,
/// which is computed up front over all vertices. When the maximum is not
/// positive every vertex gets [`BASE_NODE_SIZE`].
pub fn node_sizes(graph: &ContractGraph, contracts: &[ContractRecord]) -> IndexMap<String, f64> {
    let mut institution_max: FxHashMap<&str, f64> = FxHashMap::default();
    let mut vendor_sum: FxHashMap<&str, f64> = FxHashMap::default();
    for record in contracts {
        if !record.institution.is_empty() {
            let slot = institution_max
                .entry(record.institution.as_str())
                .or_insert(record.value);
            if record.value > *slot {
                *slot = record.value;
            }
        }
        if !record.vendor.is_empty() {
            *vendor_sum.entry(record.vendor.as_str()).or_insert(0.0) += record.value;
        }
    }

    let raw: Vec<f64> = graph
        .vertices()
        .map(|name| {
            if let Some(&max) = institution_max.get(name) {
                max
            } else if let Some(&sum) = vendor_sum.get(name) {
                sum
            } else {
                1.0
            }
        })
        .collect();
    let global_max = raw.iter().copied().fold(0.0_f64, f64::max);

    let mut sizes = IndexMap::with_capacity(raw.len());
    for (name, value) in graph.vertices().zip(raw) {
        let size = if global_max > 0.0 {
            BASE_NODE_SIZE + value / global_max * NODE_SIZE_SPAN
        } else {
            BASE_NODE_SIZE
        };
        sizes.insert(name.to_string(), size);
    }
    sizes
}

/// Build the vertex identity table, in insertion order with 1-based numbers
///
/// Tax-id resolution priority per vertex: first contracts row where the
/// name is the institution, then first contracts row where it is the
/// vendor, then first links row where it is the alias, else the
/// [`TAX_ID_UNAVAILABLE`] sentinel.
pub fn vertex_table(
    graph: &ContractGraph,
    contracts: &[ContractRecord],
    links: &[LinkRecord],
) -> Vec<VertexEntry> {
    let mut institution_tax: FxHashMap<&str, &str> = FxHashMap::default();
    let mut vendor_tax: FxHashMap<&str, &str> = FxHashMap::default();
    for record in contracts {
        institution_tax
            .entry(record.institution.as_str())
            .or_insert(record.tax_id.as_str());
        vendor_tax
            .entry(record.vendor.as_str())
            .or_insert(record.tax_id.as_str());
    }
    let mut alias_tax: FxHashMap<&str, &str> = FxHashMap::default();
    for link in links {
        alias_tax
            .entry(link.alias.as_str())
            .or_insert(link.tax_id.as_str());
    }

    graph
        .vertices()
        .enumerate()
        .map(|(idx, name)| VertexEntry {
            number: idx + 1,
            name: name.to_string(),
            tax_id: institution_tax
                .get(name)
                .or_else(|| vendor_tax.get(name))
                .or_else(|| alias_tax.get(name))
                .copied()
                .unwrap_or(TAX_ID_UNAVAILABLE)
                .to_string(),
        })
        .collect()
}

/// Rank vertices by degree, descending
///
/// The sort is stable, so vertices with equal degree keep their insertion
/// order.
pub fn rank_degrees(graph: &ContractGraph, filter: DegreeFilter<'_>) -> Vec<DegreeEntry> {
    let mut entries: Vec<DegreeEntry> = graph
        .vertices()
        .enumerate()
        .filter_map(|(idx, name)| {
            let degree = graph.degree(VertexId::new(idx));
            let keep = match &filter {
                DegreeFilter::MinDegree(min) => degree > *min,
                DegreeFilter::Members(names) => names.contains(name),
            };
            keep.then(|| DegreeEntry {
                name: name.to_string(),
                degree,
            })
        })
        .collect();
    entries.sort_by(|a, b| b.degree.cmp(&a.degree));
    entries
}

/// Write the vertex identity table as CSV (`Number`, `Vertex`, `Tax-ID`)
pub fn write_vertex_table(entries: &[VertexEntry], path: &Path) -> TableResult<()> {
    let file = File::create(path).map_err(|e| TableError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["Number", "Vertex", "Tax-ID"])
        .map_err(|e| TableError::csv(path, e))?;
    for entry in entries {
        let number = entry.number.to_string();
        writer
            .write_record([number.as_str(), &entry.name, &entry.tax_id])
            .map_err(|e| TableError::csv(path, e))?;
    }
    writer.flush().map_err(|e| TableError::io(path, e))?;
    Ok(())
}

/// Write a degree ranking as CSV (`Vertex`, `Degree`)
pub fn write_degree_ranking(entries: &[DegreeEntry], path: &Path) -> TableResult<()> {
    let file = File::create(path).map_err(|e| TableError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["Vertex", "Degree"])
        .map_err(|e| TableError::csv(path, e))?;
    for entry in entries {
        let degree = entry.degree.to_string();
        writer
            .write_record([entry.name.as_str(), degree.as_str()])
            .map_err(|e| TableError::csv(path, e))?;
    }
    writer.flush().map_err(|e| TableError::io(path, e))?;
    Ok(())
}

/// Write the node-size map as CSV (`Vertex`, `Size`)
pub fn write_node_sizes(sizes: &IndexMap<String, f64>, path: &Path) -> TableResult<()> {
    let file = File::create(path).map_err(|e| TableError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["Vertex", "Size"])
        .map_err(|e| TableError::csv(path, e))?;
    for (name, size) in sizes {
        let size = size.to_string();
        writer
            .write_record([name.as_str(), size.as_str()])
            .map_err(|e| TableError::csv(path, e))?;
    }
    writer.flush().map_err(|e| TableError::io(path, e))?;
    Ok(())
}
