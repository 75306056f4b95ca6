//! Graph construction from the contracts and links tables
//!
//! [`GraphBuilder::from_tables`] validates required columns and extracts
//! deduplicated records; [`GraphBuilder::build`] runs the two edge passes
//! and returns the finalized graph. Row-level defects (missing names,
//! non-positive values, unmatched tax ids) are skipped, never fatal.

use super::record::{ContractRecord, LinkRecord};
use super::store::ContractGraph;
use crate::table::{Table, TableResult};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::info;

/// Required columns of the contracts table
pub const COL_INSTITUTION: &str = "institution";
pub const COL_NAME: &str = "name";
pub const COL_TAX_ID: &str = "tax_id";
pub const COL_CONTRACT_VALUE: &str = "contract_value";

/// Validated, deduplicated inputs for one graph build
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    contracts: Vec<ContractRecord>,
    links: Vec<LinkRecord>,
}

impl GraphBuilder {
    /// Validate both tables and extract their records
    ///
    /// Fails when the contracts table lacks any of `institution`, `name`,
    /// `tax_id`, `contract_value`, or the links table lacks `tax_id` or
    /// `name`. Links are deduplicated by (tax_id, name); contract rows
    /// collapse only when fully identical, so repeated awards between the
    /// same parties keep accumulating into the edge weight.
    pub fn from_tables(contracts: &Table, links: &Table) -> TableResult<Self> {
        let mut contracts = contract_records(contracts)?;
        let mut links = link_records(links)?;

        let mut seen_contracts = FxHashSet::default();
        contracts.retain(|r| {
            seen_contracts.insert((
                r.institution.clone(),
                r.vendor.clone(),
                r.tax_id.clone(),
                r.value.to_bits(),
            ))
        });

        let mut seen_links = FxHashSet::default();
        links.retain(|l| seen_links.insert((l.tax_id.clone(), l.alias.clone())));

        Ok(GraphBuilder { contracts, links })
    }

    /// Contract records after validation and dedup
    pub fn contracts(&self) -> &[ContractRecord] {
        &self.contracts
    }

    /// Link records after validation and dedup
    pub fn links(&self) -> &[LinkRecord] {
        &self.links
    }

    /// Build the contract graph
    ///
    /// Pass 1 adds a weighted edge per contract row with both parties
    /// present and a positive value, accumulating repeats. Pass 2 connects
    /// each link alias to every vendor already in the graph that shares
    /// its tax id.
    pub fn build(&self) -> ContractGraph {
        let mut graph = ContractGraph::new();

        for record in &self.contracts {
            if record.institution.is_empty() || record.vendor.is_empty() {
                continue;
            }
            if record.value <= 0.0 {
                continue;
            }
            graph.add_contract_edge(&record.institution, &record.vendor, record.value);
        }

        let mut by_tax_id: FxHashMap<&str, Vec<&ContractRecord>> = FxHashMap::default();
        for record in &self.contracts {
            if !record.tax_id.is_empty() {
                by_tax_id.entry(record.tax_id.as_str()).or_default().push(record);
            }
        }

        for link in &self.links {
            if link.tax_id.is_empty() || link.alias.is_empty() {
                continue;
            }
            let Some(matches) = by_tax_id.get(link.tax_id.as_str()) else {
                continue;
            };
            for record in matches {
                if record.vendor != link.alias && graph.contains_vertex(&record.vendor) {
                    graph.add_link_edge(&link.alias, &record.vendor);
                }
            }
        }

        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "contract graph built"
        );
        graph
    }
}

fn contract_records(table: &Table) -> TableResult<Vec<ContractRecord>> {
    let institution = table.require_column(COL_INSTITUTION)?;
    let vendor = table.require_column(COL_NAME)?;
    let tax_id = table.require_column(COL_TAX_ID)?;
    let value = table.require_column(COL_CONTRACT_VALUE)?;

    Ok(table
        .rows
        .iter()
        .map(|row| ContractRecord {
            institution: table.cell(row, institution).to_string(),
            vendor: table.cell(row, vendor).to_string(),
            tax_id: table.cell(row, tax_id).to_string(),
            value: parse_value(table.cell(row, value)),
        })
        .collect())
}

fn link_records(table: &Table) -> TableResult<Vec<LinkRecord>> {
    let tax_id = table.require_column(COL_TAX_ID)?;
    let alias = table.require_column(COL_NAME)?;

    Ok(table
        .rows
        .iter()
        .map(|row| LinkRecord {
            tax_id: table.cell(row, tax_id).to_string(),
            alias: table.cell(row, alias).to_string(),
        })
        .collect())
}

/// Parse a contract value; anything malformed or non-finite counts as 0.0
/// and is skipped by the positive-value filter.
fn parse_value(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
