//! In-memory storage for the contract graph
//!
//! Vertices live in an insertion-ordered set so every derived report walks
//! them in first-seen order. Edges are stored once under their canonical
//! (min, max) vertex-id pair; the adjacency lists mirror them for degree
//! queries.

use super::types::{EdgeKey, VertexId};
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};

/// Weighted undirected graph of institutions, vendors and linked aliases
///
/// An edge weight of `Some(w)` is the accumulated contract value between
/// the endpoints; `None` marks an alias link, which carries no value.
#[derive(Debug, Clone, Default)]
pub struct ContractGraph {
    /// Vertex names in insertion order; the set index is the vertex id
    vertices: IndexSet<String>,

    /// Edge weights keyed by canonical vertex pair
    edges: IndexMap<EdgeKey, Option<f64>>,

    /// Neighbor lists, indexed by vertex id
    adjacency: Vec<Vec<VertexId>>,
}

impl ContractGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a vertex by name, inserting it if new
    fn intern(&mut self, name: &str) -> VertexId {
        if let Some(idx) = self.vertices.get_index_of(name) {
            return VertexId::new(idx);
        }
        let (idx, _) = self.vertices.insert_full(name.to_string());
        self.adjacency.push(Vec::new());
        VertexId::new(idx)
    }

    /// Add or accumulate a weighted contract edge
    ///
    /// A repeated (institution, vendor) pair adds its value onto the
    /// existing edge weight. A pair whose names are equal is a no-op; a
    /// self-loop carries no contract information.
    pub fn add_contract_edge(&mut self, institution: &str, vendor: &str, value: f64) {
        let a = self.intern(institution);
        let b = self.intern(vendor);
        if a == b {
            return;
        }

        match self.edges.entry(EdgeKey::new(a, b)) {
            Entry::Occupied(mut entry) => {
                let weight = entry.get_mut();
                *weight = Some(weight.unwrap_or(0.0) + value);
            }
            Entry::Vacant(entry) => {
                entry.insert(Some(value));
                self.adjacency[a.as_usize()].push(b);
                self.adjacency[b.as_usize()].push(a);
            }
        }
    }

    /// Add an unweighted alias link; inserting an existing edge is a no-op
    pub fn add_link_edge(&mut self, alias: &str, vendor: &str) {
        let a = self.intern(alias);
        let b = self.intern(vendor);
        if a == b {
            return;
        }

        if let Entry::Vacant(entry) = self.edges.entry(EdgeKey::new(a, b)) {
            entry.insert(None);
            self.adjacency[a.as_usize()].push(b);
            self.adjacency[b.as_usize()].push(a);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_vertex(&self, name: &str) -> bool {
        self.vertices.contains(name)
    }

    pub fn vertex_id(&self, name: &str) -> Option<VertexId> {
        self.vertices.get_index_of(name).map(VertexId::new)
    }

    pub fn vertex_name(&self, id: VertexId) -> Option<&str> {
        self.vertices.get_index(id.as_usize()).map(String::as_str)
    }

    /// Vertex names in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &str> {
        self.vertices.iter().map(String::as_str)
    }

    /// Number of edges incident to a vertex
    pub fn degree(&self, id: VertexId) -> usize {
        self.adjacency.get(id.as_usize()).map_or(0, Vec::len)
    }

    /// Neighboring vertex ids, in edge-insertion order
    pub fn neighbors(&self, id: VertexId) -> &[VertexId] {
        self.adjacency
            .get(id.as_usize())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edge_key(a, b)
            .map(|key| self.edges.contains_key(&key))
            .unwrap_or(false)
    }

    /// Accumulated weight of the edge between two names
    ///
    /// `None` when the edge is absent or is an unweighted alias link.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let key = self.edge_key(a, b)?;
        self.edges.get(&key).copied().flatten()
    }

    /// All edges as (name, name, weight), in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, Option<f64>)> {
        self.edges.iter().map(|(key, weight)| {
            let (a, b) = key.endpoints();
            (
                self.vertex_name(a).unwrap_or(""),
                self.vertex_name(b).unwrap_or(""),
                *weight,
            )
        })
    }

    /// Sum of all contract edge weights
    pub fn total_weight(&self) -> f64 {
        self.edges.values().filter_map(|w| *w).sum()
    }

    fn edge_key(&self, a: &str, b: &str) -> Option<EdgeKey> {
        Some(EdgeKey::new(self.vertex_id(a)?, self.vertex_id(b)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_edge_accumulates() {
        let mut graph = ContractGraph::new();
        graph.add_contract_edge("A", "X", 100.0);
        graph.add_contract_edge("A", "X", 50.0);

        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_weight("A", "X"), Some(150.0));
        // Undirected: either orientation resolves the same edge
        assert_eq!(graph.edge_weight("X", "A"), Some(150.0));
    }

    #[test]
    fn test_link_edge_is_idempotent() {
        let mut graph = ContractGraph::new();
        graph.add_link_edge("Y", "X");
        graph.add_link_edge("Y", "X");
        graph.add_link_edge("X", "Y");

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge("Y", "X"));
        assert_eq!(graph.edge_weight("Y", "X"), None);
    }

    #[test]
    fn test_link_edge_never_overwrites_weight() {
        let mut graph = ContractGraph::new();
        graph.add_contract_edge("A", "X", 75.0);
        graph.add_link_edge("A", "X");

        assert_eq!(graph.edge_weight("A", "X"), Some(75.0));
    }

    #[test]
    fn test_self_loop_is_skipped() {
        let mut graph = ContractGraph::new();
        graph.add_contract_edge("A", "A", 10.0);
        graph.add_link_edge("B", "B");

        assert_eq!(graph.edge_count(), 0);
        // The names still become vertices
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn test_insertion_order_and_degree() {
        let mut graph = ContractGraph::new();
        graph.add_contract_edge("A", "X", 1.0);
        graph.add_contract_edge("A", "Y", 1.0);
        graph.add_contract_edge("B", "X", 1.0);

        let order: Vec<&str> = graph.vertices().collect();
        assert_eq!(order, vec!["A", "X", "Y", "B"]);

        let a = graph.vertex_id("A").unwrap();
        let x = graph.vertex_id("X").unwrap();
        let y = graph.vertex_id("Y").unwrap();
        assert_eq!(graph.degree(a), 2);
        assert_eq!(graph.degree(x), 2);
        assert_eq!(graph.degree(y), 1);
        assert_eq!(graph.neighbors(a), &[x, y][..]);
    }

    #[test]
    fn test_total_weight_ignores_alias_links() {
        let mut graph = ContractGraph::new();
        graph.add_contract_edge("A", "X", 100.0);
        graph.add_contract_edge("B", "X", 40.0);
        graph.add_link_edge("Y", "X");

        assert_eq!(graph.total_weight(), 140.0);
    }
}
