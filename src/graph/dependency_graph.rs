//! Dependency graph implementation using petgraph.
//!
//! Provides a directed graph structure for modeling resolved package
//! dependencies, with ordered adjacency lists, reverse-dependency queries,
//! and the cycle records collected while the graph was built.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Represents a node in the dependency graph.
///
/// Each node is a package together with its post-filter direct
/// dependencies, in the order the dependency source returned them.
#[derive(Debug, Clone)]
pub struct PackageNode {
    /// Package name, preserving the casing first encountered.
    pub name: String,
    /// Direct dependencies in source order (already filtered).
    pub dependencies: Vec<String>,
}

impl PackageNode {
    /// Creates a new package node.
    pub fn new(name: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            dependencies,
        }
    }

    /// Returns true if this package has no recorded dependencies.
    ///
    /// Note that a package whose fetch failed is indistinguishable from a
    /// package with no dependencies; both carry an empty list.
    pub fn is_leaf(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// A directed graph of resolved package dependencies.
///
/// The graph uses petgraph's `DiGraph` internally, with nodes representing
/// packages and edges pointing from a package to each of its dependencies.
/// The ordered dependency list lives in the node weight; edges mirror it
/// for structural queries. Nodes iterate in insertion order, which for a
/// built graph is depth-first pre-order from the root.
///
/// A graph is produced by [`GraphBuilder::build`](super::GraphBuilder::build)
/// and is read-only afterwards.
///
/// # Example
///
/// ```rust
/// use depscope::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.insert_package("app", vec!["lib".to_string()]);
/// graph.insert_package("lib", Vec::new());
///
/// assert_eq!(graph.package_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.reverse_dependencies("lib"), vec!["app"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<PackageNode, ()>,
    /// Maps package names to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
    /// Cycles recorded by the traversal that built this graph
    cycles: Vec<CycleInfo>,
}

impl DependencyGraph {
    /// Creates a new empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a package and its ordered dependency list.
    ///
    /// Creates nodes for the package and for any dependency not seen yet,
    /// and adds one edge per listed dependency. Called again for a name
    /// that already exists (a dependency encountered before its own
    /// expansion), it fills in that node's dependency list.
    ///
    /// # Arguments
    ///
    /// * `name` - Package name
    /// * `dependencies` - Post-filter direct dependencies, in source order
    ///
    /// # Returns
    ///
    /// The `NodeIndex` of the package's node.
    pub fn insert_package(&mut self, name: &str, dependencies: Vec<String>) -> NodeIndex {
        let idx = self.ensure_node(name);

        for dep in &dependencies {
            let dep_idx = self.ensure_node(dep);
            self.graph.add_edge(idx, dep_idx, ());
        }
        self.graph[idx].dependencies = dependencies;

        idx
    }

    /// Returns the node for `name`, creating an empty one if absent.
    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(PackageNode::new(name, Vec::new()));
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    /// Attaches the cycle records collected during the build.
    pub(crate) fn set_cycles(&mut self, cycles: Vec<CycleInfo>) {
        self.cycles = cycles;
    }

    /// Gets a reference to a package node by name.
    pub fn get_node(&self, name: &str) -> Option<&PackageNode> {
        self.node_indices
            .get(name)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Gets the ordered dependency list of a package.
    ///
    /// # Returns
    ///
    /// `Some(&[String])` for a package in the graph, `None` for a package
    /// that was filtered out or never reached.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depscope::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.insert_package("app", vec!["lib".to_string()]);
    ///
    /// assert_eq!(graph.dependencies_of("app"), Some(&["lib".to_string()][..]));
    /// assert_eq!(graph.dependencies_of("ghost"), None);
    /// ```
    pub fn dependencies_of(&self, name: &str) -> Option<&[String]> {
        self.get_node(name).map(|node| node.dependencies.as_slice())
    }

    /// Iterates over all packages in insertion order.
    pub fn packages(&self) -> impl Iterator<Item = &PackageNode> {
        self.graph.node_weights()
    }

    /// Returns the packages that list `target` as a direct dependency.
    ///
    /// Linear scan over the graph's entries; the result is unsorted, so
    /// callers sort for display.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depscope::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.insert_package("app", vec!["lib".to_string()]);
    /// graph.insert_package("tool", vec!["lib".to_string()]);
    /// graph.insert_package("lib", Vec::new());
    ///
    /// let mut dependents = graph.reverse_dependencies("lib");
    /// dependents.sort();
    /// assert_eq!(dependents, vec!["app", "tool"]);
    /// assert!(graph.reverse_dependencies("app").is_empty());
    /// ```
    pub fn reverse_dependencies(&self, target: &str) -> Vec<&str> {
        self.graph
            .node_weights()
            .filter(|node| node.dependencies.iter().any(|dep| dep == target))
            .map(|node| node.name.as_str())
            .collect()
    }

    /// Returns the cycle records collected while this graph was built.
    pub fn cycles(&self) -> &[CycleInfo] {
        &self.cycles
    }

    /// Returns true if the build recorded at least one cycle.
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Checks the edge structure itself for cycles.
    ///
    /// Agrees with [`has_cycles`](Self::has_cycles) for any graph produced
    /// by a full traversal; exposed so that can be asserted.
    pub fn is_structurally_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Returns the number of packages in the graph.
    pub fn package_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of dependency edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if a package exists in the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }
}

/// Information about a detected circular dependency.
///
/// Holds the traversal path slice from the first occurrence of the
/// repeated package to the back-edge, closed with the repeated package
/// itself: a two-package cycle reads `["A", "B", "A"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleInfo {
    /// The packages along the cycle, first element repeated at the end
    pub nodes: Vec<String>,
}

impl CycleInfo {
    /// Creates a cycle record from an ordered, closed path.
    pub fn new(nodes: Vec<String>) -> Self {
        Self { nodes }
    }

    /// Returns a formatted string representation of the cycle path.
    ///
    /// For example: "a -> b -> a"
    pub fn cycle_path(&self) -> String {
        self.nodes.join(" -> ")
    }

    /// Returns true if the cycle passes through `name`.
    pub fn involves(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n == name)
    }

    /// Returns the number of entries in the closed path.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the record is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
