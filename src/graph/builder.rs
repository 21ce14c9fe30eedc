//! Graph construction via depth-first traversal.
//!
//! [`GraphBuilder`] resolves a root package into a full
//! [`DependencyGraph`] by fetching direct-dependency lists on demand. The
//! traversal visits every reachable package exactly once, records a cycle
//! whenever it meets a package already on the active path, and applies a
//! [`PackageFilter`] before a package can enter the graph or be descended
//! into, so filtered packages are invisible both as entries and as listed
//! dependencies.

use std::collections::HashSet;

use crate::fetch::DependencySource;

use super::dependency_graph::{CycleInfo, DependencyGraph};

/// A case-insensitive substring filter over package names.
///
/// An empty substring matches nothing, which disables filtering.
///
/// # Example
///
/// ```rust
/// use depscope::graph::PackageFilter;
///
/// let filter = PackageFilter::new("Test");
/// assert!(filter.matches("pytest-cov"));
/// assert!(filter.matches("TESTTOOLS"));
/// assert!(!filter.matches("requests"));
///
/// assert!(!PackageFilter::disabled().matches("anything"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    substring: String,
}

impl PackageFilter {
    /// Creates a filter for the given substring.
    ///
    /// The substring is lowercased once here; matching lowercases each
    /// candidate name. An empty substring yields a disabled filter.
    pub fn new(substring: &str) -> Self {
        Self {
            substring: substring.to_lowercase(),
        }
    }

    /// Creates a filter that excludes nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Returns true if filtering is inactive.
    pub fn is_disabled(&self) -> bool {
        self.substring.is_empty()
    }

    /// Returns true if `package` should be excluded from the graph.
    pub fn matches(&self, package: &str) -> bool {
        !self.substring.is_empty() && package.to_lowercase().contains(&self.substring)
    }
}

/// Builds dependency graphs from a [`DependencySource`].
///
/// The builder itself is stateless between calls: every [`build`](Self::build)
/// creates its traversal bookkeeping (graph, visited set, active path,
/// cycle list) fresh, and the filter is an explicit argument rather than
/// instance state, so one builder can serve several builds with different
/// filters.
#[derive(Clone, Copy)]
pub struct GraphBuilder<'a> {
    source: &'a dyn DependencySource,
}

impl<'a> GraphBuilder<'a> {
    /// Creates a builder over the given dependency source.
    pub fn new(source: &'a dyn DependencySource) -> Self {
        Self { source }
    }

    /// Resolves the transitive dependency graph of `root`.
    ///
    /// Guarantees:
    /// - every package reachable through non-filtered edges appears as an
    ///   entry; filtered packages appear nowhere
    /// - each package's dependencies are fetched at most once
    /// - the traversal terminates even on cyclic sources
    /// - a failed fetch is recorded as an empty dependency list for that
    ///   package and never aborts the build
    ///
    /// Cycle records travel with the returned graph; see
    /// [`DependencyGraph::cycles`].
    pub fn build(&self, root: &str, filter: &PackageFilter) -> DependencyGraph {
        let mut traversal = Traversal {
            source: self.source,
            filter,
            graph: DependencyGraph::new(),
            visited: HashSet::new(),
            path: Vec::new(),
            cycles: Vec::new(),
        };

        traversal.visit(root);

        let Traversal {
            mut graph, cycles, ..
        } = traversal;
        graph.set_cycles(cycles);
        graph
    }
}

/// Bookkeeping for one depth-first build.
///
/// `path` is the ordered root-to-here stack, used only for cycle
/// detection; `visited` holds packages whose expansion has completed.
struct Traversal<'a> {
    source: &'a dyn DependencySource,
    filter: &'a PackageFilter,
    graph: DependencyGraph,
    visited: HashSet<String>,
    path: Vec<String>,
    cycles: Vec<CycleInfo>,
}

impl Traversal<'_> {
    fn visit(&mut self, package: &str) {
        // Filtered packages are invisible: no entry, no visited mark,
        // no recursion.
        if self.filter.matches(package) {
            return;
        }

        // A package already on the active path means a back-edge. Record
        // the ordered path slice from its first occurrence, closed with
        // the repeat, and stop; the node is still being expanded in an
        // outer frame, so it must not be marked visited here.
        if let Some(start) = self.path.iter().position(|p| p == package) {
            let mut nodes = self.path[start..].to_vec();
            nodes.push(package.to_string());
            self.cycles.push(CycleInfo::new(nodes));
            return;
        }

        if self.visited.contains(package) {
            return;
        }

        self.path.push(package.to_string());

        let dependencies: Vec<String> = match self.source.direct_dependencies(package) {
            Ok(deps) => deps
                .into_iter()
                .filter(|dep| !self.filter.matches(dep))
                .collect(),
            Err(err) => {
                // A failed fetch collapses to an empty dependency list;
                // the log line is the only trace of the difference.
                log::warn!("dependency fetch failed for '{package}': {err}");
                Vec::new()
            }
        };

        self.graph.insert_package(package, dependencies.clone());

        for dep in &dependencies {
            self.visit(dep);
        }

        // The fetch error was absorbed above, so every visit that pushed
        // reaches this point: unwind the path, then retire the package.
        self.path.pop();
        self.visited.insert(package.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, FetchResult};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory source scripted from `NAME -> deps` pairs, counting
    /// lookups so tests can assert single-fetch behavior.
    struct ScriptedSource {
        records: HashMap<String, Vec<String>>,
        fail_for: Vec<String>,
        lookups: RefCell<HashMap<String, usize>>,
    }

    impl ScriptedSource {
        fn new(records: &[(&str, &[&str])]) -> Self {
            Self {
                records: records
                    .iter()
                    .map(|(name, deps)| {
                        (
                            name.to_string(),
                            deps.iter().map(|d| d.to_string()).collect(),
                        )
                    })
                    .collect(),
                fail_for: Vec::new(),
                lookups: RefCell::new(HashMap::new()),
            }
        }

        fn failing_for(mut self, package: &str) -> Self {
            self.fail_for.push(package.to_string());
            self
        }

        fn lookup_count(&self, package: &str) -> usize {
            self.lookups.borrow().get(package).copied().unwrap_or(0)
        }
    }

    impl DependencySource for ScriptedSource {
        fn direct_dependencies(&self, package: &str) -> FetchResult<Vec<String>> {
            *self
                .lookups
                .borrow_mut()
                .entry(package.to_string())
                .or_insert(0) += 1;

            if self.fail_for.iter().any(|p| p == package) {
                return Err(FetchError::PackageNotFound {
                    package: package.to_string(),
                });
            }
            Ok(self.records.get(package).cloned().unwrap_or_default())
        }
    }

    fn deps(graph: &DependencyGraph, name: &str) -> Vec<String> {
        graph
            .dependencies_of(name)
            .unwrap_or_else(|| panic!("no entry for '{name}'"))
            .to_vec()
    }

    #[test]
    fn test_build_linear_chain() {
        let source = ScriptedSource::new(&[("A", &["B", "C"]), ("B", &["C"]), ("C", &[])]);
        let graph = GraphBuilder::new(&source).build("A", &PackageFilter::disabled());

        assert_eq!(graph.package_count(), 3);
        assert_eq!(deps(&graph, "A"), vec!["B", "C"]);
        assert_eq!(deps(&graph, "B"), vec!["C"]);
        assert!(deps(&graph, "C").is_empty());
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_each_package_fetched_once() {
        // Diamond: D is reachable through both B and C.
        let source = ScriptedSource::new(&[
            ("A", &["B", "C"]),
            ("B", &["D"]),
            ("C", &["D"]),
            ("D", &[]),
        ]);
        let graph = GraphBuilder::new(&source).build("A", &PackageFilter::disabled());

        assert_eq!(graph.package_count(), 4);
        for pkg in ["A", "B", "C", "D"] {
            assert_eq!(source.lookup_count(pkg), 1, "{pkg} fetched more than once");
        }
    }

    #[test]
    fn test_two_node_cycle() {
        let source = ScriptedSource::new(&[("A", &["B"]), ("B", &["A"])]);
        let graph = GraphBuilder::new(&source).build("A", &PackageFilter::disabled());

        // The entry is stored before recursing, so the back-edge shows up
        // in both lists; only the expansion is truncated.
        assert_eq!(deps(&graph, "A"), vec!["B"]);
        assert_eq!(deps(&graph, "B"), vec!["A"]);

        assert_eq!(graph.cycles().len(), 1);
        let cycle = &graph.cycles()[0];
        assert!(cycle.involves("A"));
        assert!(cycle.involves("B"));
        assert_eq!(cycle.nodes, vec!["A", "B", "A"]);
    }

    #[test]
    fn test_three_node_cycle_path_is_ordered() {
        let source = ScriptedSource::new(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let graph = GraphBuilder::new(&source).build("a", &PackageFilter::disabled());

        assert_eq!(graph.cycles().len(), 1);
        assert_eq!(graph.cycles()[0].nodes, vec!["a", "b", "c", "a"]);
        assert_eq!(graph.cycles()[0].cycle_path(), "a -> b -> c -> a");
    }

    #[test]
    fn test_self_loop() {
        let source = ScriptedSource::new(&[("A", &["A"])]);
        let graph = GraphBuilder::new(&source).build("A", &PackageFilter::disabled());

        assert_eq!(deps(&graph, "A"), vec!["A"]);
        assert_eq!(graph.cycles().len(), 1);
        assert_eq!(graph.cycles()[0].nodes, vec!["A", "A"]);
    }

    #[test]
    fn test_back_edge_into_inner_node() {
        // Cycle that does not pass through the root: A -> B -> C -> B.
        let source = ScriptedSource::new(&[("A", &["B"]), ("B", &["C"]), ("C", &["B"])]);
        let graph = GraphBuilder::new(&source).build("A", &PackageFilter::disabled());

        assert_eq!(graph.cycles().len(), 1);
        assert_eq!(graph.cycles()[0].nodes, vec!["B", "C", "B"]);
        assert!(!graph.cycles()[0].involves("A"));
    }

    #[test]
    fn test_recorded_cycles_agree_with_edge_structure() {
        let cyclic = ScriptedSource::new(&[("A", &["B"]), ("B", &["A"])]);
        let graph = GraphBuilder::new(&cyclic).build("A", &PackageFilter::disabled());
        assert_eq!(graph.has_cycles(), graph.is_structurally_cyclic());
        assert!(graph.has_cycles());

        let acyclic = ScriptedSource::new(&[("A", &["B"]), ("B", &[])]);
        let graph = GraphBuilder::new(&acyclic).build("A", &PackageFilter::disabled());
        assert_eq!(graph.has_cycles(), graph.is_structurally_cyclic());
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_filter_excludes_key_and_listing() {
        let source = ScriptedSource::new(&[("A", &["B", "Clib"]), ("B", &[]), ("Clib", &["D"])]);
        let graph = GraphBuilder::new(&source).build("A", &PackageFilter::new("c"));

        assert_eq!(graph.package_count(), 2);
        assert_eq!(deps(&graph, "A"), vec!["B"]);
        assert!(!graph.contains("Clib"));
        // Clib was never even fetched
        assert_eq!(source.lookup_count("Clib"), 0);
    }

    #[test]
    fn test_filter_is_transitive_in_effect() {
        // D is only reachable through the filtered package.
        let source = ScriptedSource::new(&[("A", &["Xfilter"]), ("Xfilter", &["D"]), ("D", &[])]);
        let graph = GraphBuilder::new(&source).build("A", &PackageFilter::new("xfilter"));

        assert!(deps(&graph, "A").is_empty());
        assert!(!graph.contains("Xfilter"));
        assert!(!graph.contains("D"));
    }

    #[test]
    fn test_filtered_root_yields_empty_graph() {
        let source = ScriptedSource::new(&[("App", &["B"])]);
        let graph = GraphBuilder::new(&source).build("App", &PackageFilter::new("app"));

        assert!(graph.is_empty());
        assert!(!graph.has_cycles());
        assert_eq!(source.lookup_count("App"), 0);
    }

    #[test]
    fn test_fetch_failure_collapses_to_empty_list() {
        let source =
            ScriptedSource::new(&[("A", &["B", "C"]), ("C", &["D"]), ("D", &[])]).failing_for("B");
        let graph = GraphBuilder::new(&source).build("A", &PackageFilter::disabled());

        // B failed, siblings and their subtrees are unaffected.
        assert!(deps(&graph, "B").is_empty());
        assert_eq!(deps(&graph, "C"), vec!["D"]);
        assert!(graph.contains("D"));
    }

    #[test]
    fn test_build_is_idempotent() {
        let source = ScriptedSource::new(&[("A", &["B", "C"]), ("B", &["C"]), ("C", &[])]);
        let builder = GraphBuilder::new(&source);
        let filter = PackageFilter::disabled();

        let first = builder.build("A", &filter);
        let second = builder.build("A", &filter);

        assert_eq!(first.package_count(), second.package_count());
        for node in first.packages() {
            assert_eq!(
                second.dependencies_of(&node.name),
                Some(node.dependencies.as_slice())
            );
        }
        assert_eq!(first.cycles(), second.cycles());
    }

    #[test]
    fn test_builder_reusable_with_different_filters() {
        let source = ScriptedSource::new(&[("A", &["B", "Clib"]), ("B", &[]), ("Clib", &[])]);
        let builder = GraphBuilder::new(&source);

        let unfiltered = builder.build("A", &PackageFilter::disabled());
        assert_eq!(unfiltered.package_count(), 3);

        let filtered = builder.build("A", &PackageFilter::new("c"));
        assert_eq!(filtered.package_count(), 2);
    }

    #[test]
    fn test_unknown_root_from_failing_source() {
        let source = ScriptedSource::new(&[]).failing_for("Ghost");
        let graph = GraphBuilder::new(&source).build("Ghost", &PackageFilter::disabled());

        // The builder itself recovers even for the root; aborting on a
        // root fetch failure is the caller's policy.
        assert_eq!(graph.package_count(), 1);
        assert!(deps(&graph, "Ghost").is_empty());
    }

    #[test]
    fn test_casing_preserved_filter_case_insensitive() {
        let source = ScriptedSource::new(&[("App", &["LibX", "devtool"]), ("LibX", &[])]);
        let graph = GraphBuilder::new(&source).build("App", &PackageFilter::new("DEV"));

        assert!(graph.contains("LibX"));
        assert_eq!(deps(&graph, "App"), vec!["LibX"]);
        assert!(!graph.contains("devtool"));
    }

    #[test]
    fn test_duplicate_listing_visits_once() {
        let source = ScriptedSource::new(&[("A", &["B", "B"]), ("B", &[])]);
        let graph = GraphBuilder::new(&source).build("A", &PackageFilter::disabled());

        assert_eq!(deps(&graph, "A"), vec!["B", "B"]);
        assert_eq!(source.lookup_count("B"), 1);
    }

    #[test]
    fn test_filter_disabled_flag() {
        assert!(PackageFilter::disabled().is_disabled());
        assert!(PackageFilter::new("").is_disabled());
        assert!(!PackageFilter::new("x").is_disabled());
    }
}
