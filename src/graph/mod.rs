//! Graph module for dependency relationship modeling.
//!
//! [`GraphBuilder`] performs the depth-first traversal that resolves a
//! root package into a [`DependencyGraph`], fetching edges on demand from a
//! [`DependencySource`](crate::fetch::DependencySource), deduplicating
//! revisits, recording cycles, and applying a [`PackageFilter`] to both
//! inclusion and traversal.
//!
//! # Example
//!
//! ```rust
//! use depscope::fetch::{DependencySource, FetchResult};
//! use depscope::graph::{GraphBuilder, PackageFilter};
//!
//! struct Fixed;
//!
//! impl DependencySource for Fixed {
//!     fn direct_dependencies(&self, package: &str) -> FetchResult<Vec<String>> {
//!         Ok(match package {
//!             "A" => vec!["B".to_string()],
//!             _ => Vec::new(),
//!         })
//!     }
//! }
//!
//! let source = Fixed;
//! let graph = GraphBuilder::new(&source).build("A", &PackageFilter::disabled());
//!
//! assert_eq!(graph.package_count(), 2);
//! assert_eq!(graph.dependencies_of("A"), Some(&["B".to_string()][..]));
//! assert!(!graph.has_cycles());
//! ```

mod builder;
mod dependency_graph;

pub use builder::{GraphBuilder, PackageFilter};
pub use dependency_graph::{CycleInfo, DependencyGraph, PackageNode};
