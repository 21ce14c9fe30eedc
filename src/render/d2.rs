//! D2 description generation.
//!
//! Translates a dependency graph into D2's relation syntax, one
//! `source -> target` statement per edge. D2 creates nodes implicitly
//! from relations, so isolated declarations are not needed.

use crate::graph::DependencyGraph;

/// Characters that force an identifier to be quoted in D2.
const RESERVED: &[char] = &['-', '.', ' ', ':', '/', '\\'];

/// Generates the D2 description for a graph.
///
/// Packages are emitted in graph insertion order and their dependencies
/// in stored order, so the output is deterministic for a given graph.
///
/// # Example
///
/// ```rust
/// use depscope::graph::DependencyGraph;
/// use depscope::render::d2::to_d2;
///
/// let mut graph = DependencyGraph::new();
/// graph.insert_package("app", vec!["some-lib".to_string()]);
///
/// let description = to_d2(&graph);
/// assert!(description.contains("app -> \"some-lib\""));
/// ```
pub fn to_d2(graph: &DependencyGraph) -> String {
    let mut lines = vec!["// Dependency graph".to_string(), String::new()];

    for node in graph.packages() {
        for dep in &node.dependencies {
            lines.push(format!(
                "{} -> {}",
                escape_identifier(&node.name),
                escape_identifier(dep)
            ));
        }
    }

    lines.join("\n")
}

/// Quotes an identifier when it contains characters D2 treats as
/// structural.
///
/// # Example
///
/// ```rust
/// use depscope::render::d2::escape_identifier;
///
/// assert_eq!(escape_identifier("requests"), "requests");
/// assert_eq!(escape_identifier("typing-extensions"), "\"typing-extensions\"");
/// ```
pub fn escape_identifier(identifier: &str) -> String {
    if identifier.contains(RESERVED) {
        format!("\"{identifier}\"")
    } else {
        identifier.to_string()
    }
}
