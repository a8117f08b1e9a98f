//! The module dependency graph: topological ordering and cycle detection.
//!
//! A package's import statements form a directed graph — `add_dependency(m,
//! d)` records "`m` imports `d`". [`DependencyGraph::resolve`] walks that
//! graph with a 3-colour DFS (white/gray/black) and returns the modules in
//! an order where every module appears after everything it imports, or a
//! [`CircularDependency`] naming the two modules whose edge closed a cycle.
//!
//! Iteration always follows insertion order — nodes in the order they were
//! first mentioned, each node's dependencies in the order they were added —
//! so the same graph built the same way always resolves to the same vector.

use std::collections::{HashMap, HashSet};

/// Raised by [`DependencyGraph::resolve`] when the graph is not a DAG.
/// `importer` is the module whose dependency list closed the cycle by
/// pointing back at `dependency`, which was still being visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularDependency {
    pub importer: String,
    pub dependency: String,
}

impl std::fmt::Display for CircularDependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "circular dependency: {} imports {}, which (transitively) imports {} back",
            self.importer, self.dependency, self.importer
        )
    }
}

impl std::error::Error for CircularDependency {}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// A directed graph of module names, built from each module's imports.
#[derive(Default)]
pub struct DependencyGraph {
    /// Modules in first-mention order.
    nodes: Vec<String>,
    seen: HashSet<String>,
    /// `module -> modules it imports`, each list in the order dependencies
    /// were added.
    adjacency: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.nodes.push(name.to_string());
        }
    }

    /// Registers `name` with no dependencies, if not already present.
    /// Used to make sure modules with no imports still appear in the
    /// graph and in `resolve()`'s output.
    pub fn add_module(&mut self, name: impl Into<String>) {
        self.ensure_node(&name.into());
    }

    /// Records that `module` imports `depends_on`. Both are registered if
    /// new — `depends_on` first, so that a module mentioned for the first
    /// time only as someone else's import still gets a stable, early
    /// insertion position.
    pub fn add_dependency(&mut self, module: impl Into<String>, depends_on: impl Into<String>) {
        let depends_on = depends_on.into();
        let module = module.into();
        self.ensure_node(&depends_on);
        self.ensure_node(&module);
        self.adjacency.entry(module).or_default().push(depends_on);
    }

    /// Topologically sorts the graph: every module appears after all
    /// modules it (transitively) imports. Returns the two modules whose
    /// edge closed a cycle if the graph is not a DAG; no partial ordering
    /// is returned in that case.
    pub fn resolve(&self) -> Result<Vec<String>, CircularDependency> {
        let mut colors: HashMap<&str, Color> = self.nodes.iter().map(|n| (n.as_str(), Color::White)).collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if colors[node.as_str()] == Color::White {
                self.visit(node, &mut colors, &mut order)?;
            }
        }
        Ok(order)
    }

    fn visit<'a>(
        &'a self,
        node: &'a str,
        colors: &mut HashMap<&'a str, Color>,
        order: &mut Vec<String>,
    ) -> Result<(), CircularDependency> {
        colors.insert(node, Color::Gray);
        if let Some(deps) = self.adjacency.get(node) {
            for dep in deps {
                match colors.get(dep.as_str()).copied().unwrap_or(Color::White) {
                    Color::White => self.visit(dep, colors, order)?,
                    Color::Gray => {
                        return Err(CircularDependency {
                            importer: node.to_string(),
                            dependency: dep.clone(),
                        })
                    }
                    Color::Black => {}
                }
            }
        }
        colors.insert(node, Color::Black);
        order.push(node.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> DependencyGraph {
        // a imports b, a imports c, b imports e, b imports d, c imports d,
        // e imports f, f imports g, d imports g.
        let mut graph = DependencyGraph::new();
        graph.add_dependency("a", "b");
        graph.add_dependency("a", "c");
        graph.add_dependency("b", "e");
        graph.add_dependency("b", "d");
        graph.add_dependency("c", "d");
        graph.add_dependency("e", "f");
        graph.add_dependency("f", "g");
        graph.add_dependency("d", "g");
        graph
    }

    #[test]
    fn resolve_orders_dependencies_before_dependents() {
        let graph = sample_graph();
        let order = graph.resolve().unwrap();
        assert_eq!(
            order,
            vec!["g", "f", "e", "d", "b", "c", "a"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn resolve_is_deterministic_across_calls() {
        let graph = sample_graph();
        let first = graph.resolve().unwrap();
        let second = graph.resolve().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn every_edge_has_its_dependency_before_its_importer() {
        let graph = sample_graph();
        let order = graph.resolve().unwrap();
        let index_of = |name: &str| order.iter().position(|n| n == name).unwrap();
        for (importer, dep) in [("b", "a"), ("c", "a"), ("e", "b"), ("d", "b"), ("d", "c"), ("f", "e"), ("g", "f"), ("g", "d")] {
            assert!(
                index_of(dep) < index_of(importer),
                "{} should come before {}",
                dep,
                importer
            );
        }
    }

    #[test]
    fn cycle_is_detected_and_named() {
        let mut graph = sample_graph();
        // f imports b, closing f -> b -> e -> f.
        graph.add_dependency("f", "b");
        let err = graph.resolve().unwrap_err();
        assert_eq!(err.importer, "f");
        assert_eq!(err.dependency, "b");
    }

    #[test]
    fn self_import_is_a_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("a", "a");
        let err = graph.resolve().unwrap_err();
        assert_eq!(err.importer, "a");
        assert_eq!(err.dependency, "a");
    }

    #[test]
    fn isolated_module_with_no_imports_still_appears() {
        let mut graph = DependencyGraph::new();
        graph.add_module("Standalone");
        graph.add_dependency("a", "b");
        let order = graph.resolve().unwrap();
        assert!(order.contains(&"Standalone".to_string()));
        assert!(order.contains(&"a".to_string()));
    }
}
