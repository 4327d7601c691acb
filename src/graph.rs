//! Version index over the shrinkwrapped dependency graph.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::error::{FacadeError, Result};
use crate::models::{Engine, LockNode};

/// Upper bound on distinct `(name, version)` nodes visited while indexing a lockfile.
pub const MAX_GRAPH_NODES: usize = 100_000;

/// Flattened graph handed to the client runtime: `name -> version -> (dependency -> version)`.
pub type DependencyTree = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

/// Every version of every package reachable from the lockfile root.
///
/// Built once per compiler and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    versions: BTreeMap<String, BTreeSet<String>>,
    tree: DependencyTree,
    engines: Vec<Engine>,
}

impl DependencyGraph {
    /// Index the graph rooted at `root`, which is the package called `root_name`.
    pub fn build(root_name: &str, root: &LockNode) -> Result<Self> {
        Self::build_with_limit(root_name, root, MAX_GRAPH_NODES)
    }

    /// Same as [`DependencyGraph::build`] with an explicit node limit.
    ///
    /// The walk uses an explicit stack and skips any `(name, version)` pair it has already
    /// expanded, so it terminates on every finite lockfile.
    pub fn build_with_limit(root_name: &str, root: &LockNode, limit: usize) -> Result<Self> {
        let mut versions: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut tree = DependencyTree::new();
        let mut expanded: BTreeSet<(&str, &str)> = BTreeSet::new();
        let mut pending: Vec<(&str, &LockNode)> = vec![(root_name, root)];

        while let Some((name, node)) = pending.pop() {
            if !expanded.insert((name, node.version.as_str())) {
                trace!(name, version = %node.version, "already expanded");
                continue;
            }
            if expanded.len() > limit {
                return Err(FacadeError::GraphTooDeep { limit });
            }

            versions
                .entry(name.to_string())
                .or_default()
                .insert(node.version.clone());

            let edges = tree
                .entry(name.to_string())
                .or_default()
                .entry(node.version.clone())
                .or_default();
            for (dependency, child) in &node.dependencies {
                edges.insert(dependency.clone(), child.version.clone());
                pending.push((dependency.as_str(), child));
            }
            for (engine, child) in &node.engines {
                pending.push((engine.as_str(), child));
            }
        }

        let engines = root
            .engines
            .iter()
            .map(|(name, node)| Engine {
                name: name.clone(),
                version: node.version.clone(),
            })
            .collect();

        debug!(
            packages = versions.len(),
            nodes = expanded.len(),
            "indexed dependency graph"
        );

        Ok(Self {
            versions,
            tree,
            engines,
        })
    }

    /// All locked versions of `name`, or `None` when the package is not in the graph.
    pub fn versions_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.versions.get(name)
    }

    /// Engines declared on the lockfile root, in name order.
    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    /// Flattened dependency tree serialized into the runtime config.
    pub fn tree(&self) -> &DependencyTree {
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lockfile() -> LockNode {
        LockNode::locked("0.2.0")
            .with_engine("neuron", "4.2.1")
            .with_dependency(
                "bar",
                LockNode::locked("1.0.0").with_dependency("baz", LockNode::locked("0.1.0")),
            )
            .with_dependency(
                "qux",
                LockNode::locked("3.0.0")
                    .with_dependency("bar", LockNode::locked("2.0.0"))
                    .with_dependency("baz", LockNode::locked("0.1.0")),
            )
    }

    fn versions(graph: &DependencyGraph, name: &str) -> Vec<String> {
        graph
            .versions_of(name)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn collects_every_reachable_version_once() {
        let graph = DependencyGraph::build("foo", &lockfile()).unwrap();

        assert_eq!(versions(&graph, "foo"), vec!["0.2.0"]);
        assert_eq!(versions(&graph, "bar"), vec!["1.0.0", "2.0.0"]);
        assert_eq!(versions(&graph, "baz"), vec!["0.1.0"]);
        assert_eq!(versions(&graph, "qux"), vec!["3.0.0"]);
        assert_eq!(versions(&graph, "neuron"), vec!["4.2.1"]);
        assert!(graph.versions_of("missing").is_none());
    }

    #[test]
    fn lists_root_engines() {
        let graph = DependencyGraph::build("foo", &lockfile()).unwrap();
        assert_eq!(graph.engines(), &[Engine {
            name: "neuron".into(),
            version: "4.2.1".into(),
        }]);
    }

    #[test]
    fn flattens_dependency_edges() {
        let graph = DependencyGraph::build("foo", &lockfile()).unwrap();
        let tree = graph.tree();

        assert_eq!(tree["foo"]["0.2.0"]["bar"], "1.0.0");
        assert_eq!(tree["foo"]["0.2.0"]["qux"], "3.0.0");
        assert!(!tree["foo"]["0.2.0"].contains_key("neuron"));
        assert_eq!(tree["qux"]["3.0.0"]["bar"], "2.0.0");
        assert!(tree["bar"]["2.0.0"].is_empty());
    }

    #[test]
    fn serializes_tree_without_engines() {
        let graph = DependencyGraph::build("foo", &LockNode::locked("0.2.0")).unwrap();
        let json = serde_json::to_string(graph.tree()).unwrap();
        assert_eq!(json, r#"{"foo":{"0.2.0":{}}}"#);
    }

    #[test]
    fn fails_when_node_limit_is_exceeded() {
        let result = DependencyGraph::build_with_limit("foo", &lockfile(), 3);
        assert!(matches!(result, Err(FacadeError::GraphTooDeep { limit: 3 })));
    }

    #[test]
    fn repeated_nodes_do_not_count_twice() {
        // foo, bar@1, baz@0.1, qux, bar@2, neuron
        let graph = DependencyGraph::build_with_limit("foo", &lockfile(), 6).unwrap();
        assert_eq!(versions(&graph, "baz"), vec!["0.1.0"]);
    }
}
