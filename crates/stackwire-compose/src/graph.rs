//! Dependency graph management using `petgraph`.
//!
//! Builds a directed acyclic graph from descriptor references and
//! resolves the topological order the external engine applies in.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;
use stackwire_common::error::{Result, StackwireError};
use stackwire_common::types::ResourceName;

/// A dependency graph of resources.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Internal petgraph representation.
    graph: petgraph::Graph<ResourceName, ()>,
    /// Node lookup by logical name.
    nodes: HashMap<ResourceName, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource node, returning the existing node if already present.
    pub fn add_resource(&mut self, name: &ResourceName) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.clone());
        let _ = self.nodes.insert(name.clone(), idx);
        idx
    }

    /// Adds a dependency edge: `dependent` depends on `dependency`.
    ///
    /// The graph edge points from `dependency` to `dependent`
    /// so that topological sort yields dependencies first.
    pub fn add_dependency(&mut self, dependent: NodeIndex, dependency: NodeIndex) {
        let _ = self.graph.update_edge(dependency, dependent, ());
    }

    /// Returns the direct dependencies of `name`, sorted by name.
    #[must_use]
    pub fn dependencies_of(&self, name: &ResourceName) -> Vec<ResourceName> {
        let Some(&idx) = self.nodes.get(name) else {
            return Vec::new();
        };
        let mut deps: Vec<ResourceName> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect();
        deps.sort();
        deps
    }

    /// Returns a topological ordering of resources for applying.
    ///
    /// Dependencies appear before the resources that depend on them.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph contains cycles.
    pub fn resolve_order(&self) -> Result<Vec<ResourceName>> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .iter()
                .filter_map(|&idx| self.graph.node_weight(idx).cloned())
                .collect()),
            Err(cycle) => Err(StackwireError::Config {
                message: format!(
                    "cyclic dependency detected in resource graph at \"{}\"",
                    self.graph[cycle.node_id()]
                ),
            }),
        }
    }
}
