//! The descriptor set of one stack and its exported outputs.

use std::collections::BTreeMap;

use stackwire_common::error::{Result, StackwireError};
use stackwire_common::secret::SecretKey;
use stackwire_common::types::{ResourceName, StackName};

use crate::graph::DependencyGraph;
use crate::resource::{Descriptor, Value};

/// Everything a declaration hands to the external engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    /// Stack the descriptors are scoped to.
    pub name: StackName,
    /// Descriptors in declaration order.
    pub resources: Vec<Descriptor>,
    /// Exported values, sorted by key.
    pub outputs: BTreeMap<String, Value>,
    /// Key for secret fingerprints in captured snapshots.
    pub secret_key: Option<SecretKey>,
}

impl Stack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new(name: StackName) -> Self {
        Self {
            name,
            resources: Vec::new(),
            outputs: BTreeMap::new(),
            secret_key: None,
        }
    }

    /// Adds a descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if a resource with the same logical name exists.
    pub fn add(&mut self, descriptor: Descriptor) -> Result<()> {
        if self.get(&descriptor.name).is_some() {
            return Err(StackwireError::Config {
                message: format!("duplicate resource name: \"{}\"", descriptor.name),
            });
        }
        tracing::debug!(
            stack = %self.name,
            resource = %descriptor.name,
            kind = descriptor.kind.type_name(),
            "registered resource"
        );
        self.resources.push(descriptor);
        Ok(())
    }

    /// Exports a value under `key`, replacing any previous export.
    pub fn export(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let _ = self.outputs.insert(key.into(), value.into());
    }

    /// Looks up a descriptor by logical name.
    #[must_use]
    pub fn get(&self, name: &ResourceName) -> Option<&Descriptor> {
        self.resources.iter().find(|r| &r.name == name)
    }

    /// Builds the dependency graph from implicit and explicit references.
    ///
    /// References to undeclared resources become nodes of their own; the
    /// validator rejects those before a stack is handed off.
    #[must_use]
    pub fn graph(&self) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for resource in &self.resources {
            let _ = graph.add_resource(&resource.name);
        }
        for resource in &self.resources {
            let dependent = graph.add_resource(&resource.name);
            for reference in resource.references() {
                let dependency = graph.add_resource(reference);
                graph.add_dependency(dependent, dependency);
            }
        }
        graph
    }

    /// Returns the order in which the engine creates resources.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph contains cycles.
    pub fn apply_order(&self) -> Result<Vec<ResourceName>> {
        self.graph().resolve_order()
    }
}
