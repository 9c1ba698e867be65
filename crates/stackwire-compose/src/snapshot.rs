//! The JSON hand-off document and change detection between two of them.
//!
//! A snapshot holds every descriptor in its serialized form, keyed by
//! logical name, plus the apply order and the exported outputs. Secret
//! values appear as `{"secret": true}`, with a fingerprint keyed by the
//! stack's salt when one is configured, so snapshots can be stored and
//! diffed without leaking credentials.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use stackwire_common::error::{Result, StackwireError};
use stackwire_common::secret::SecretKey;

use crate::resource::{Descriptor, Value};
use crate::stack::Stack;

/// Serialized form of a declared stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Stack name.
    pub stack: String,
    /// Logical names in apply order.
    pub order: Vec<String>,
    /// Descriptors keyed by logical name.
    pub resources: BTreeMap<String, serde_json::Value>,
    /// Exported outputs.
    pub outputs: BTreeMap<String, serde_json::Value>,
}

impl Snapshot {
    /// Captures a stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph has cycles or serialization fails.
    pub fn capture(stack: &Stack) -> Result<Self> {
        let order = stack
            .apply_order()?
            .into_iter()
            .map(|name| name.as_str().to_owned())
            .collect();
        let key = stack.secret_key.as_ref();
        if key.is_none() && has_secrets(stack) {
            tracing::warn!(
                stack = %stack.name,
                "no encryptionsalt configured, secret changes will not show in diffs"
            );
        }
        let mut resources = BTreeMap::new();
        for resource in &stack.resources {
            let _ = resources.insert(resource.name.as_str().to_owned(), document(resource, key)?);
        }
        let mut outputs = BTreeMap::new();
        for (name, value) in &stack.outputs {
            let _ = outputs.insert(name.clone(), seal(value, key)?);
        }
        Ok(Self {
            stack: stack.name.as_str().to_owned(),
            order,
            resources,
            outputs,
        })
    }

    /// Renders the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Reads a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading snapshot");
        let content = std::fs::read_to_string(path).map_err(|source| StackwireError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes the snapshot to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        tracing::debug!(path = %path.display(), "saving snapshot");
        std::fs::write(path, self.to_json()?).map_err(|source| StackwireError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn has_secrets(stack: &Stack) -> bool {
    stack.outputs.values().any(Value::is_secret)
        || stack
            .resources
            .iter()
            .flat_map(Descriptor::envs)
            .any(|env| env.value.is_secret())
}

fn document(resource: &Descriptor, key: Option<&SecretKey>) -> Result<serde_json::Value> {
    let mut document = serde_json::to_value(resource)?;
    if let Some(envs) = document
        .get_mut("envs")
        .and_then(serde_json::Value::as_array_mut)
    {
        for (slot, env) in envs.iter_mut().zip(resource.envs()) {
            if let Some(entry) = slot.as_object_mut() {
                let _ = entry.insert("value".to_owned(), seal(&env.value, key)?);
            }
        }
    }
    Ok(document)
}

fn seal(value: &Value, key: Option<&SecretKey>) -> Result<serde_json::Value> {
    match (value, key) {
        (Value::Secret(secret), Some(key)) => Ok(serde_json::json!({
            "secret": true,
            "fingerprint": secret.fingerprint(key).to_string(),
        })),
        _ => Ok(serde_json::to_value(value)?),
    }
}

/// Planned change to one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Resource is new.
    Create(String),
    /// Resource exists with different fields (top-level keys).
    Update {
        /// Logical name.
        name: String,
        /// Changed top-level fields, sorted.
        fields: Vec<String>,
    },
    /// Resource is no longer declared.
    Delete(String),
    /// Resource is unchanged.
    Same(String),
}

impl Change {
    /// Logical name of the affected resource.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Create(name) | Self::Delete(name) | Self::Same(name) => name,
            Self::Update { name, .. } => name,
        }
    }

    /// Returns `true` unless the resource is unchanged.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Same(_))
    }
}

/// Compares two snapshots.
///
/// Creates, updates and unchanged resources follow the current apply
/// order; deletions follow, in reverse of the previous apply order.
#[must_use]
pub fn diff(previous: &Snapshot, current: &Snapshot) -> Vec<Change> {
    let mut changes = Vec::new();
    for name in &current.order {
        let Some(now) = current.resources.get(name) else {
            continue;
        };
        let change = match previous.resources.get(name) {
            None => Change::Create(name.clone()),
            Some(before) if before == now => Change::Same(name.clone()),
            Some(before) => Change::Update {
                name: name.clone(),
                fields: changed_fields(before, now),
            },
        };
        changes.push(change);
    }
    for name in previous.order.iter().rev() {
        if previous.resources.contains_key(name) && !current.resources.contains_key(name) {
            changes.push(Change::Delete(name.clone()));
        }
    }
    changes
}

fn changed_fields(before: &serde_json::Value, now: &serde_json::Value) -> Vec<String> {
    match (before.as_object(), now.as_object()) {
        (Some(a), Some(b)) => {
            let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
            keys.into_iter()
                .filter(|k| a.get(*k) != b.get(*k))
                .cloned()
                .collect()
        }
        _ => vec!["*".to_owned()],
    }
}
