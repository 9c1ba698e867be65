//! Resource descriptors.
//!
//! A descriptor is the desired state of one Docker object. Descriptors
//! reference each other by logical name; those references are the
//! implicit edges of the dependency graph, while `depends_on` carries the
//! explicit ones.

use std::fmt;

use serde::Serialize;
use stackwire_common::constants::SECRET_PLACEHOLDER;
use stackwire_common::secret::Secret;
use stackwire_common::types::ResourceName;

/// A descriptor field value that may be sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Plain text.
    Plain(String),
    /// Sensitive text; serialized as a `{"secret": true}` marker.
    Secret(Secret<String>),
}

impl Value {
    /// Returns `true` for secret values.
    #[must_use]
    pub const fn is_secret(&self) -> bool {
        matches!(self, Self::Secret(_))
    }
}

/// Secret values render as the placeholder.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(s) => f.write_str(s),
            Self::Secret(_) => f.write_str(SECRET_PLACEHOLDER),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_owned())
    }
}

impl From<Secret<String>> for Value {
    fn from(value: Secret<String>) -> Self {
        Self::Secret(value)
    }
}

/// Host-to-container port publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortMapping {
    /// Port inside the container.
    pub internal: u16,
    /// Port published on the host.
    pub external: u16,
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.external, self.internal)
    }
}

/// Attachment of a container to a declared network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkAttachment {
    /// Logical name of the network resource.
    pub network: ResourceName,
    /// Extra hostnames the container answers to on this network.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// One `KEY=value` environment entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvVar {
    /// Variable name.
    pub key: String,
    /// Variable value.
    pub value: Value,
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// The Docker object a descriptor declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ResourceKind {
    /// Image pulled from a registry; resolves to a content digest.
    #[serde(rename = "docker:RemoteImage")]
    RemoteImage {
        /// Registry reference, e.g. `repo/name:tag`.
        image: String,
    },
    /// User-defined bridge network.
    #[serde(rename = "docker:Network")]
    Network {
        /// Network name.
        name: String,
    },
    /// Container run from a pulled image.
    #[serde(rename = "docker:Container", rename_all = "camelCase")]
    Container {
        /// Container name.
        name: String,
        /// Logical name of the `RemoteImage` whose digest is run.
        image: ResourceName,
        /// Published ports.
        ports: Vec<PortMapping>,
        /// Network attachments.
        networks_advanced: Vec<NetworkAttachment>,
        /// Environment entries, in declaration order.
        envs: Vec<EnvVar>,
    },
}

impl ResourceKind {
    /// Returns the provider type token.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::RemoteImage { .. } => "docker:RemoteImage",
            Self::Network { .. } => "docker:Network",
            Self::Container { .. } => "docker:Container",
        }
    }
}

/// Desired state of one resource.
///
/// The logical name is not serialized; snapshot documents key resources
/// by it instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Logical name, unique within the stack.
    #[serde(skip)]
    pub name: ResourceName,
    /// What is declared.
    #[serde(flatten)]
    pub kind: ResourceKind,
    /// Explicit ordering constraints.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<ResourceName>,
}

impl Descriptor {
    /// Creates a descriptor without explicit dependencies.
    #[must_use]
    pub fn new(name: impl Into<ResourceName>, kind: ResourceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            depends_on: Vec::new(),
        }
    }

    /// Returns the name the provider sees.
    #[must_use]
    pub fn physical_name(&self) -> &str {
        match &self.kind {
            ResourceKind::RemoteImage { image } => image,
            ResourceKind::Network { name } | ResourceKind::Container { name, .. } => name,
        }
    }

    /// Resources this one reads data from (image digest, network name).
    #[must_use]
    pub fn implicit_dependencies(&self) -> Vec<&ResourceName> {
        match &self.kind {
            ResourceKind::Container {
                image,
                networks_advanced,
                ..
            } => std::iter::once(image)
                .chain(networks_advanced.iter().map(|n| &n.network))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// All resources that must exist before this one, without duplicates.
    #[must_use]
    pub fn references(&self) -> Vec<&ResourceName> {
        let mut refs = self.implicit_dependencies();
        for dep in &self.depends_on {
            if !refs.contains(&dep) {
                refs.push(dep);
            }
        }
        refs
    }

    /// Returns the environment entries of a container, empty otherwise.
    #[must_use]
    pub fn envs(&self) -> &[EnvVar] {
        match &self.kind {
            ResourceKind::Container { envs, .. } => envs,
            _ => &[],
        }
    }
}
