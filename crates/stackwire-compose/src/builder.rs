//! Fluent API for declaring resources.

use stackwire_common::error::{Result, StackwireError};
use stackwire_common::secret::Secret;
use stackwire_common::types::ResourceName;

use crate::resource::{Descriptor, EnvVar, NetworkAttachment, PortMapping, ResourceKind, Value};

/// Declares an image pull for `reference`.
#[must_use]
pub fn remote_image(name: impl Into<ResourceName>, reference: impl Into<String>) -> Descriptor {
    Descriptor::new(
        name,
        ResourceKind::RemoteImage {
            image: reference.into(),
        },
    )
}

/// Declares a network named `network_name`.
#[must_use]
pub fn network(name: impl Into<ResourceName>, network_name: impl Into<String>) -> Descriptor {
    Descriptor::new(
        name,
        ResourceKind::Network {
            name: network_name.into(),
        },
    )
}

/// Builder for a container descriptor.
#[derive(Debug)]
pub struct ContainerBuilder {
    logical: ResourceName,
    name: Option<String>,
    image: Option<ResourceName>,
    ports: Vec<PortMapping>,
    networks: Vec<NetworkAttachment>,
    envs: Vec<EnvVar>,
    depends_on: Vec<ResourceName>,
}

impl ContainerBuilder {
    /// Creates a new builder with the given logical name.
    #[must_use]
    pub fn new(logical: impl Into<ResourceName>) -> Self {
        Self {
            logical: logical.into(),
            name: None,
            image: None,
            ports: Vec::new(),
            networks: Vec::new(),
            envs: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    /// Sets the container name the provider sees.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Runs the digest of the given `RemoteImage` resource.
    #[must_use]
    pub fn image(mut self, image: &Descriptor) -> Self {
        self.image = Some(image.name.clone());
        self
    }

    /// Publishes `internal` on host port `external`.
    #[must_use]
    pub fn port(mut self, internal: u16, external: u16) -> Self {
        self.ports.push(PortMapping { internal, external });
        self
    }

    /// Attaches the container to a network.
    #[must_use]
    pub fn network(self, network: &Descriptor) -> Self {
        self.network_with_aliases(network, Vec::<String>::new())
    }

    /// Attaches the container to a network under extra hostnames.
    #[must_use]
    pub fn network_with_aliases<I, S>(mut self, network: &Descriptor, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.networks.push(NetworkAttachment {
            network: network.name.clone(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Adds a plain environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push(EnvVar {
            key: key.into(),
            value: Value::Plain(value.into()),
        });
        self
    }

    /// Adds an environment variable whose value is secret.
    #[must_use]
    pub fn secret_env(mut self, key: impl Into<String>, value: Secret<String>) -> Self {
        self.envs.push(EnvVar {
            key: key.into(),
            value: Value::Secret(value),
        });
        self
    }

    /// Orders this container after `other`.
    #[must_use]
    pub fn depends_on(mut self, other: &Descriptor) -> Self {
        self.depends_on.push(other.name.clone());
        self
    }

    /// Builds the container descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the container name or image is missing.
    pub fn build(self) -> Result<Descriptor> {
        let name = self.name.ok_or_else(|| StackwireError::Config {
            message: format!("container \"{}\" has no name", self.logical),
        })?;
        let image = self.image.ok_or_else(|| StackwireError::Config {
            message: format!("container \"{}\" has no image", self.logical),
        })?;

        tracing::debug!(resource = %self.logical, container = %name, "declared container");

        Ok(Descriptor {
            name: self.logical,
            kind: ResourceKind::Container {
                name,
                image,
                ports: self.ports,
                networks_advanced: self.networks,
                envs: self.envs,
            },
            depends_on: self.depends_on,
        })
    }
}
