//! Project and stack configuration.
//!
//! A project directory holds `Stackwire.yaml` (the project settings) and one
//! `Stackwire.<stack>.yaml` per stack. Stack files carry a `config` map keyed
//! by `<project>:<key>`; sensitive entries are written as `{ secure: ... }`.
//! The optional `encryptionsalt` keys the fingerprints that let two rendered
//! documents be compared without exposing secret values.
//!
//! ```yaml
//! encryptionsalt: 9f1c2e7a4b8d3f60a5e1
//! config:
//!   shop:frontendPort: 3001
//!   shop:mongoPassword:
//!     secure: change-me
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::{PROJECT_FILE, stack_file_name};
use crate::error::{Result, StackwireError};
use crate::secret::{Secret, SecretKey};
use crate::types::StackName;

/// Settings read from the project file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSettings {
    /// Project name; also the configuration namespace.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StackFile {
    #[serde(default)]
    encryptionsalt: Option<Secret<String>>,
    #[serde(default)]
    config: BTreeMap<String, ConfigValue>,
}

// `secure` is read as any YAML value so that numeric or boolean secrets
// match this variant instead of falling through to `Plain`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ConfigValue {
    Secure { secure: Secret<serde_yaml::Value> },
    Plain(serde_yaml::Value),
}

/// One row of the configuration listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Fully-qualified key.
    pub key: String,
    /// Rendered value; `None` for secure values.
    pub value: Option<String>,
    /// Whether the value is secure.
    pub secret: bool,
}

/// Configuration namespace of a single stack.
#[derive(Debug, Clone)]
pub struct StackConfig {
    namespace: String,
    stack: StackName,
    salt: Option<Secret<String>>,
    values: BTreeMap<String, ConfigValue>,
}

impl StackConfig {
    /// Loads project settings and the stack file from `project_dir`.
    ///
    /// A missing stack file yields an empty configuration, so required
    /// lookups report the individual missing keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the project file is missing or either file
    /// cannot be parsed.
    pub fn load(project_dir: &Path, stack: &StackName) -> Result<(ProjectSettings, Self)> {
        let project_path = project_dir.join(PROJECT_FILE);
        tracing::debug!(path = %project_path.display(), "loading project settings");
        let content = read(&project_path)?;
        let project: ProjectSettings =
            serde_yaml::from_str(&content).map_err(|source| StackwireError::Yaml {
                path: project_path.clone(),
                source,
            })?;

        let stack_path = project_dir.join(stack_file_name(stack.as_str()));
        let config = if stack_path.exists() {
            tracing::debug!(path = %stack_path.display(), "loading stack configuration");
            let content = read(&stack_path)?;
            Self::parse(&project.name, stack.clone(), &content).map_err(|e| match e {
                StackwireError::Yaml { source, .. } => StackwireError::Yaml {
                    path: stack_path.clone(),
                    source,
                },
                other => other,
            })?
        } else {
            tracing::warn!(path = %stack_path.display(), "stack file not found, using empty configuration");
            Self {
                namespace: project.name.clone(),
                stack: stack.clone(),
                salt: None,
                values: BTreeMap::new(),
            }
        };

        Ok((project, config))
    }

    /// Parses stack file contents for the given namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed.
    pub fn from_yaml(namespace: &str, stack: StackName, content: &str) -> Result<Self> {
        Self::parse(namespace, stack, content)
    }

    fn parse(namespace: &str, stack: StackName, content: &str) -> Result<Self> {
        let file: StackFile = if content.trim().is_empty() {
            StackFile::default()
        } else {
            serde_yaml::from_str(content).map_err(|source| StackwireError::Yaml {
                path: stack_file_name(stack.as_str()).into(),
                source,
            })?
        };
        Ok(Self {
            namespace: namespace.to_owned(),
            stack,
            salt: file.encryptionsalt,
            values: file.config,
        })
    }

    /// Returns the configuration namespace (the project name).
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the stack this configuration belongs to.
    #[must_use]
    pub const fn stack(&self) -> &StackName {
        &self.stack
    }

    /// Returns the fingerprint key of this stack, if the stack file sets
    /// `encryptionsalt`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the salt is too short.
    pub fn secret_key(&self) -> Result<Option<SecretKey>> {
        self.salt.clone().map(SecretKey::from_salt).transpose()
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{key}", self.namespace)
    }

    fn lookup(&self, key: &str) -> Result<(String, &ConfigValue)> {
        let full = self.full_key(key);
        match self.values.get(&full) {
            Some(value) => Ok((full, value)),
            None => Err(StackwireError::MissingConfig { key: full }),
        }
    }

    /// Reads a required string value.
    ///
    /// Numbers and booleans are accepted and rendered as strings.
    ///
    /// # Errors
    ///
    /// Returns `MissingConfig` if absent and `InvalidConfig` if the value is
    /// not a scalar or is a secure value.
    pub fn require(&self, key: &str) -> Result<String> {
        let (full, value) = self.lookup(key)?;
        match value {
            ConfigValue::Plain(v) => scalar_to_string(v).ok_or(StackwireError::InvalidConfig {
                key: full,
                expected: "string",
            }),
            ConfigValue::Secure { .. } => Err(StackwireError::InvalidConfig {
                key: full,
                expected: "plain string (value is secure, read it as a secret)",
            }),
        }
    }

    /// Reads a required numeric value and parses it as `T`.
    ///
    /// # Errors
    ///
    /// Returns `MissingConfig` if absent and `InvalidConfig` if the value
    /// does not parse as `T`.
    pub fn require_number<T: FromStr>(&self, key: &str) -> Result<T> {
        let (full, value) = self.lookup(key)?;
        let parsed = match value {
            ConfigValue::Plain(serde_yaml::Value::Number(n)) => n.to_string().parse().ok(),
            ConfigValue::Plain(serde_yaml::Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or(StackwireError::InvalidConfig {
            key: full,
            expected: "number",
        })
    }

    /// Reads a required value as a secret.
    ///
    /// Plain scalars are promoted to secrets.
    ///
    /// # Errors
    ///
    /// Returns `MissingConfig` if absent and `InvalidConfig` if the value is
    /// not a scalar.
    pub fn require_secret(&self, key: &str) -> Result<Secret<String>> {
        let (full, value) = self.lookup(key)?;
        match value {
            ConfigValue::Secure { secure } => scalar_to_string(secure.reveal())
                .map(Secret::new)
                .ok_or(StackwireError::InvalidConfig {
                    key: full,
                    expected: "string",
                }),
            ConfigValue::Plain(v) => {
                tracing::debug!(key = %full, "promoting plain configuration value to secret");
                scalar_to_string(v)
                    .map(Secret::new)
                    .ok_or(StackwireError::InvalidConfig {
                        key: full,
                        expected: "string",
                    })
            }
        }
    }

    /// Lists every configured key; secure values are withheld.
    #[must_use]
    pub fn entries(&self) -> Vec<ConfigEntry> {
        self.values
            .iter()
            .map(|(key, value)| match value {
                ConfigValue::Secure { .. } => ConfigEntry {
                    key: key.clone(),
                    value: None,
                    secret: true,
                },
                ConfigValue::Plain(v) => ConfigEntry {
                    key: key.clone(),
                    value: scalar_to_string(v),
                    secret: false,
                },
            })
            .collect()
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| StackwireError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STACK_YAML: &str = r"
config:
  shop:frontendPort: 3001
  shop:backendPort: '3000'
  shop:mongoHost: mongodb://mongo
  shop:debug: true
  shop:tags: [a, b]
  shop:mongoPassword:
    secure: hunter2
";

    fn config() -> StackConfig {
        StackConfig::from_yaml("shop", StackName::new("dev").unwrap(), STACK_YAML).unwrap()
    }

    #[test]
    fn require_reads_namespaced_string() {
        assert_eq!(config().require("mongoHost").unwrap(), "mongodb://mongo");
    }

    #[test]
    fn require_renders_scalars() {
        assert_eq!(config().require("frontendPort").unwrap(), "3001");
        assert_eq!(config().require("debug").unwrap(), "true");
    }

    #[test]
    fn require_missing_key_names_full_key() {
        let err = config().require("database").unwrap_err();
        assert!(matches!(err, StackwireError::MissingConfig { ref key } if key == "shop:database"));
        assert!(err.to_string().contains("shop:database"));
    }

    #[test]
    fn require_rejects_sequences() {
        let err = config().require("tags").unwrap_err();
        assert!(matches!(err, StackwireError::InvalidConfig { .. }));
    }

    #[test]
    fn require_rejects_secure_values() {
        let err = config().require("mongoPassword").unwrap_err();
        assert!(matches!(err, StackwireError::InvalidConfig { .. }));
        assert!(!err.to_string().contains("hunter2"));
    }

    #[test]
    fn require_number_accepts_numbers_and_numeric_strings() {
        let config = config();
        assert_eq!(config.require_number::<u16>("frontendPort").unwrap(), 3001);
        assert_eq!(config.require_number::<u16>("backendPort").unwrap(), 3000);
    }

    #[test]
    fn require_number_rejects_wrong_type() {
        let err = config().require_number::<u16>("mongoHost").unwrap_err();
        assert!(matches!(err, StackwireError::InvalidConfig { expected: "number", .. }));
    }

    #[test]
    fn require_number_rejects_out_of_range_port() {
        let config =
            StackConfig::from_yaml("shop", StackName::new("dev").unwrap(), "config:\n  shop:port: 70000\n")
                .unwrap();
        assert!(config.require_number::<u16>("port").is_err());
    }

    #[test]
    fn require_secret_reads_secure_value() {
        let secret = config().require_secret("mongoPassword").unwrap();
        assert_eq!(secret.reveal(), "hunter2");
    }

    #[test]
    fn require_secret_accepts_numeric_and_boolean_secure_values() {
        let yaml = "config:\n  shop:pin:\n    secure: 123456\n  shop:flag:\n    secure: true\n";
        let config = StackConfig::from_yaml("shop", StackName::new("dev").unwrap(), yaml).unwrap();
        assert_eq!(config.require_secret("pin").unwrap().reveal(), "123456");
        assert_eq!(config.require_secret("flag").unwrap().reveal(), "true");
        let entries = config.entries();
        assert!(entries.iter().all(|e| e.secret && e.value.is_none()));
    }

    #[test]
    fn require_secret_rejects_structured_secure_value() {
        let yaml = "config:\n  shop:pw:\n    secure: [a, b]\n";
        let config = StackConfig::from_yaml("shop", StackName::new("dev").unwrap(), yaml).unwrap();
        let err = config.require_secret("pw").unwrap_err();
        assert!(matches!(err, StackwireError::InvalidConfig { ref key, .. } if key == "shop:pw"));
    }

    #[test]
    fn secret_key_comes_from_encryption_salt() {
        assert!(config().secret_key().unwrap().is_none());

        let yaml = format!("encryptionsalt: 0123456789abcdef\n{STACK_YAML}");
        let salted = StackConfig::from_yaml("shop", StackName::new("dev").unwrap(), &yaml).unwrap();
        assert!(salted.secret_key().unwrap().is_some());
        assert!(!format!("{salted:?}").contains("0123456789abcdef"));

        let short = StackConfig::from_yaml("shop", StackName::new("dev").unwrap(), "encryptionsalt: abc\n")
            .unwrap();
        assert!(matches!(
            short.secret_key(),
            Err(StackwireError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn require_secret_promotes_plain_value() {
        let secret = config().require_secret("mongoHost").unwrap();
        assert_eq!(secret.reveal(), "mongodb://mongo");
    }

    #[test]
    fn debug_output_hides_secure_values() {
        let printed = format!("{:?}", config());
        assert!(!printed.contains("hunter2"), "got: {printed}");
    }

    #[test]
    fn entries_mask_secure_values() {
        let entries = config().entries();
        let password = entries
            .iter()
            .find(|e| e.key == "shop:mongoPassword")
            .unwrap();
        assert!(password.secret);
        assert!(password.value.is_none());
        let host = entries.iter().find(|e| e.key == "shop:mongoHost").unwrap();
        assert_eq!(host.value.as_deref(), Some("mongodb://mongo"));
    }

    #[test]
    fn empty_stack_file_is_empty_config() {
        let config = StackConfig::from_yaml("shop", StackName::new("dev").unwrap(), "").unwrap();
        assert!(config.entries().is_empty());
    }

    #[test]
    fn load_reads_project_and_stack_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Stackwire.yaml"), "name: shop\n").unwrap();
        std::fs::write(dir.path().join("Stackwire.dev.yaml"), STACK_YAML).unwrap();

        let (project, config) =
            StackConfig::load(dir.path(), &StackName::new("dev").unwrap()).unwrap();
        assert_eq!(project.name, "shop");
        assert_eq!(config.namespace(), "shop");
        assert_eq!(config.stack().as_str(), "dev");
        assert_eq!(config.require_number::<u16>("frontendPort").unwrap(), 3001);
    }

    #[test]
    fn load_without_stack_file_reports_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Stackwire.yaml"), "name: shop\n").unwrap();

        let (_, config) =
            StackConfig::load(dir.path(), &StackName::new("prod").unwrap()).unwrap();
        assert!(matches!(
            config.require("database"),
            Err(StackwireError::MissingConfig { .. })
        ));
    }

    #[test]
    fn load_without_project_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = StackConfig::load(dir.path(), &StackName::new("dev").unwrap()).unwrap_err();
        assert!(matches!(err, StackwireError::Io { .. }));
    }
}
