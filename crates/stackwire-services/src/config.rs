//! Typed configuration bundle of the services stack.

use stackwire_common::config::StackConfig;
use stackwire_common::error::Result;
use stackwire_common::secret::{Secret, SecretKey};

/// Host port of the frontend.
pub const FRONTEND_PORT: &str = "frontendPort";
/// Port of the backend API.
pub const BACKEND_PORT: &str = "backendPort";
/// Port of the database.
pub const MONGO_PORT: &str = "mongoPort";
/// Host the backend reaches the database at.
pub const MONGO_HOST: &str = "mongoHost";
/// Database name.
pub const DATABASE: &str = "database";
/// `NODE_ENV` of the backend.
pub const NODE_ENVIRONMENT: &str = "nodeEnvironment";
/// Protocol the frontend proxies with.
pub const PROTOCOL: &str = "protocol";
/// Database root user.
pub const MONGO_USERNAME: &str = "mongoUsername";
/// Database root password.
pub const MONGO_PASSWORD: &str = "mongoPassword";

/// Every key the stack requires.
pub const REQUIRED_KEYS: [&str; 9] = [
    FRONTEND_PORT,
    BACKEND_PORT,
    MONGO_PORT,
    MONGO_HOST,
    DATABASE,
    NODE_ENVIRONMENT,
    PROTOCOL,
    MONGO_USERNAME,
    MONGO_PASSWORD,
];

/// Configuration the services stack is declared from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesConfig {
    /// Frontend port, published on the host.
    pub frontend_port: u16,
    /// Backend port, published on the host.
    pub backend_port: u16,
    /// Database port, published on the host.
    pub mongo_port: u16,
    /// Database hostname as seen from the backend.
    pub mongo_host: String,
    /// Database name.
    pub database: String,
    /// Node environment name.
    pub node_environment: String,
    /// Frontend proxy protocol.
    pub protocol: String,
    /// Database root user.
    pub mongo_username: String,
    /// Database root password.
    pub mongo_password: Secret<String>,
    /// Fingerprint key from the stack's `encryptionsalt`.
    pub secret_key: Option<SecretKey>,
}

impl ServicesConfig {
    /// Reads every required key, failing on the first missing or invalid one.
    ///
    /// # Errors
    ///
    /// Returns `MissingConfig` or `InvalidConfig` for the offending key.
    pub fn from_config(config: &StackConfig) -> Result<Self> {
        let loaded = Self {
            frontend_port: config.require_number(FRONTEND_PORT)?,
            backend_port: config.require_number(BACKEND_PORT)?,
            mongo_port: config.require_number(MONGO_PORT)?,
            mongo_host: config.require(MONGO_HOST)?,
            database: config.require(DATABASE)?,
            node_environment: config.require(NODE_ENVIRONMENT)?,
            protocol: config.require(PROTOCOL)?,
            mongo_username: config.require(MONGO_USERNAME)?,
            mongo_password: config.require_secret(MONGO_PASSWORD)?,
            secret_key: config.secret_key()?,
        };
        tracing::debug!(stack = %config.stack(), config = ?loaded, "loaded services configuration");
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use stackwire_common::error::StackwireError;
    use stackwire_common::types::StackName;

    use super::*;

    fn yaml_without(skip: Option<&str>) -> String {
        let values = [
            (FRONTEND_PORT, "3001"),
            (BACKEND_PORT, "3000"),
            (MONGO_PORT, "27017"),
            (MONGO_HOST, "mongodb://mongo"),
            (DATABASE, "cart"),
            (NODE_ENVIRONMENT, "development"),
            (PROTOCOL, "http://"),
            (MONGO_USERNAME, "admin"),
        ];
        let mut yaml = String::from("encryptionsalt: 0123456789abcdef\nconfig:\n");
        for (key, value) in values {
            if Some(key) != skip {
                yaml.push_str(&format!("  shop:{key}: \"{value}\"\n"));
            }
        }
        if skip != Some(MONGO_PASSWORD) {
            yaml.push_str("  shop:mongoPassword:\n    secure: hunter2\n");
        }
        yaml
    }

    fn load(yaml: &str) -> Result<ServicesConfig> {
        let config = StackConfig::from_yaml("shop", StackName::new("dev")?, yaml)?;
        ServicesConfig::from_config(&config)
    }

    #[test]
    fn complete_config_loads() {
        let config = load(&yaml_without(None)).unwrap();
        assert_eq!(config.frontend_port, 3001);
        assert_eq!(config.backend_port, 3000);
        assert_eq!(config.mongo_port, 27017);
        assert_eq!(config.protocol, "http://");
        assert_eq!(config.mongo_password.reveal(), "hunter2");
        assert!(config.secret_key.is_some());
    }

    #[test]
    fn numeric_secure_password_is_accepted() {
        let yaml = yaml_without(None).replace("secure: hunter2", "secure: 123456");
        let config = load(&yaml).unwrap();
        assert_eq!(config.mongo_password.reveal(), "123456");
    }

    #[test]
    fn every_required_key_is_enforced() {
        for key in REQUIRED_KEYS {
            let err = load(&yaml_without(Some(key))).unwrap_err();
            match err {
                StackwireError::MissingConfig { key: missing } => {
                    assert_eq!(missing, format!("shop:{key}"));
                }
                other => panic!("expected missing {key}, got {other}"),
            }
        }
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let yaml = yaml_without(None).replace("\"3001\"", "\"three thousand\"");
        let err = load(&yaml).unwrap_err();
        assert!(matches!(err, StackwireError::InvalidConfig { ref key, .. } if key == "shop:frontendPort"));
    }

    #[test]
    fn debug_output_hides_password() {
        let config = load(&yaml_without(None)).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
