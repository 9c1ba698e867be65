//! Unified error types for the Stackwire workspace.
//!
//! Configuration problems are reported with the fully-qualified key
//! (`<namespace>:<key>`) so the operator can fix the stack file directly.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum StackwireError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A declaration or configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A required configuration key is absent from the stack file.
    #[error("missing required configuration variable '{key}'")]
    MissingConfig {
        /// Fully-qualified key.
        key: String,
    },

    /// A configuration key is present but holds the wrong kind of value.
    #[error("configuration variable '{key}' is not a valid {expected}")]
    InvalidConfig {
        /// Fully-qualified key.
        key: String,
        /// What the accessor expected.
        expected: &'static str,
    },

    /// A referenced resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// A YAML project or stack file could not be parsed.
    #[error("YAML error in {path}: {source}")]
    Yaml {
        /// File being parsed.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_yaml::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StackwireError>;
