//! Error types for cellar-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures while locating, reading or validating configuration
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// An environment override could not be interpreted
    #[error("{name}='{value}' is invalid: expected {expected}")]
    InvalidEnvVar {
        name: String,
        value: String,
        expected: String,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Merged configuration tree did not match the expected shape
    #[error("Configuration has an unexpected shape: {0}")]
    Shape(#[from] serde_yaml_ng::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn invalid_env_var(
        name: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
