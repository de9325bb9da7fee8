//! Error types for configuration loading

use thiserror::Error;

/// Errors raised while loading or reading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required key is absent
    #[error("Configuration key not found: {0}")]
    KeyNotFound(String),

    /// A key is present but its value cannot be used
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// A file or `.env` source could not be read
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// A source was read but is not valid JSON/TOML/env syntax
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Settings were read but violate a constraint
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvError(#[from] std::env::VarError),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
