//! Error types for the loader library.

use thiserror::Error;

/// Main error type for load operations.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A column name collides with a Redshift reserved word.
    #[error("Column name '{0}' is a reserved word in Redshift")]
    ReservedWord(String),

    /// An invalid load option was supplied (e.g. an unknown diststyle).
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// A frame shape invariant was violated (unequal column lengths,
    /// duplicate column names).
    #[error("Frame error: {0}")]
    Frame(String),

    /// Object store failure during staging. Propagated as-is; no retry.
    #[error("Storage error: {0}")]
    Storage(#[from] object_store::Error),

    /// A warehouse statement failed to execute.
    #[error("Warehouse execution failed: {0}")]
    Execution(String),

    /// IO error (local backup file, config file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl LoadError {
    /// Create an Execution error from any displayable driver error.
    pub fn execution(message: impl Into<String>) -> Self {
        LoadError::Execution(message.into())
    }
}

/// Result type alias for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;
