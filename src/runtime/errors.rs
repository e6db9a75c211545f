//! Error types for the decoder runtime
//!
//! Every error here is also logged where it is detected. Callers that ignore
//! the returned value still get the documented fallback behaviour.

/// Error type for input binding operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("Input index {0} out of range for decoder '{1}'")]
    SlotOutOfRange(usize, String),

    #[error("Input '{0}' not found on decoder '{1}'")]
    SlotNotFound(String, String),
}

/// Error type for parameter lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    #[error("Parameter '{0}' not found on decoder '{1}'")]
    NotFound(String, String),
}

/// Error type for decoder registry operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid decoder name: {0}")]
    UnknownProtocol(String),
}

/// Error type for reading and writing decoder configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field '{0}' is not a map")]
    NotAMap(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
