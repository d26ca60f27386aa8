//! Error types for cmdlex

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error used as the cause of conversion failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for cmdlex operations
pub type Result<T> = std::result::Result<T, CmdlexError>;

/// Main error type for cmdlex
///
/// Only problems that are not the user's fault end up here. Everything a user can
/// cause by typing the wrong thing is reported through an
/// [`InvocationResult`](crate::runner::InvocationResult) instead.
#[derive(Error, Debug)]
pub enum CmdlexError {
    /// The command catalog describes something the engine cannot handle
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors (including writes to the output sinks)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors in a command catalog definition
///
/// These point at a bug in how commands were declared, never at user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Parameter '{parameter}' has unsupported type '{type_name}'")]
    UnsupportedType { parameter: String, type_name: String },

    #[error("Parameter '{parameter}' declares unsupported container '{shape}'")]
    UnsupportedContainer { parameter: String, shape: String },

    #[error("No instance available for command group '{0}'")]
    NoInstance(String),
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read config file '{path}': {error}")]
    Read { path: PathBuf, error: String },
}

/// Errors raised while binding argument tokens to parameters
#[derive(Error, Debug)]
pub enum BindError {
    #[error("Failed to convert parameter: {parameter}")]
    Conversion {
        parameter: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("File already exists: {path:?} (parameter: {parameter})")]
    FileExists { parameter: String, path: PathBuf },

    #[error("Missing required parameter: {0}")]
    MissingArgument(String),

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("All parameters to this nested object must be named: {0}")]
    PositionalComposite(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

impl BindError {
    /// Build a conversion failure for `parameter` with an optional cause
    pub fn conversion(parameter: &str, source: Option<BoxError>) -> Self {
        BindError::Conversion {
            parameter: parameter.to_string(),
            source,
        }
    }
}

/// A user-facing failure captured on an invocation result
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("No method specified")]
    NoMethodSpecified,

    #[error("Method not found: {0}")]
    NoMethodFound(String),

    #[error("Ambiguous method: {0}")]
    AmbiguousMethod(String),

    #[error(transparent)]
    Bind(#[from] BindError),

    /// The invoked operation itself failed; the cause is kept as-is
    #[error("Fault during execution: {0:#}")]
    Fault(anyhow::Error),

    /// Malformed arguments to a reserved mode such as `--complete`
    #[error("{0}")]
    Usage(String),
}

/// Specialized result type for catalog definition checks
pub type DefinitionResult<T> = std::result::Result<T, DefinitionError>;

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for binding operations
pub type BindResult<T> = std::result::Result<T, BindError>;
