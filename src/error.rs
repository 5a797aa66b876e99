//! Error types for directive lookup, binding, loading and execution wiring.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the directive registry while resolving nodes.
///
/// Both kinds abort the current resolution; nothing is retried.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no directive handler registered for \"{name}\"")]
    NotFound { name: String },

    #[error("node {node} has more than one resolver directive: {}", directives.join(", "))]
    ConflictingNodeResolver {
        node: String,
        directives: Vec<String>,
    },

    #[error(
        "field {field} can have at most one resolver directive, found directives: {}",
        directives.join(", ")
    )]
    ConflictingFieldResolver {
        field: String,
        directives: Vec<String>,
    },
}

impl RegistryError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors raised by a bound directive while doing its work.
#[derive(Debug, Error, PartialEq)]
pub enum DirectiveError {
    #[error("directive @{directive} was used without being bound to a node")]
    Unbound { directive: String },

    #[error("directive @{directive} on {coordinate} is missing required argument \"{argument}\"")]
    MissingArgument {
        directive: String,
        coordinate: String,
        argument: String,
    },

    #[error(
        "directive @{directive} on {coordinate}: argument \"{argument}\" expected {expected}, got {actual}"
    )]
    InvalidArgument {
        directive: String,
        coordinate: String,
        argument: String,
        expected: String,
        actual: String,
    },

    #[error("directive @{directive} failed: {message}")]
    Failed { directive: String, message: String },
}

/// Failure to obtain or decode a schema document.
///
/// Missing files and transport failures exit with 3; bad content with 2.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid schema document: {source}")]
    InvalidDocument {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Structural validation failure of a schema document.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("invalid document schema: {message}")]
    InvalidSchema { message: String },

    #[error("document invalid with {} error(s)", errors.len())]
    Invalid { errors: Vec<SchemaError> },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::InvalidSchema { .. } => 2,
            ValidateError::Invalid { .. } => 1,
        }
    }
}

/// Single validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid value.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Errors during the schema build pass.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Directive(#[from] DirectiveError),
}

impl BuildError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while resolving a field or type at execution time.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error("unknown type \"{name}\"")]
    UnknownType { name: String },

    #[error("type \"{type_name}\" has no field \"{field}\"")]
    UnknownField { type_name: String, field: String },

    #[error("cannot resolve concrete type for abstract type \"{name}\" without a resolver directive")]
    UnresolvableType { name: String },
}

impl PipelineError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Directive(_) => 1,
            _ => 2,
        }
    }
}

/// Errors while assembling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Figment(Box::new(error))
    }
}

impl ConfigError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::FileNotFound { .. } => 3,
            ConfigError::Figment(_) => 2,
        }
    }
}
