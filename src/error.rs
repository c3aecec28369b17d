//! Error taxonomy shared by the store, the backends, and coercion.

use std::path::PathBuf;

use thiserror::Error;

use crate::value::CoercionError;

/// Coarse classification of a [`ConfigError`].
///
/// Host applications that map errors onto their own codes match on this
/// rather than on the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    OutOfMemory,
    InvalidArgument,
    NotFound,
    IoError,
    ParseError,
    TypeError,
    ConfigNotFound,
}

/// Errors produced by configuration lookups and backends.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("out of memory while registering backend")]
    OutOfMemory,

    #[error("cannot {operation} variable value; no backends registered in the store")]
    NoBackends { operation: &'static str },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config variable '{name}' not found")]
    NotFound { name: String },

    #[error("environment variable {name} is not set")]
    EnvNotSet { name: String },

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path} at line {line}: {message}")]
    ParseFile {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("failed to get value for {name}: {source}")]
    InvalidType {
        name: String,
        source: CoercionError,
    },

    #[error("failed to open global config file; cannot find ${var} variable")]
    GlobalNotFound { var: &'static str },
}

impl ConfigError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::OutOfMemory => ErrorKind::OutOfMemory,
            ConfigError::NoBackends { .. } | ConfigError::InvalidArgument(_) => {
                ErrorKind::InvalidArgument
            }
            ConfigError::NotFound { .. } | ConfigError::EnvNotSet { .. } => ErrorKind::NotFound,
            ConfigError::ReadFile { .. } | ConfigError::WriteFile { .. } => ErrorKind::IoError,
            ConfigError::ParseFile { .. } => ErrorKind::ParseError,
            ConfigError::InvalidType { .. } => ErrorKind::TypeError,
            ConfigError::GlobalNotFound { .. } => ErrorKind::ConfigNotFound,
        }
    }

    /// The variable this error refers to, when there is one.
    pub fn variable(&self) -> Option<&str> {
        match self {
            ConfigError::NotFound { name }
            | ConfigError::EnvNotSet { name }
            | ConfigError::InvalidType { name, .. } => Some(name),
            _ => None,
        }
    }

    pub(crate) fn not_found(name: &str) -> Self {
        ConfigError::NotFound {
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid_type(name: &str, source: CoercionError) -> Self {
        ConfigError::InvalidType {
            name: name.to_string(),
            source,
        }
    }
}
