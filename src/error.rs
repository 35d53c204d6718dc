use std::path::PathBuf;

use thiserror::Error;

use crate::types::logical_operation::UserId;

/// Failures raised by the simulation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("user '{0}' already exists")]
    DuplicateUser(UserId),

    #[error("user '{0}' is not registered")]
    UnknownUser(UserId),

    #[error("user '{0}' has no session set; call set_session before generating text")]
    MissingSession(UserId),

    #[error("user '{0}' has no scored logical operations to sample from")]
    EmptyVocabulary(UserId),

    #[error("invalid logical operation: {0}")]
    InvalidOperation(String),
}

/// Failures while reading or decoding a command script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON script: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {message}")]
    Line { line: usize, message: String },

    #[error("command {index} ({operation}): {message}")]
    InvalidCommand {
        index: usize,
        operation: &'static str,
        message: String,
    },
}

/// Failures while applying a parsed command list.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("command {index} ({operation}) failed: {source}")]
    Command {
        index: usize,
        operation: &'static str,
        #[source]
        source: SimulationError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
