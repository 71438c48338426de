use std::path::PathBuf;

use thiserror::Error;

use crate::types::{UnknownDomain, ValidationError};

/// Errors raised while turning command-line input into configuration records.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    UnknownDomain(#[from] UnknownDomain),

    #[error("invalid assignment '{0}': expected KEY=VALUE")]
    InvalidAssignment(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("field '{0}' is not a section and cannot hold '{1}'")]
    NotASection(String, String),

    #[error("unsupported file type '{0}': expected .json or .toml")]
    UnsupportedFile(String),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("record does not match the {domain} schema: {source}")]
    Schema {
        domain: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, CliError>;
