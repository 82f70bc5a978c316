//! Error types for the CLI

use core_types::DrakeError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the source or writing the output failed
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    /// The source did not lex or parse
    #[error(transparent)]
    Drake(#[from] DrakeError),

    /// The artefact could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
