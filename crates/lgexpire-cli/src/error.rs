//! CLI error types.

use std::path::PathBuf;

use lgexpire::ExpireError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// The retention pass or its configuration failed.
    #[error(transparent)]
    Expire(#[from] ExpireError),

    /// Refused to overwrite an existing file.
    #[error("{} already exists, use --force to overwrite", .0.display())]
    AlreadyExists(PathBuf),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
