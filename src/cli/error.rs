//! CLI-specific error types

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::database::DatabaseError;
use crate::error::ReportError;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("{0}")]
    ReportError(#[from] ReportError),

    #[error("Failed to write file {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(String),
}
