//! CLI command implementations
//!
//! Each command has an async `run_*` function that works against any
//! [`ReportService`] and returns the text to print, plus a blocking
//! `handle_*` wrapper that builds the PostgreSQL-backed service from
//! configuration.

pub mod decode;
pub mod download;
pub mod generate;
pub mod list;
pub mod stats;

use std::sync::Arc;

use crate::cli::error::CliError;
use crate::clock::SystemClock;
use crate::config::AppConfig;
use crate::database::PostgresStore;
use crate::service::ReportService;

/// Build the report service described by `config`
pub fn build_service(config: &AppConfig) -> Result<ReportService, CliError> {
    let store = PostgresStore::from_config(config)?;
    tracing::debug!(
        database = %store.connection_string_masked(),
        "Using PostgreSQL report store"
    );
    let clock = SystemClock::new(config.timezone()?);

    Ok(ReportService::new(Arc::new(store), Arc::new(clock)).with_query_timeout(config.query_timeout()))
}

/// Runtime for the blocking command handlers
pub fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::IoError(format!("Failed to create runtime: {}", e)))
}
