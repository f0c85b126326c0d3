//! FarmPro Reports - report aggregation and rendering for the FarmPro back office
//!
//! Provides:
//! - Report metadata codec and date-range resolution
//! - Category aggregation over a pluggable data store (PostgreSQL, in-memory)
//! - Value formatting shared by every output
//! - PDF (hand-built single page), CSV and JSON exporters
//! - A `ReportService` tying generate / list / stats / download together
//!
//! ```no_run
//! use std::sync::Arc;
//! use farmpro_reports::{MemoryStore, ReportService, SystemClock};
//!
//! # async fn demo() -> Result<(), farmpro_reports::ReportError> {
//! let service = ReportService::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock::utc()));
//! let download = service.download(1, Some("pdf")).await?;
//! std::fs::write(&download.filename, &download.body).ok();
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
#[cfg(feature = "cli")]
pub mod cli;
pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod format;
pub mod metadata;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use aggregate::{Aggregate, Aggregator, RECORD_LIMIT};
pub use clock::{Clock, FarmTimezone, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError};
#[cfg(feature = "postgres-backend")]
pub use database::PostgresStore;
pub use database::{DatabaseError, DatabaseResult, MemoryStore, ReportStore};
pub use error::{ReportError, ReportResult};
pub use export::{ExportError, ReportDownload};
pub use metadata::{DateWindow, ReportMetadata};
pub use service::{
    GenerateReportRequest, GeneratedReport, ReportListing, ReportPage, ReportService, ReportStats,
};

// Re-export models
pub use models::*;
