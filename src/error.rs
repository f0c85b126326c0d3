//! Error taxonomy for the report pipeline

use std::time::Duration;

use crate::database::DatabaseError;
use crate::export::ExportError;

/// Error returned by report generation and download
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// No stored report with this id
    #[error("Report {0} not found")]
    NotFound(i64),

    /// A data-source query failed; nothing was rendered
    #[error("Failed to aggregate report data: {0}")]
    AggregationFailed(#[from] DatabaseError),

    /// The aggregation queries did not finish in time
    #[error("Report aggregation timed out after {}s", .0.as_secs_f64())]
    AggregationTimeout(Duration),

    /// Rendering or writing the output failed
    #[error("Failed to render report: {0}")]
    RenderFailed(#[from] ExportError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ReportError {
    /// Whether the error maps to a missing resource rather than a fault
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReportError::NotFound(_))
    }
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;
