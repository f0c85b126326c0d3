//! Report data source abstraction
//!
//! The aggregation pipeline reads farm data through [`ReportStore`], a
//! read-mostly query surface that supports:
//! - PostgreSQL: the production back office database (feature `postgres-backend`)
//! - In-memory: embedded data for tests and tooling
//!
//! Every windowed query takes an inclusive [`DateWindow`]. Row queries return
//! entries newest-first (date, then id, descending) and honour `limit`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::metadata::DateWindow;
use crate::models::{
    FinancialRecord, HealthRecord, NewReport, ReportRecord, ResourcesRecord, SalesRecord,
};

pub mod memory;
#[cfg(feature = "postgres-backend")]
pub mod postgres;
pub mod schema;

pub use memory::MemoryStore;
#[cfg(feature = "postgres-backend")]
pub use postgres::PostgresStore;

/// Error type for database operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),
}

/// Result type for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Revenue totals over a window of sales
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub gross_revenue: f64,
    pub net_revenue: f64,
    pub vat_collected: f64,
    pub transactions: i64,
}

/// Current herd health snapshot (active animals only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCounts {
    pub healthy: i64,
    pub attention: i64,
    pub sick: i64,
}

/// Production sums over a window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionTotals {
    pub milk_liters: f64,
    pub eggs_count: i64,
    pub wool_kg: f64,
    pub total_value: f64,
}

/// Query surface consumed by the report pipeline
///
/// Implementations must be safe to share across concurrent requests; the
/// pipeline never mutates farm data, only report rows via `insert_report`.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Fetch a stored report by id
    async fn find_report(&self, id: i64) -> DatabaseResult<Option<ReportRecord>>;

    /// Persist a new report request and return it with its assigned id
    async fn insert_report(&self, report: &NewReport) -> DatabaseResult<ReportRecord>;

    /// Page through reports, most recently generated first
    async fn list_reports(&self, limit: i64, offset: i64) -> DatabaseResult<Vec<ReportRecord>>;

    /// Total number of stored reports
    async fn count_reports(&self) -> DatabaseResult<i64>;

    /// Revenue totals for sales dated inside `window`
    async fn sales_totals(&self, window: &DateWindow) -> DatabaseResult<SalesTotals>;

    /// Sum of expenses dated inside `window`
    async fn expense_total(&self, window: &DateWindow) -> DatabaseResult<f64>;

    /// Sales (positive) and expenses (negative) merged into one feed
    async fn ledger_entries(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> DatabaseResult<Vec<FinancialRecord>>;

    /// Health status counts across active animals, not windowed
    async fn health_status_counts(&self) -> DatabaseResult<HealthCounts>;

    /// Number of active animals
    async fn active_animal_count(&self) -> DatabaseResult<i64>;

    /// Health records dated inside `window`
    async fn health_events(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> DatabaseResult<Vec<HealthRecord>>;

    /// Production sums over `window`
    async fn production_totals(&self, window: &DateWindow) -> DatabaseResult<ProductionTotals>;

    /// Daily production logs inside `window`
    async fn production_logs(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> DatabaseResult<Vec<ResourcesRecord>>;

    /// Individual sales inside `window`
    async fn sales(&self, window: &DateWindow, limit: usize) -> DatabaseResult<Vec<SalesRecord>>;

    /// Backend type name ("postgres" or "memory")
    fn backend_type(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_default_to_zero() {
        let totals = SalesTotals::default();
        assert_eq!(totals.transactions, 0);
        assert_eq!(totals.gross_revenue, 0.0);
        assert_eq!(HealthCounts::default().sick, 0);
    }

    #[test]
    fn test_error_messages() {
        let err = DatabaseError::QueryFailed("relation \"sales\" does not exist".to_string());
        assert_eq!(
            err.to_string(),
            "Query failed: relation \"sales\" does not exist"
        );
    }
}
