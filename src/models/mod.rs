//! Report data model
//!
//! Closed enums for category/range/format, the typed row variants produced
//! by aggregation, and the stored/ephemeral report structures.

pub mod enums;
pub mod records;
pub mod report;

pub use enums::{DateRange, ReportCategory, ReportFormat};
pub use records::{
    FinancialRecord, HealthRecord, LedgerKind, Renderable, ReportRow, ResourcesRecord,
    SalesRecord,
};
pub use report::{MetricValue, NewReport, ReportContent, ReportRecord, Summary};
