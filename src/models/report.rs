//! Stored report requests and the per-download report content

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::enums::{DateRange, ReportCategory, ReportFormat};
use super::records::ReportRow;
use crate::format::ReportValue;

/// A persisted report request.
///
/// `description` encodes the date range and format (see
/// [`crate::metadata::codec`]). Rows are only ever inserted; regeneration
/// creates a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: ReportCategory,
    pub last_generated: NaiveDate,
}

/// Values needed to persist a new report request
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub title: String,
    pub description: String,
    pub category: ReportCategory,
    pub generated_on: NaiveDate,
}

/// A summary metric: either a monetary/plain amount or a whole count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(i64),
    Amount(f64),
}

impl ReportValue for MetricValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Count(n) => Some(*n as f64),
            MetricValue::Amount(n) => Some(*n),
        }
    }

    fn to_plain_string(&self) -> String {
        match self {
            MetricValue::Count(n) => n.to_string(),
            MetricValue::Amount(n) => n.to_plain_string(),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Count(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Amount(value)
    }
}

/// Category-specific aggregate metrics keyed by their camelCase name.
/// Iteration order is alphabetical.
pub type Summary = BTreeMap<String, MetricValue>;

/// Everything a download renders, built fresh per request and never stored.
///
/// `records` is newest-first and holds at most
/// [`crate::aggregate::RECORD_LIMIT`] rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportContent {
    pub id: i64,
    pub title: String,
    pub category: ReportCategory,
    pub date_range: DateRange,
    pub format: ReportFormat,
    pub generated_on: String,
    pub summary: Summary,
    pub records: Vec<ReportRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_content_field_names() {
        let mut summary = Summary::new();
        summary.insert("healthy".to_string(), MetricValue::Count(12));
        summary.insert("milkLiters".to_string(), MetricValue::Amount(42.5));

        let content = ReportContent {
            id: 7,
            title: "Herd check".to_string(),
            category: ReportCategory::Health,
            date_range: DateRange::Last30Days,
            format: ReportFormat::Pdf,
            generated_on: "2025-03-10".to_string(),
            summary,
            records: Vec::new(),
        };

        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["dateRange"], "Last 30 days");
        assert_eq!(json["generatedOn"], "2025-03-10");
        assert_eq!(json["format"], "PDF");
        assert_eq!(json["summary"]["healthy"], 12);
        assert_eq!(json["summary"]["milkLiters"], 42.5);
    }

    #[test]
    fn test_metric_value_coercion() {
        assert_eq!(MetricValue::Count(3).as_number(), Some(3.0));
        assert_eq!(MetricValue::Amount(80.0).to_plain_string(), "80");
    }
}
