//! Closed vocabularies for reports
//!
//! Every value that arrives as free text (request payloads, stored
//! descriptions, query parameters) passes through exactly one `normalize`
//! function per enum. Normalization never fails: unrecognized input maps to
//! the documented default of each enum.
//!
//! All three enums serialize to their display form ("Financial",
//! "Last 7 days", "PDF") so JSON downloads keep the field values the web
//! frontend expects.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Report category, selecting which aggregate queries run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportCategory {
    /// Sales and expenses ledger (fallback category)
    #[default]
    Financial,
    /// Animal health snapshot and treatment history
    Health,
    /// Milk, eggs and wool production
    Resources,
    /// Sales with VAT detail
    Sales,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 4] = [
        ReportCategory::Financial,
        ReportCategory::Health,
        ReportCategory::Resources,
        ReportCategory::Sales,
    ];

    /// Normalize free text, falling back to `Financial`
    pub fn normalize(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "financial" => ReportCategory::Financial,
            "health" => ReportCategory::Health,
            "resources" => ReportCategory::Resources,
            "sales" => ReportCategory::Sales,
            _ => ReportCategory::Financial,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportCategory::Financial => "Financial",
            ReportCategory::Health => "Health",
            ReportCategory::Resources => "Resources",
            ReportCategory::Sales => "Sales",
        }
    }
}

/// Symbolic reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateRange {
    /// Seven inclusive days ending today (fallback range)
    #[default]
    Last7Days,
    /// Thirty inclusive days ending today
    Last30Days,
    /// First day of the current month through today
    ThisMonth,
}

impl DateRange {
    pub const ALL: [DateRange; 3] = [
        DateRange::Last7Days,
        DateRange::Last30Days,
        DateRange::ThisMonth,
    ];

    /// Normalize free text, falling back to `Last 7 days`
    pub fn normalize(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "last 7 days" => DateRange::Last7Days,
            "last 30 days" => DateRange::Last30Days,
            "this month" => DateRange::ThisMonth,
            _ => DateRange::Last7Days,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Last7Days => "Last 7 days",
            DateRange::Last30Days => "Last 30 days",
            DateRange::ThisMonth => "This month",
        }
    }
}

/// Download format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportFormat {
    Pdf,
    Csv,
    /// Fallback format
    #[default]
    Json,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Pdf, ReportFormat::Csv, ReportFormat::Json];

    /// Normalize free text, falling back to `JSON`
    pub fn normalize(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "PDF" => ReportFormat::Pdf,
            "CSV" => ReportFormat::Csv,
            "JSON" => ReportFormat::Json,
            _ => ReportFormat::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "PDF",
            ReportFormat::Csv => "CSV",
            ReportFormat::Json => "JSON",
        }
    }

    /// File extension used in `Content-Disposition`
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Csv => "text/csv; charset=utf-8",
            ReportFormat::Json => "application/json",
        }
    }
}

macro_rules! display_and_serde {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl From<&str> for $ty {
                fn from(value: &str) -> Self {
                    <$ty>::normalize(value)
                }
            }

            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.as_str())
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let raw = String::deserialize(deserializer)?;
                    Ok(<$ty>::normalize(&raw))
                }
            }
        )*
    };
}

display_and_serde!(ReportCategory, DateRange, ReportFormat);
