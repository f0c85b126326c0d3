//! Report description codec
//!
//! A stored report keeps its date range and format inside the free-text
//! `description` column. New rows use the canonical pipe-delimited form:
//!
//! ```text
//! Generated health report | range=Last 30 days | format=PDF
//! ```
//!
//! Older rows (and the listing `detail` line) use a prose form, which the
//! decoder also understands:
//!
//! ```text
//! Generated health report for Last 30 days (PDF)
//! ```
//!
//! Decoding never fails. Anything unrecognizable yields the defaults
//! (`Last 7 days`, `JSON`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{DateRange, ReportCategory, ReportFormat};

static RE_CANONICAL_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\|\s*range\s*=").expect("Invalid regex"));
static RE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(range|format)\s*=\s*(.*)$").expect("Invalid regex"));

/// Date range and format recovered from a description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub date_range: DateRange,
    pub format: ReportFormat,
}

/// Produce the canonical description for a report request.
///
/// Arguments accept either the enums or raw strings (normalized on the way in).
pub fn encode(
    category: impl Into<ReportCategory>,
    date_range: impl Into<DateRange>,
    format: impl Into<ReportFormat>,
) -> String {
    format!(
        "Generated {} report | range={} | format={}",
        category.into().as_str().to_lowercase(),
        date_range.into(),
        format.into()
    )
}

/// Prose form shown in report listings, e.g.
/// `Generated sales report for This month (CSV)`
pub fn describe(category: ReportCategory, metadata: &ReportMetadata) -> String {
    format!(
        "Generated {} report for {} ({})",
        category.as_str().to_lowercase(),
        metadata.date_range,
        metadata.format
    )
}

/// Recover date range and format from a stored description
pub fn decode(description: &str) -> ReportMetadata {
    let mut metadata = ReportMetadata::default();
    let desc = description.trim();
    if desc.is_empty() {
        return metadata;
    }

    if RE_CANONICAL_MARKER.is_match(desc) {
        for segment in desc.split('|').map(str::trim) {
            if let Some(caps) = RE_SEGMENT.captures(segment) {
                let value = caps[2].trim();
                if caps[1].eq_ignore_ascii_case("range") {
                    metadata.date_range = DateRange::normalize(value);
                } else {
                    metadata.format = ReportFormat::normalize(value);
                }
            }
        }
        return metadata;
    }

    if desc.ends_with(')')
        && let Some(open) = desc.rfind('(')
        && open < desc.len() - 1
    {
        metadata.format = ReportFormat::normalize(&desc[open + 1..desc.len() - 1]);
    }

    // ASCII lowercasing keeps byte offsets aligned with `desc`
    if let Some(pos) = desc.to_ascii_lowercase().find(" for ") {
        let mut rest = desc[pos + 5..].trim();
        if let Some(suffix) = rest.rfind(" (")
            && suffix > 0
        {
            rest = rest[..suffix].trim();
        }
        metadata.date_range = DateRange::normalize(rest);
    }

    metadata
}
