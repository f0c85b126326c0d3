//! Decode a stored report description without touching the database

use crate::metadata::{decode, encode};
use crate::models::ReportCategory;

/// Show what a description decodes to and its canonical re-encoding
pub fn run_decode(description: &str, category: Option<&str>) -> String {
    let metadata = decode(description);
    let category = category
        .map(ReportCategory::normalize)
        .unwrap_or_default();
    format!(
        "date range: {}\nformat:     {}\ncanonical:  {}",
        metadata.date_range,
        metadata.format,
        encode(category, metadata.date_range, metadata.format)
    )
}

pub fn handle_decode(description: &str, category: Option<&str>) {
    println!("{}", run_decode(description, category));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_decode_legacy() {
        let out = run_decode("Generated sales report for Last 30 days (CSV)", Some("sales"));
        assert_eq!(
            out,
            "date range: Last 30 days\nformat:     CSV\n\
             canonical:  Generated sales report | range=Last 30 days | format=CSV"
        );
    }

    #[test]
    fn test_run_decode_garbage_defaults() {
        let out = run_decode("???", None);
        assert!(out.starts_with("date range: Last 7 days\nformat:     JSON\n"));
    }
}
