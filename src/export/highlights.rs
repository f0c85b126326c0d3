//! Tabular highlights and summary ordering for the PDF page
//!
//! Column schemas are static per category. Cell text is cut to a
//! character budget derived from the column width (roughly four points per
//! glyph at the table's font size), not from real font metrics.

use crate::format::{format_value, metric_label};
use crate::models::{Renderable, ReportCategory, ReportContent};

/// Width of the highlight table in points
pub const TABLE_WIDTH: f64 = 496.0;

/// Rows drawn in the highlight table
pub const MAX_HIGHLIGHT_ROWS: usize = 12;

/// Placeholder cell for a report without records
pub const EMPTY_PLACEHOLDER: &str = "No records available in this range.";

/// Headers and widths (in points) of a highlight table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSchema {
    pub headers: &'static [&'static str],
    pub widths: &'static [f64],
}

static FINANCIAL_COLUMNS: ColumnSchema = ColumnSchema {
    headers: &["#", "Date", "Type", "Item", "Amount"],
    widths: &[26.0, 82.0, 62.0, 230.0, 96.0],
};

static SALES_COLUMNS: ColumnSchema = ColumnSchema {
    headers: &["#", "Date", "Product", "Qty", "Buyer", "Total"],
    widths: &[24.0, 70.0, 118.0, 72.0, 134.0, 78.0],
};

static RESOURCES_COLUMNS: ColumnSchema = ColumnSchema {
    headers: &["#", "Date", "Milk (L)", "Eggs", "Wool (Kg)", "Value"],
    widths: &[24.0, 74.0, 96.0, 72.0, 96.0, 134.0],
};

static HEALTH_COLUMNS: ColumnSchema = ColumnSchema {
    headers: &["#", "Date", "Tag", "Action", "Treatment", "Vet"],
    widths: &[24.0, 66.0, 64.0, 88.0, 142.0, 112.0],
};

/// Fallback two-column layout
pub static GENERIC_COLUMNS: ColumnSchema = ColumnSchema {
    headers: &["#", "Details"],
    widths: &[TABLE_WIDTH / 2.0, TABLE_WIDTH / 2.0],
};

/// Column schema of a category
pub fn column_schema(category: ReportCategory) -> &'static ColumnSchema {
    match category {
        ReportCategory::Financial => &FINANCIAL_COLUMNS,
        ReportCategory::Sales => &SALES_COLUMNS,
        ReportCategory::Resources => &RESOURCES_COLUMNS,
        ReportCategory::Health => &HEALTH_COLUMNS,
    }
}

/// Summary keys in display order, per category
fn summary_priority(category: ReportCategory) -> &'static [&'static str] {
    match category {
        ReportCategory::Financial => &[
            "grossRevenue",
            "netRevenue",
            "profit",
            "totalExpenses",
            "totalRevenue",
            "vatCollected",
        ],
        ReportCategory::Sales => &[
            "grossRevenue",
            "netRevenue",
            "totalRevenue",
            "vatCollected",
            "transactions",
        ],
        ReportCategory::Resources => &["totalValue", "milkLiters", "eggsCount", "woolKg"],
        ReportCategory::Health => &["healthy", "attention", "sick"],
    }
}

/// Table rows ready for layout
#[derive(Debug, Clone, PartialEq)]
pub struct Highlights {
    pub headers: Vec<String>,
    pub widths: Vec<f64>,
    pub rows: Vec<Vec<String>>,
    /// Empty when every record fits
    pub overflow_note: String,
}

/// One summary card: label and formatted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLine {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Character budget of a cell in a column `width` points wide
pub fn cell_budget(width: f64) -> usize {
    let budget = ((width - 10.0) / 4.0).floor();
    if budget.is_finite() && budget > 6.0 {
        budget as usize
    } else {
        6
    }
}

/// Cut `value` to at most `max` characters, ending in `...` when cut
pub fn truncate(value: &str, max: usize) -> String {
    let count = value.chars().count();
    if count <= max {
        return value.to_string();
    }
    if max <= 3 {
        return value.chars().take(max).collect();
    }
    let mut out: String = value.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

/// Project the first [`MAX_HIGHLIGHT_ROWS`] records into table rows
pub fn build_highlights(content: &ReportContent) -> Highlights {
    if content.records.is_empty() {
        let schema = &GENERIC_COLUMNS;
        let row = fit_row(vec!["1".to_string(), EMPTY_PLACEHOLDER.to_string()], schema);
        return Highlights {
            headers: headers(schema),
            widths: schema.widths.to_vec(),
            rows: vec![row],
            overflow_note: String::new(),
        };
    }

    let schema = column_schema(content.category);
    let rows = content
        .records
        .iter()
        .take(MAX_HIGHLIGHT_ROWS)
        .enumerate()
        .map(|(i, record)| {
            let mut cells = Vec::with_capacity(schema.headers.len());
            cells.push((i + 1).to_string());
            cells.extend(record.display_columns());
            fit_row(cells, schema)
        })
        .collect();

    let hidden = content.records.len().saturating_sub(MAX_HIGHLIGHT_ROWS);
    let overflow_note = if hidden > 0 {
        format!("{} additional records not shown.", hidden)
    } else {
        String::new()
    };

    Highlights {
        headers: headers(schema),
        widths: schema.widths.to_vec(),
        rows,
        overflow_note,
    }
}

fn headers(schema: &ColumnSchema) -> Vec<String> {
    schema.headers.iter().map(|h| h.to_string()).collect()
}

/// Pad or cut `cells` to the schema's column count and truncate each cell
fn fit_row(mut cells: Vec<String>, schema: &ColumnSchema) -> Vec<String> {
    cells.resize(schema.widths.len(), String::new());
    cells
        .iter()
        .zip(schema.widths)
        .map(|(cell, width)| truncate(cell, cell_budget(*width)))
        .collect()
}

/// Summary keys in display order: the category's priority list first, then
/// any remaining keys alphabetically
pub fn ordered_summary_keys(content: &ReportContent) -> Vec<&str> {
    let priority = summary_priority(content.category);
    let mut keys: Vec<&str> = priority
        .iter()
        .copied()
        .filter(|key| content.summary.contains_key(*key))
        .collect();
    // BTreeMap iterates alphabetically
    keys.extend(
        content
            .summary
            .keys()
            .map(String::as_str)
            .filter(|key| !priority.contains(key)),
    );
    keys
}

/// Labelled, formatted summary metrics in display order
pub fn summary_lines(content: &ReportContent) -> Vec<MetricLine> {
    ordered_summary_keys(content)
        .into_iter()
        .filter_map(|key| {
            content.summary.get(key).map(|value| MetricLine {
                key: key.to_string(),
                label: metric_label(key),
                value: format_value(key, value),
            })
        })
        .collect()
}
