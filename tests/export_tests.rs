//! Export module tests

use chrono::NaiveDate;
use farmpro_reports::export::document::{DrawOp, OBJECT_COUNT};
use farmpro_reports::export::highlights::{
    EMPTY_PLACEHOLDER, MAX_HIGHLIGHT_ROWS, build_highlights, cell_budget, summary_lines, truncate,
};
use farmpro_reports::export::{self, ExportError, pdf};
use farmpro_reports::models::{
    DateRange, FinancialRecord, LedgerKind, MetricValue, ReportCategory, ReportContent,
    ReportFormat, ReportRow, SalesRecord, Summary,
};

fn ledger_entry(id: i64, day: u32, kind: LedgerKind, item: &str, amount: f64) -> ReportRow {
    FinancialRecord {
        id,
        date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
        kind,
        item: item.to_string(),
        amount,
    }
    .into()
}

fn create_test_content(format: ReportFormat, records: Vec<ReportRow>) -> ReportContent {
    let mut summary = Summary::new();
    for (key, value) in [
        ("grossRevenue", 150.0),
        ("netRevenue", 150.0),
        ("vatCollected", 0.0),
        ("totalExpenses", 30.0),
        ("profit", 120.0),
        ("totalRevenue", 150.0),
    ] {
        summary.insert(key.to_string(), MetricValue::Amount(value));
    }
    ReportContent {
        id: 17,
        title: "Weekly Finance (June)".to_string(),
        category: ReportCategory::Financial,
        date_range: DateRange::Last7Days,
        format,
        generated_on: "2025-06-07".to_string(),
        summary,
        records,
    }
}

fn feed() -> Vec<ReportRow> {
    vec![
        ledger_entry(2, 5, LedgerKind::Sale, "Milk", 50.0),
        ledger_entry(1, 4, LedgerKind::Expense, "Feed", -30.0),
        ledger_entry(1, 2, LedgerKind::Sale, "Eggs", 100.0),
    ]
}

#[test]
fn test_pdf_envelope() {
    let content = create_test_content(ReportFormat::Pdf, feed());
    let download = export::render(&content).unwrap();

    assert_eq!(download.content_type, "application/pdf");
    assert_eq!(download.filename, "weekly-finance-june.pdf");
    assert!(download.body.starts_with(b"%PDF-1.4\n"));
    assert!(download.body.ends_with(b"%%EOF"));

    let text = String::from_utf8(download.body).unwrap();
    assert!(text.contains(&format!("/Size {} ", OBJECT_COUNT)));
    assert_eq!(OBJECT_COUNT, 6);
    for name in ["/Catalog", "/Pages", "/Page ", "/Helvetica ", "/Helvetica-Bold"] {
        assert!(text.contains(name), "missing {}", name);
    }
}

#[test]
fn test_pdf_layout_contains_rows_and_cards() {
    let content = create_test_content(ReportFormat::Pdf, feed());
    let lines = summary_lines(&content);
    let highlights = build_highlights(&content);
    let doc = pdf::compose(&content, &lines, &highlights);
    let texts: Vec<&str> = doc.texts().collect();

    assert!(texts.contains(&"FarmPro Report"));
    assert!(texts.contains(&"Report #17"));
    assert!(texts.contains(&"Title: Weekly Finance (June)"));
    assert!(texts.contains(&"GROSS REVENUE"));
    assert!(texts.contains(&"KSh 120"));
    assert!(texts.contains(&"Milk"));
    assert!(texts.contains(&"KSh -30"));
    assert!(texts.contains(&"Generated by FarmPro Analytics Engine"));

    // The sixth metric (vatCollected) is the last card; nothing beyond six
    let cards = doc
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::Panel { rect, .. } if rect.width == 161.0))
        .count();
    assert_eq!(cards, 6);
}

#[test]
fn test_pdf_table_is_capped_with_overflow_note() {
    let records: Vec<ReportRow> = (0..15)
        .map(|i| ledger_entry(i, 3, LedgerKind::Sale, &format!("Sale {}", i), 10.0))
        .collect();
    let content = create_test_content(ReportFormat::Pdf, records);
    let highlights = build_highlights(&content);
    assert_eq!(highlights.rows.len(), MAX_HIGHLIGHT_ROWS);

    let doc = pdf::compose(&content, &summary_lines(&content), &highlights);
    let row_panels = doc
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::Panel { rect, .. } if rect.width == 496.0))
        .count();
    assert_eq!(row_panels, MAX_HIGHLIGHT_ROWS);
    assert!(doc.texts().any(|t| t == "3 additional records not shown."));
}

#[test]
fn test_highlights_without_records() {
    let content = create_test_content(ReportFormat::Pdf, Vec::new());
    let highlights = build_highlights(&content);
    assert_eq!(highlights.headers, vec!["#", "Details"]);
    assert_eq!(highlights.widths, vec![248.0, 248.0]);
    assert_eq!(highlights.rows.len(), 1);
    assert_eq!(highlights.rows[0][1], EMPTY_PLACEHOLDER);
    assert!(highlights.overflow_note.is_empty());
}

#[test]
fn test_truncation_budget() {
    let long = "x".repeat(50);
    let cut = truncate(&long, 10);
    assert_eq!(cut.chars().count(), 10);
    assert_eq!(cut, format!("{}...", "x".repeat(7)));

    assert_eq!(cell_budget(26.0), 6);
    assert_eq!(cell_budget(230.0), 55);
    assert_eq!(truncate("Milk", 6), "Milk");
}

#[test]
fn test_csv_first_lines() {
    let content = create_test_content(ReportFormat::Csv, feed());
    let download = export::render(&content).unwrap();
    assert_eq!(download.content_type, "text/csv; charset=utf-8");
    assert_eq!(download.filename, "weekly-finance-june.csv");

    let text = String::from_utf8(download.body).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        &lines[..5],
        &[
            "report_id,17",
            "title,Weekly Finance (June)",
            "category,Financial",
            "date_range,Last 7 days",
            "generated_on,2025-06-07",
        ]
    );
    assert_eq!(lines[5], "");
    assert_eq!(lines[6], "summary_key,summary_value");
    assert_eq!(lines[7], "grossRevenue,150");
    assert!(lines.contains(&"amount,date,item,type"));
    assert!(lines.contains(&"-30,2025-06-04,Feed,expense"));
    assert_eq!(lines.last(), Some(&"100,2025-06-02,Eggs,sale"));
}

#[test]
fn test_csv_sales_rows_keep_vat_fields() {
    let sale = SalesRecord {
        id: 1,
        date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
        product: "Milk".to_string(),
        quantity_value: 20.0,
        quantity_unit: "L".to_string(),
        buyer: "Brookside".to_string(),
        buyer_pin: "P051234567X".to_string(),
        vat_applicable: true,
        vat_rate: 16.0,
        vat_amount: 16.0,
        net_amount: 100.0,
        price_per_unit: 5.8,
        total_amount: 116.0,
    };
    let mut content = create_test_content(ReportFormat::Csv, vec![sale.into()]);
    content.category = ReportCategory::Sales;

    let text = String::from_utf8(export::render(&content).unwrap().body).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let header = lines[lines.len() - 2];
    assert!(header.contains("buyerPIN"));
    assert!(header.contains("vatAmount"));
    assert!(lines[lines.len() - 1].contains("true"));
}

#[test]
fn test_json_download() {
    let content = create_test_content(ReportFormat::Json, feed());
    let download = export::render(&content).unwrap();
    assert_eq!(download.content_type, "application/json");

    let parsed: ReportContent = serde_json::from_slice(&download.body).unwrap();
    assert_eq!(parsed.title, content.title);
    assert_eq!(parsed.records.len(), 3);
    assert_eq!(parsed.summary["profit"], MetricValue::Amount(120.0));
}

#[test]
fn test_stream_matches_render() {
    for format in ReportFormat::ALL {
        let content = create_test_content(format, feed());
        let rendered = export::render(&content).unwrap();
        let mut streamed = Vec::new();
        export::write_report(&content, &mut streamed).unwrap();
        assert_eq!(streamed, rendered.body, "{}", format);
    }
}

#[test]
fn test_stream_write_failure() {
    struct Full;
    impl std::io::Write for Full {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "disk full"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    for format in ReportFormat::ALL {
        let content = create_test_content(format, feed());
        let err = export::write_report(&content, Full).unwrap_err();
        assert!(matches!(err, ExportError::WriteFailed(_)), "{}: {:?}", format, err);
    }
}
