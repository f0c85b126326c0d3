//! PDF report compositor
//!
//! Lays out a single A4 page: themed header banner, report snapshot,
//! summary cards, record highlights table and footer. Layout is expressed in
//! PDF points with the origin at the bottom-left corner.

use super::document::{Font, PdfDocument, Rect, Rgb, word_wrap};
use super::highlights::{Highlights, MetricLine, TABLE_WIDTH, cell_budget, truncate};
use crate::models::{ReportCategory, ReportContent};

/// Page width in points
pub const PAGE_WIDTH: f64 = 595.0;
/// Page height in points
pub const PAGE_HEIGHT: f64 = 842.0;

/// Summary cards drawn on the page
pub const MAX_SUMMARY_CARDS: usize = 6;

const FOOTER_LABEL: &str = "Generated by FarmPro Analytics Engine";
const NO_METRICS: &str = "No summary metrics available.";

const META_X: f64 = 50.0;
const META_WRAP: usize = 78;
const META_TOP: f64 = 703.0;
const META_FLOOR: f64 = 622.0;
const LINE_STEP: f64 = 14.0;

const CARD_COLUMNS: [f64; 3] = [50.0, 216.0, 382.0];
const CARD_ROWS: [f64; 2] = [538.0, 500.0];
const CARD_WIDTH: f64 = 161.0;
const CARD_HEIGHT: f64 = 30.0;
const CARD_LABEL_CHARS: usize = 26;
const CARD_VALUE_CHARS: usize = 24;

const TABLE_X: f64 = 50.0;
const CELL_INSET: f64 = 8.0;
const HEADER_CHARS: usize = 22;
const ROW_TOP: f64 = 390.0;
const ROW_HEIGHT: f64 = 22.0;
const ROW_FLOOR: f64 = 70.0;

const PAGE_BACKGROUND: Rgb = Rgb(0.95, 0.94, 0.91);
const LOWER_BAND: Rgb = Rgb(0.92, 0.91, 0.87);
const PANEL_FILL: Rgb = Rgb::WHITE;
const PANEL_BORDER: Rgb = Rgb(0.86, 0.84, 0.79);
const CARD_FILL: Rgb = Rgb(0.97, 0.96, 0.93);
const HEADER_ROW_FILL: Rgb = Rgb(0.94, 0.94, 0.92);
const ROW_FILLS: [Rgb; 2] = [Rgb(0.98, 0.97, 0.95), Rgb(0.96, 0.95, 0.92)];
const ROW_BORDER: Rgb = Rgb(0.88, 0.86, 0.82);
const INK: Rgb = Rgb(0.16, 0.16, 0.16);
const BANNER_MUTED: Rgb = Rgb(0.92, 0.96, 0.94);
const FOOTER_INK: Rgb = Rgb(0.94, 0.96, 0.94);
const MUTED: Rgb = Rgb(0.38, 0.37, 0.34);

/// Banner colour of a category
pub fn theme(category: ReportCategory) -> Rgb {
    match category {
        ReportCategory::Health => Rgb(0.66, 0.27, 0.24),
        ReportCategory::Resources => Rgb(0.31, 0.40, 0.18),
        ReportCategory::Sales => Rgb(0.12, 0.34, 0.48),
        ReportCategory::Financial => Rgb(0.14, 0.45, 0.30),
    }
}

/// Lay out the report page
pub fn compose(
    content: &ReportContent,
    summary: &[MetricLine],
    highlights: &Highlights,
) -> PdfDocument {
    let accent = theme(content.category);
    let mut doc = PdfDocument::new(PAGE_WIDTH, PAGE_HEIGHT);

    draw_background(&mut doc, content, accent);
    draw_snapshot(&mut doc, content, accent);
    draw_summary(&mut doc, summary, accent);
    draw_highlights(&mut doc, highlights, accent);
    draw_footer(&mut doc, content, accent);

    doc
}

/// Lay out and serialize the report page
pub fn render_pdf(
    content: &ReportContent,
    summary: &[MetricLine],
    highlights: &Highlights,
) -> Vec<u8> {
    compose(content, summary, highlights).to_bytes()
}

fn draw_background(doc: &mut PdfDocument, content: &ReportContent, accent: Rgb) {
    doc.fill_rect(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT), PAGE_BACKGROUND);
    doc.fill_rect(Rect::new(0.0, 0.0, PAGE_WIDTH, 220.0), LOWER_BAND);
    doc.fill_rect(Rect::new(0.0, 758.0, PAGE_WIDTH, 84.0), accent);
    doc.fill_rect(Rect::new(0.0, 742.0, PAGE_WIDTH, 16.0), accent.scale(0.85));

    doc.text(48.0, 806.0, Font::Bold, 24.0, Rgb::WHITE, "FarmPro Report");
    doc.text(
        48.0,
        786.0,
        Font::Regular,
        10.0,
        BANNER_MUTED,
        "Operational export summary",
    );
    doc.text(
        435.0,
        806.0,
        Font::Regular,
        10.0,
        Rgb::WHITE,
        format!("Report #{}", content.id),
    );
}

fn draw_panel(doc: &mut PdfDocument, rect: Rect, heading: &str, heading_y: f64) {
    doc.panel(rect, PANEL_FILL, PANEL_BORDER, 0.8);
    doc.text(50.0, heading_y, Font::Bold, 13.0, INK, heading);
}

fn draw_snapshot(doc: &mut PdfDocument, content: &ReportContent, accent: Rgb) {
    draw_panel(doc, Rect::new(36.0, 610.0, 523.0, 132.0), "Report Snapshot", 722.0);
    doc.fill_rect(Rect::new(36.0, 610.0, 6.0, 132.0), accent);

    let meta = [
        format!("Title: {}", content.title),
        format!("Category: {}", content.category),
        format!("Date Range: {}", content.date_range),
        format!("Generated On: {}", content.generated_on),
    ];

    let mut y = META_TOP;
    let lines = meta.iter().flat_map(|line| word_wrap(line, META_WRAP));
    for line in lines {
        if y < META_FLOOR {
            break;
        }
        doc.text(META_X, y, Font::Regular, 10.0, INK, line);
        y -= LINE_STEP;
    }
}

fn draw_summary(doc: &mut PdfDocument, summary: &[MetricLine], accent: Rgb) {
    draw_panel(doc, Rect::new(36.0, 466.0, 523.0, 128.0), "Summary Metrics", 574.0);
    doc.fill_rect(Rect::new(36.0, 586.0, 523.0, 8.0), accent);

    if summary.is_empty() {
        doc.text(52.0, 526.0, Font::Regular, 10.0, MUTED, NO_METRICS);
        return;
    }

    for (i, metric) in summary.iter().take(MAX_SUMMARY_CARDS).enumerate() {
        let x = CARD_COLUMNS[i % CARD_COLUMNS.len()];
        let y = CARD_ROWS[i / CARD_COLUMNS.len()];
        doc.panel(
            Rect::new(x, y, CARD_WIDTH, CARD_HEIGHT),
            CARD_FILL,
            PANEL_BORDER,
            0.8,
        );
        doc.text(
            x + 8.0,
            y + 18.0,
            Font::Regular,
            8.0,
            MUTED,
            truncate(&metric.label.to_uppercase(), CARD_LABEL_CHARS),
        );
        doc.text(
            x + 8.0,
            y + 7.0,
            Font::Bold,
            10.0,
            accent.scale(0.9),
            truncate(&metric.value, CARD_VALUE_CHARS),
        );
    }
}

/// Left edge of every column, starting at the table inset
fn column_offsets(widths: &[f64]) -> Vec<f64> {
    widths
        .iter()
        .scan(TABLE_X + CELL_INSET, |x, width| {
            let current = *x;
            *x += width;
            Some(current)
        })
        .collect()
}

fn draw_highlights(doc: &mut PdfDocument, highlights: &Highlights, accent: Rgb) {
    draw_panel(doc, Rect::new(36.0, 48.0, 523.0, 402.0), "Record Highlights", 430.0);
    doc.fill_rect(Rect::new(36.0, 442.0, 523.0, 8.0), accent);

    let offsets = column_offsets(&highlights.widths);

    doc.fill_rect(Rect::new(TABLE_X, 406.0, TABLE_WIDTH, 20.0), HEADER_ROW_FILL);
    for (header, x) in highlights.headers.iter().zip(&offsets) {
        doc.text(
            *x,
            412.0,
            Font::Bold,
            8.0,
            INK,
            truncate(header, HEADER_CHARS),
        );
    }
    doc.line(
        (TABLE_X, 406.0),
        (TABLE_X + TABLE_WIDTH, 406.0),
        accent,
        0.6,
    );

    let mut y = ROW_TOP;
    for (i, row) in highlights.rows.iter().enumerate() {
        if y < ROW_FLOOR {
            break;
        }
        doc.panel(
            Rect::new(TABLE_X, y - 4.0, TABLE_WIDTH, ROW_HEIGHT),
            ROW_FILLS[i % 2],
            ROW_BORDER,
            0.3,
        );
        for ((cell, x), width) in row.iter().zip(&offsets).zip(&highlights.widths) {
            doc.text(
                *x,
                y + 5.0,
                Font::Regular,
                7.0,
                INK,
                truncate(cell, cell_budget(*width)),
            );
        }
        y -= ROW_HEIGHT;
    }

    if !highlights.overflow_note.is_empty() {
        doc.text(
            58.0,
            60.0,
            Font::Regular,
            8.0,
            MUTED,
            highlights.overflow_note.as_str(),
        );
    }
}

fn draw_footer(doc: &mut PdfDocument, content: &ReportContent, accent: Rgb) {
    doc.fill_rect(Rect::new(0.0, 0.0, PAGE_WIDTH, 28.0), accent.scale(0.9));
    doc.text(48.0, 11.0, Font::Regular, 9.0, FOOTER_INK, FOOTER_LABEL);
    doc.text(
        430.0,
        11.0,
        Font::Regular,
        9.0,
        FOOTER_INK,
        content.generated_on.as_str(),
    );
}
