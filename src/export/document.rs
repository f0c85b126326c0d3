//! Single-page PDF document builder
//!
//! Layout code records drawing operations through a small API
//! ([`PdfDocument::fill_rect`], [`PdfDocument::text`], ...). The recorded
//! display list is only turned into PDF syntax by [`PdfDocument::to_bytes`],
//! which writes the fixed six-object graph:
//!
//! 1. Catalog
//! 2. Pages
//! 3. Page
//! 4. Content stream
//! 5. Helvetica (`/F1`)
//! 6. Helvetica-Bold (`/F2`)
//!
//! followed by a cross-reference table with exact byte offsets.

use std::fmt::Write as _;
use std::io::{self, Write};

/// Number of indirect objects in every document
pub const OBJECT_COUNT: usize = 6;

/// RGB colour with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f64, pub f64, pub f64);

impl Rgb {
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);

    /// Multiply every component by `factor`, clamped to the valid range
    pub fn scale(self, factor: f64) -> Rgb {
        let clamp = |v: f64| (v * factor).clamp(0.0, 1.0);
        Rgb(clamp(self.0), clamp(self.1), clamp(self.2))
    }
}

/// Page font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Helvetica
    Regular,
    /// Helvetica-Bold
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "/F1",
            Font::Bold => "/F2",
        }
    }
}

/// Axis-aligned rectangle, origin at the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Rgb,
    },
    /// Filled and outlined in one operation
    Panel {
        rect: Rect,
        fill: Rgb,
        stroke: Rgb,
        line_width: f64,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Rgb,
        line_width: f64,
    },
    Text {
        x: f64,
        y: f64,
        font: Font,
        size: f64,
        color: Rgb,
        text: String,
    },
}

/// Display list for one page plus its serializer
#[derive(Debug, Clone, PartialEq)]
pub struct PdfDocument {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
}

impl PdfDocument {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    pub fn panel(&mut self, rect: Rect, fill: Rgb, stroke: Rgb, line_width: f64) {
        self.ops.push(DrawOp::Panel {
            rect,
            fill,
            stroke,
            line_width,
        });
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb, line_width: f64) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            line_width,
        });
    }

    pub fn text(
        &mut self,
        x: f64,
        y: f64,
        font: Font,
        size: f64,
        color: Rgb,
        text: impl Into<String>,
    ) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            font,
            size,
            color,
            text: text.into(),
        });
    }

    /// Recorded operations in drawing order
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text runs in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Page content stream operators
    pub fn content_stream(&self) -> String {
        let mut out = String::new();
        for op in &self.ops {
            // Writing to a String cannot fail
            let _ = write_op(&mut out, op);
        }
        out
    }

    /// Serialize the complete document
    pub fn to_bytes(&self) -> Vec<u8> {
        let stream = self.content_stream();
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 5 0 R /F2 6 0 R >> >> /Contents 4 0 R >>",
                num(self.width),
                num(self.height)
            ),
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                stream.len(),
                stream
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf: Vec<u8> = Vec::new();
        pdf.extend_from_slice(b"%PDF-1.4\n");

        let mut xref_positions = Vec::with_capacity(OBJECT_COUNT);
        for (i, body) in objects.iter().enumerate() {
            xref_positions.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        // Cross-reference table
        let xref_start = pdf.len();
        pdf.extend_from_slice(b"xref\n");
        pdf.extend_from_slice(format!("0 {}\n", xref_positions.len() + 1).as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for pos in &xref_positions {
            pdf.extend_from_slice(format!("{:010} 00000 n \n", pos).as_bytes());
        }

        // Trailer
        pdf.extend_from_slice(b"trailer\n");
        pdf.extend_from_slice(format!("<< /Size {} /Root 1 0 R >>\n", OBJECT_COUNT).as_bytes());
        pdf.extend_from_slice(format!("startxref\n{}\n%%EOF", xref_start).as_bytes());

        pdf
    }

    /// Serialize into `writer`
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()
    }
}

fn write_op(out: &mut String, op: &DrawOp) -> std::fmt::Result {
    match op {
        DrawOp::FillRect { rect, color } => {
            writeln!(out, "{} rg", rgb(color))?;
            writeln!(out, "{} re f", rect_args(rect))
        }
        DrawOp::Panel {
            rect,
            fill,
            stroke,
            line_width,
        } => {
            writeln!(out, "{} rg", rgb(fill))?;
            writeln!(out, "{} RG", rgb(stroke))?;
            writeln!(out, "{} w", num(*line_width))?;
            writeln!(out, "{} re B", rect_args(rect))
        }
        DrawOp::Line {
            from,
            to,
            color,
            line_width,
        } => {
            writeln!(out, "{} RG", rgb(color))?;
            writeln!(out, "{} w", num(*line_width))?;
            writeln!(out, "{} {} m", num(from.0), num(from.1))?;
            writeln!(out, "{} {} l", num(to.0), num(to.1))?;
            writeln!(out, "S")
        }
        DrawOp::Text {
            x,
            y,
            font,
            size,
            color,
            text,
        } => {
            writeln!(out, "BT")?;
            writeln!(out, "{} {} Tf", font.resource(), num(*size))?;
            writeln!(out, "{} rg", rgb(color))?;
            writeln!(out, "{} {} Td", num(*x), num(*y))?;
            writeln!(out, "({}) Tj", escape_pdf_string(text))?;
            writeln!(out, "ET")
        }
    }
}

fn rect_args(rect: &Rect) -> String {
    format!(
        "{} {} {} {}",
        num(rect.x),
        num(rect.y),
        num(rect.width),
        num(rect.height)
    )
}

fn rgb(color: &Rgb) -> String {
    format!("{} {} {}", num(color.0), num(color.1), num(color.2))
}

/// Shortest fixed-point form with at most three decimals
fn num(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Escape text for a PDF literal string in WinAnsiEncoding
pub fn escape_pdf_string(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '©' => result.push_str("\\251"),
            '®' => result.push_str("\\256"),
            '™' => result.push_str("\\231"),
            '•' => result.push_str("\\267"),
            '–' => result.push_str("\\226"),
            '—' => result.push_str("\\227"),
            _ if c.is_ascii() => result.push(c),
            _ => result.push('?'),
        }
    }
    result
}

/// Word wrap text to fit within max characters per line
pub fn word_wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.chars().count() + 1 + word.chars().count() <= max_chars {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
