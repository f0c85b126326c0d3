//! Report exporters
//!
//! Provides renderers for the download formats:
//! - PDF (single styled page, see [`pdf`])
//! - CSV
//! - JSON
//!
//! [`render`] produces a complete [`ReportDownload`]; [`write_report`]
//! streams the same bytes into a caller-supplied writer.

pub mod csv;
pub mod document;
pub mod highlights;
pub mod json;
pub mod pdf;

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;

use crate::models::{ReportContent, ReportFormat};

pub use document::{DrawOp, Font, PdfDocument, Rect, Rgb};
pub use highlights::{Highlights, MetricLine, build_highlights, summary_lines};

static RE_FILENAME_UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9-]+").expect("Invalid regex"));

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Writing to the output failed; bytes already written are not recalled
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::WriteFailed(err.to_string())
    }
}

impl From<::csv::Error> for ExportError {
    fn from(err: ::csv::Error) -> Self {
        if err.is_io_error() {
            ExportError::WriteFailed(err.to_string())
        } else {
            ExportError::SerializationError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            ExportError::WriteFailed(err.to_string())
        } else {
            ExportError::SerializationError(err.to_string())
        }
    }
}

/// A rendered report ready to be sent as an attachment
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDownload {
    pub format: ReportFormat,
    pub content_type: &'static str,
    /// `{slug}.{ext}`
    pub filename: String,
    pub body: Vec<u8>,
}

impl ReportDownload {
    /// `Content-Disposition` header value
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }

    /// Write the body into `writer`, returning the number of bytes written
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<usize, ExportError> {
        writer.write_all(&self.body)?;
        writer.flush()?;
        Ok(self.body.len())
    }
}

/// Lowercase slug of a report title, `report` when nothing survives
pub fn report_filename(title: &str) -> String {
    let lowered = title.trim().to_lowercase().replace(' ', "-");
    let slug = RE_FILENAME_UNSAFE.replace_all(&lowered, "");
    if slug.is_empty() {
        "report".to_string()
    } else {
        slug.into_owned()
    }
}

/// Attachment filename for `content` in its requested format
pub fn attachment_name(content: &ReportContent) -> String {
    format!(
        "{}.{}",
        report_filename(&content.title),
        content.format.extension()
    )
}

/// Render `content` in its requested format
pub fn render(content: &ReportContent) -> Result<ReportDownload, ExportError> {
    let body = match content.format {
        ReportFormat::Pdf => {
            let highlights = build_highlights(content);
            pdf::render_pdf(content, &summary_lines(content), &highlights)
        }
        ReportFormat::Csv => csv::render_csv(content)?,
        ReportFormat::Json => json::render_json(content)?,
    };

    Ok(ReportDownload {
        format: content.format,
        content_type: content.format.content_type(),
        filename: attachment_name(content),
        body,
    })
}

/// Stream `content` in its requested format into `writer`
pub fn write_report<W: Write>(content: &ReportContent, writer: W) -> Result<(), ExportError> {
    match content.format {
        ReportFormat::Pdf => {
            let highlights = build_highlights(content);
            pdf::compose(content, &summary_lines(content), &highlights).write_to(writer)?;
            Ok(())
        }
        ReportFormat::Csv => csv::write_csv(content, writer),
        ReportFormat::Json => json::write_json(content, writer),
    }
}
