//! JSON exporter

use std::io::Write;

use super::ExportError;
use crate::models::ReportContent;

/// Serialize `content` as pretty-printed JSON
pub fn render_json(content: &ReportContent) -> Result<Vec<u8>, ExportError> {
    let mut buf = serde_json::to_vec_pretty(content)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Serialize `content` as JSON into `writer`
pub fn write_json<W: Write>(content: &ReportContent, mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, content)?;
    writer.write_all(b"\n")?;
    Ok(())
}
