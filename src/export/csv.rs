//! CSV exporter
//!
//! Layout:
//!
//! ```text
//! report_id,7
//! title,Weekly finance
//! category,Financial
//! date_range,Last 7 days
//! generated_on,2025-06-07
//!
//! summary_key,summary_value
//! grossRevenue,150
//! ...
//!
//! amount,date,item,type
//! 50,2025-06-05,Milk,sale
//! ```
//!
//! The record header is the sorted key set of the first record. A report
//! without records ends with a single `records,none` line.

use std::collections::BTreeMap;
use std::io::Write;

use super::ExportError;
use crate::format::ReportValue;
use crate::models::ReportContent;

/// Serialize `content` as CSV into a byte buffer
pub fn render_csv(content: &ReportContent) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(content, &mut buf)?;
    Ok(buf)
}

/// Serialize `content` as CSV into `writer`
///
/// Each section gets its own CSV writer over `writer`. Blank separator lines
/// go straight to `writer` between sections.
pub fn write_csv<W: Write>(content: &ReportContent, mut writer: W) -> Result<(), ExportError> {
    let id = content.id.to_string();
    let header: [(&str, &str); 5] = [
        ("report_id", &id),
        ("title", &content.title),
        ("category", content.category.as_str()),
        ("date_range", content.date_range.as_str()),
        ("generated_on", &content.generated_on),
    ];
    {
        let mut wtr = section(&mut writer);
        for (key, value) in header {
            wtr.write_record([key, value])?;
        }
        wtr.flush()?;
    }
    writer.write_all(b"\n")?;

    {
        let mut wtr = section(&mut writer);
        wtr.write_record(["summary_key", "summary_value"])?;
        for (key, value) in &content.summary {
            wtr.write_record([key.as_str(), value.to_plain_string().as_str()])?;
        }
        wtr.flush()?;
    }
    writer.write_all(b"\n")?;

    let rows = content
        .records
        .iter()
        .map(|record| match serde_json::to_value(record)? {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect::<BTreeMap<_, _>>()),
            other => Err(ExportError::SerializationError(format!(
                "record is not an object: {}",
                other
            ))),
        })
        .collect::<Result<Vec<_>, ExportError>>()?;

    {
        let mut wtr = section(&mut writer);
        match rows.first() {
            None => wtr.write_record(["records", "none"])?,
            Some(first) => {
                let columns: Vec<&String> = first.keys().collect();
                wtr.write_record(&columns)?;
                for row in &rows {
                    let cells = columns
                        .iter()
                        .map(|key| row.get(*key).map(|v| v.to_plain_string()).unwrap_or_default());
                    wtr.write_record(cells)?;
                }
            }
        }
        wtr.flush()?;
    }

    writer.flush()?;
    Ok(())
}

/// CSV writer for one section; rows may differ in length
fn section<W: Write>(writer: W) -> ::csv::Writer<W> {
    ::csv::WriterBuilder::new().flexible(true).from_writer(writer)
}
