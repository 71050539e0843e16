//! CSV persistence for the monthly report.

use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::ReportRow;
use crate::error::{Error, Result};

/// Report columns, in output order.
pub const HEADER: [&str; 5] = ["Border", "Date", "Measure", "Value", "Average"];

#[derive(Serialize)]
struct OutputRow<'a> {
    #[serde(rename = "Border")]
    border: &'a str,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Measure")]
    measure: &'a str,
    #[serde(rename = "Value")]
    value: u64,
    #[serde(rename = "Average")]
    average: u64,
}

impl<'a> From<&'a ReportRow> for OutputRow<'a> {
    fn from(row: &'a ReportRow) -> Self {
        OutputRow {
            border: &row.border,
            date: row.formatted_date(),
            measure: &row.measure,
            value: row.value,
            average: row.average,
        }
    }
}

/// Writes the header and every row to `sink`, in the order given.
///
/// The header is written even when `rows` is empty.
pub fn write_rows<W: Write>(sink: W, rows: &[ReportRow]) -> std::result::Result<(), csv::Error> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(sink);

    writer.write_record(HEADER)?;
    for row in rows {
        writer.serialize(OutputRow::from(row))?;
    }
    writer.flush()?;

    Ok(())
}

/// Creates (or truncates) the file at `path` and writes the report to it.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), rows = rows.len()))]
pub fn write_report(path: impl AsRef<Path>, rows: &[ReportRow]) -> Result<()> {
    let path = path.as_ref();
    let to_error = |source: std::io::Error| Error::OutputAccess {
        path: path.to_path_buf(),
        source,
    };

    debug!("Creating report file");
    let file = File::create(path).map_err(to_error)?;
    write_rows(file, rows).map_err(|e| to_error(e.into()))?;

    info!("Report written");
    Ok(())
}
