pub mod analyzers;
pub mod error;
pub mod output;
pub mod parser;

use std::path::Path;
use tracing::info;

pub use error::{Error, Result};

/// Counts from one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub records: usize,
    pub groups: usize,
    pub rows: usize,
}

/// Reads crossings from `input`, aggregates them, and writes the sorted
/// monthly report to `output`.
///
/// Nothing is written if reading or aggregation fails.
#[tracing::instrument(skip_all, fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
pub fn run(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<RunSummary> {
    let records = parser::read_records(input)?;
    let grouped = analyzers::aggregate::aggregate(&records)?;
    let rows = analyzers::report::report(&grouped);

    output::write_report(output, &rows)?;

    let summary = RunSummary {
        records: records.len(),
        groups: grouped.len(),
        rows: rows.len(),
    };
    info!(
        records = summary.records,
        groups = summary.groups,
        rows = summary.rows,
        "Run complete"
    );
    Ok(summary)
}
