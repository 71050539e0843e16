//! Error type shared by the parsing, aggregation, and reporting stages.

use std::path::PathBuf;
use thiserror::Error;

/// Every failure is fatal: the run aborts and no partial report is valid.
#[derive(Error, Debug)]
pub enum Error {
    /// The input table could not be opened.
    #[error("cannot read input {path}: {source}")]
    InputAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A field of a data record could not be converted.
    #[error("record {record}: invalid {field} {value:?}: {reason}")]
    Parse {
        record: u64,
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The header row lacks a column the report needs.
    #[error("input header has no {column:?} column")]
    MissingColumn { column: &'static str },

    /// The table itself is unreadable (bad quoting, bad UTF-8, I/O failure).
    #[error("malformed input table: {0}")]
    Table(#[from] csv::Error),

    #[error("monthly total overflowed for {border} / {measure}")]
    Overflow { border: String, measure: String },

    /// The report could not be written.
    #[error("cannot write output {path}: {source}")]
    OutputAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
