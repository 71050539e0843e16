//! CSV parser for border crossing tables.

use chrono::NaiveDateTime;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::CrossingRecord;
use crate::error::{Error, Result};

/// Positions of the consumed columns within the header. Any other column
/// in the table is ignored.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    value: usize,
    measure: usize,
    border: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or(Error::MissingColumn { column })
        };

        Ok(Columns {
            date: find("Date")?,
            value: find("Value")?,
            measure: find("Measure")?,
            border: find("Border")?,
        })
    }
}

const DATE_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Parses a `MM/DD/YYYY HH:MM:SS AM|PM` timestamp.
///
/// The meridiem must be present but does not shift the hour, so
/// `12:00:00 AM` reads as hour 12. Only the year and month are used
/// downstream.
pub fn parse_date(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    let (stamp, meridiem) = trimmed
        .rsplit_once(' ')
        .ok_or_else(|| "missing AM/PM suffix".to_string())?;

    if !meridiem.eq_ignore_ascii_case("AM") && !meridiem.eq_ignore_ascii_case("PM") {
        return Err(format!("expected AM or PM, found {meridiem:?}"));
    }

    NaiveDateTime::parse_from_str(stamp.trim_end(), DATE_FORMAT).map_err(|e| e.to_string())
}

/// Parses a non-negative integer count.
pub fn parse_value(raw: &str) -> std::result::Result<u64, String> {
    raw.trim().parse::<u64>().map_err(|e| e.to_string())
}

fn field<'r>(record: &'r StringRecord, index: u64, column: usize, name: &'static str) -> Result<&'r str> {
    record.get(column).ok_or_else(|| Error::Parse {
        record: index,
        field: name,
        value: String::new(),
        reason: "field missing from row".to_string(),
    })
}

fn to_record(index: u64, columns: Columns, record: &StringRecord) -> Result<CrossingRecord> {
    let raw_date = field(record, index, columns.date, "Date")?;
    let raw_value = field(record, index, columns.value, "Value")?;
    let measure = field(record, index, columns.measure, "Measure")?;
    let border = field(record, index, columns.border, "Border")?;

    let date = parse_date(raw_date).map_err(|reason| Error::Parse {
        record: index,
        field: "Date",
        value: raw_date.to_string(),
        reason,
    })?;
    let value = parse_value(raw_value).map_err(|reason| Error::Parse {
        record: index,
        field: "Value",
        value: raw_value.to_string(),
        reason,
    })?;

    Ok(CrossingRecord {
        date,
        value,
        measure: measure.to_string(),
        border: border.to_string(),
    })
}

/// Reads every data record from a CSV source with a header row.
///
/// # Errors
///
/// Fails on the first record whose `Date` or `Value` cannot be parsed, or
/// when a required column is missing from the header or the row. Rows may
/// be shorter or longer than the header as long as every consumed column
/// is present.
pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<CrossingRecord>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    if rdr.headers()?.is_empty() {
        debug!("Input is empty");
        return Ok(Vec::new());
    }
    let columns = Columns::locate(rdr.headers()?)?;
    let mut records = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        records.push(to_record(i as u64 + 1, columns, &record)?);
    }

    debug!(records = records.len(), "Input records parsed");
    Ok(records)
}

/// Opens `path` and reads every crossing record from it.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<CrossingRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::InputAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let records = read_records_from(file)?;
    info!(records = records.len(), "Input loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const HEADER: &str = "Port Name,State,Port Code,Border,Date,Measure,Value,Location\n";

    #[test]
    fn test_parse_date_keeps_hour_as_written() {
        let date = parse_date("03/01/2019 12:00:00 AM").unwrap();
        assert_eq!(date.year(), 2019);
        assert_eq!(date.month(), 3);
        assert_eq!(date.day(), 1);
        assert_eq!(date.hour(), 12);
    }

    #[test]
    fn test_parse_date_accepts_pm_and_lowercase() {
        assert!(parse_date("02/20/2019 01:00:00 PM").is_ok());
        assert!(parse_date("02/20/2019 13:00:00 pm").is_ok());
    }

    #[test]
    fn test_parse_date_rejects_bad_input() {
        assert!(parse_date("2019-02-20 01:00:00 AM").is_err());
        assert!(parse_date("02/20/2019 01:00:00").is_err());
        assert!(parse_date("02/20/2019 01:00:00 XM").is_err());
        assert!(parse_date("13/20/2019 01:00:00 AM").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("346158"), Ok(346_158));
        assert_eq!(parse_value(" 19 "), Ok(19));
        assert!(parse_value("-1").is_err());
        assert!(parse_value("12.5").is_err());
        assert!(parse_value("").is_err());
    }

    #[test]
    fn test_read_records_ignores_extra_columns() {
        let data = format!(
            "{HEADER}Derby Line,Vermont,209,US-Canada Border,03/01/2019 12:00:00 AM,Truck Containers Full,6483,POINT (-72.09944 45.005)\n"
        );

        let records = read_records_from(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].border, "US-Canada Border");
        assert_eq!(records[0].measure, "Truck Containers Full");
        assert_eq!(records[0].value, 6483);
    }

    #[test]
    fn test_read_records_header_only() {
        let records = read_records_from(HEADER.as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_records_empty_input() {
        let records = read_records_from("".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_records_reports_bad_value() {
        let data = format!(
            "{HEADER}Norton,Vermont,211,US-Canada Border,03/01/2019 12:00:00 AM,Trains,19,POINT (0 0)\n\
             Norton,Vermont,211,US-Canada Border,03/01/2019 12:00:00 AM,Trains,many,POINT (0 0)\n"
        );

        let err = read_records_from(data.as_bytes()).unwrap_err();
        match err {
            Error::Parse { record, field, value, .. } => {
                assert_eq!(record, 2);
                assert_eq!(field, "Value");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_records_missing_column() {
        let data = "Border,Date,Value\nA,01/01/2019 12:00:00 AM,1\n";
        let err = read_records_from(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column: "Measure" }));
    }

    #[test]
    fn test_read_records_short_row_missing_unused_column() {
        let data = "Port Name,Border,Date,Measure,Value,Location\n\
                    X,A,01/15/2019 12:00:00 AM,Trains,5\n";

        let records = read_records_from(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].border, "A");
        assert_eq!(records[0].measure, "Trains");
        assert_eq!(records[0].value, 5);
        assert_eq!(records[0].date.to_string(), "2019-01-15 12:00:00");
    }

    #[test]
    fn test_read_records_long_row_extra_field_ignored() {
        let data = "Border,Date,Measure,Value\n\
                    A,01/15/2019 12:00:00 AM,Trains,5,trailing\n";

        let records = read_records_from(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].border, "A");
        assert_eq!(records[0].value, 5);
    }

    #[test]
    fn test_read_records_short_row_missing_required_field() {
        let data = "Border,Date,Measure,Value\n\
                    A,01/15/2019 12:00:00 AM,Trains\n";

        let err = read_records_from(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse { record: 1, field: "Value", .. }));
    }

    #[test]
    fn test_read_records_missing_file() {
        let err = read_records("/nonexistent/border_analytics_input.csv").unwrap_err();
        assert!(matches!(err, Error::InputAccess { .. }));
    }
}
