//! Flattening and ordering of aggregated statistics into report rows.

use crate::analyzers::types::{GroupedStats, ReportRow};
use chrono::NaiveTime;

/// Every report date is the first of the month at noon.
const REPORT_TIME: NaiveTime = match NaiveTime::from_hms_opt(12, 0, 0) {
    Some(time) => time,
    None => panic!("12:00:00 is a valid time of day"),
};

/// Output timestamp layout. The suffix is a literal "AM" even though the
/// time is noon; downstream consumers expect this exact text.
const REPORT_DATE_FORMAT: &str = "%m/%d/%Y %H:%M:%S AM";

impl ReportRow {
    /// The `Date` column as written to the report, e.g. `03/01/2019 12:00:00 AM`.
    pub fn formatted_date(&self) -> String {
        self.date.format(REPORT_DATE_FORMAT).to_string()
    }
}

/// Emits one row per (series, month) pair.
pub fn flatten(grouped: &GroupedStats) -> Vec<ReportRow> {
    grouped
        .iter()
        .flat_map(|(key, months)| {
            months.iter().map(move |(month, stats)| ReportRow {
                border: key.border.clone(),
                measure: key.measure.clone(),
                date: month.first_day().and_time(REPORT_TIME),
                value: stats.total,
                average: stats.average,
                year: month.year(),
                month: month.month(),
            })
        })
        .collect()
}

/// Sorts descending by year, month, value, measure, then border.
pub fn sort_rows(rows: &mut [ReportRow]) {
    rows.sort_by(|a, b| {
        (b.year, b.month, b.value, &b.measure, &b.border).cmp(&(
            a.year, a.month, a.value, &a.measure, &a.border,
        ))
    });
}

/// Produces the ordered report for aggregated statistics.
pub fn report(grouped: &GroupedStats) -> Vec<ReportRow> {
    let mut rows = flatten(grouped);
    sort_rows(&mut rows);
    rows
}
