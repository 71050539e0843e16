//! Data types used by the aggregation pipeline.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// A single crossing count read from the input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossingRecord {
    pub date: NaiveDateTime,
    pub value: u64,
    pub measure: String,
    pub border: String,
}

/// Identifies one time series: a border paired with a measure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub border: String,
    pub measure: String,
}

impl GroupKey {
    pub fn new(border: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            border: border.into(),
            measure: measure.into(),
        }
    }
}

impl From<&CrossingRecord> for GroupKey {
    fn from(record: &CrossingRecord) -> Self {
        Self::new(record.border.as_str(), record.measure.as_str())
    }
}

/// A calendar month, stored as its first day so ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first_day: NaiveDate,
}

impl YearMonth {
    /// Truncates any date to its month.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first_day: date - Days::new(u64::from(date.day0())),
        }
    }

    /// Returns `None` when `month` is outside 1..=12 or the year is out of range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// The month numbered one lower in the same year. January has none:
    /// the averaging chain never reaches back into December of the prior year.
    pub fn previous_in_year(&self) -> Option<Self> {
        if self.month() == 1 {
            return None;
        }
        self.first_day
            .checked_sub_months(Months::new(1))
            .map(|first_day| Self { first_day })
    }
}

/// Statistics for one month of one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthlyStats {
    /// Sum of all values recorded in the month.
    pub total: u64,
    /// Rounded average carried in from the preceding month of the chain, or 0.
    pub average: u64,
    /// Running sum of totals along the chain, including this month.
    pub cumulative: u64,
}

/// Summed values per month for one series.
pub type MonthlyTotals = BTreeMap<YearMonth, u64>;

/// Aggregator output: every series with its per-month statistics.
pub type GroupedStats = BTreeMap<GroupKey, BTreeMap<YearMonth, MonthlyStats>>;

/// One line of the output report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub border: String,
    pub measure: String,
    pub date: NaiveDateTime,
    pub value: u64,
    pub average: u64,
    pub year: i32,
    pub month: u32,
}
