use crate::analyzers::types::{
    CrossingRecord, GroupKey, GroupedStats, MonthlyStats, MonthlyTotals, YearMonth,
};
use crate::analyzers::utility::round_half_up;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Groups records by (border, measure) and calendar month, summing values
/// that fall in the same month.
pub fn monthly_totals(records: &[CrossingRecord]) -> Result<BTreeMap<GroupKey, MonthlyTotals>> {
    let mut totals: BTreeMap<GroupKey, MonthlyTotals> = BTreeMap::new();

    for record in records {
        let month = YearMonth::of(record.date.date());
        let slot = totals
            .entry(GroupKey::from(record))
            .or_default()
            .entry(month)
            .or_default();

        *slot = slot.checked_add(record.value).ok_or_else(|| Error::Overflow {
            border: record.border.clone(),
            measure: record.measure.clone(),
        })?;
    }

    Ok(totals)
}

/// Computes running averages and cumulative totals for one series.
///
/// A month chains from the month numbered one lower in the same year. When
/// that month has no data the chain restarts: the average is 0 and the
/// cumulative total equals the month's own total. The carried-in average
/// divides the predecessor's cumulative total by the predecessor's month
/// number, not by the count of months seen.
pub fn running_stats(key: &GroupKey, totals: &MonthlyTotals) -> Result<BTreeMap<YearMonth, MonthlyStats>> {
    let mut stats: BTreeMap<YearMonth, MonthlyStats> = BTreeMap::new();

    // BTreeMap iteration is chronological, so a predecessor is always filled in first.
    for (&month, &total) in totals {
        let previous = month
            .previous_in_year()
            .and_then(|prev| stats.get(&prev).map(|s| (prev, s.cumulative)));

        let entry = match previous {
            Some((prev, carried)) => MonthlyStats {
                total,
                average: round_half_up(carried, u64::from(prev.month())),
                cumulative: carried.checked_add(total).ok_or_else(|| Error::Overflow {
                    border: key.border.clone(),
                    measure: key.measure.clone(),
                })?,
            },
            None => MonthlyStats {
                total,
                average: 0,
                cumulative: total,
            },
        };

        stats.insert(month, entry);
    }

    Ok(stats)
}

/// Aggregates crossing records into per-series monthly statistics.
pub fn aggregate(records: &[CrossingRecord]) -> Result<GroupedStats> {
    let totals = monthly_totals(records)?;
    let mut grouped = GroupedStats::new();

    for (key, months) in totals {
        let stats = running_stats(&key, &months)?;
        debug!(
            border = %key.border,
            measure = %key.measure,
            months = stats.len(),
            "Series aggregated"
        );
        grouped.insert(key, stats);
    }

    Ok(grouped)
}
