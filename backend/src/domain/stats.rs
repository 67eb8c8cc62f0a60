//! Time-bucketed activity statistics.
//!
//! Takes the raw rows the backing store returns, validates them one by one
//! and aggregates the survivors into a snapshot: per-kind counts, quantity
//! sums, first/last bounds, an hour-of-day histogram and a chart series
//! bucketed by calendar day or month. Rows that fail validation are
//! skipped and counted, never fatal.
//!
//! Every call is independent and stateless; the anchor date is passed in
//! so results are reproducible.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::domain::age;
use crate::domain::models::activity::ActivityEntry;

/// Bucketing mode for the chart series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    /// Hour-of-day histogram only; no series
    Hour,
    /// One point per calendar day, latest entry wins within a day
    Day,
    /// One point per calendar month
    Month,
}

/// Caller-selected lookback period ending at the anchor date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeWindow {
    Week,
    Month,
    Year,
    All,
}

impl RangeWindow {
    /// Lookback in days; `None` is unbounded
    pub fn lookback_days(&self) -> Option<i64> {
        match self {
            RangeWindow::Week => Some(6),
            RangeWindow::Month => Some(29),
            RangeWindow::Year => Some(364),
            RangeWindow::All => None,
        }
    }
}

/// One point of a day/month chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Freshly computed aggregation result. No identity across calls: safe to
/// discard and recompute on every input change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total: u32,
    pub by_kind: BTreeMap<&'static str, u32>,
    /// Sum of the quantities present in range (e.g. total ml)
    pub quantity_sum: f64,
    /// Earliest entry in range, before deduplication
    pub first: Option<DateTime<Utc>>,
    /// Latest entry in range, before deduplication
    pub last: Option<DateTime<Utc>>,
    /// Entry counts per hour of day
    pub hour_distribution: [u32; 24],
    /// Chart series; an empty vec means "not enough data to chart"
    pub series: Vec<SeriesPoint>,
}

impl StatsSnapshot {
    pub fn empty() -> Self {
        StatsSnapshot {
            total: 0,
            by_kind: BTreeMap::new(),
            quantity_sum: 0.0,
            first: None,
            last: None,
            hour_distribution: [0; 24],
            series: Vec::new(),
        }
    }
}

impl Default for StatsSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Snapshot plus the number of rows dropped during validation, so callers
/// can surface data-quality issues without depending on the log output.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutcome {
    pub snapshot: StatsSnapshot,
    pub skipped: u32,
}

impl AggregateOutcome {
    pub fn to_dto(&self) -> shared::StatsSnapshotDto {
        shared::StatsSnapshotDto {
            total: self.snapshot.total,
            by_kind: self
                .snapshot
                .by_kind
                .iter()
                .map(|(kind, count)| shared::KindCountDto {
                    kind: (*kind).to_string(),
                    count: *count,
                })
                .collect(),
            quantity_sum: self.snapshot.quantity_sum,
            first: self.snapshot.first.map(|t| t.to_rfc3339()),
            last: self.snapshot.last.map(|t| t.to_rfc3339()),
            hour_distribution: self.snapshot.hour_distribution.to_vec(),
            series: self
                .snapshot
                .series
                .iter()
                .map(|p| shared::SeriesPointDto {
                    date: age::format_date_only(p.date),
                    value: p.value,
                })
                .collect(),
            skipped: self.skipped,
        }
    }
}

/// Statistics service. Stateless: every aggregation is recomputed from the
/// rows it is given, scoped to one baby by the caller.
#[derive(Clone, Default)]
pub struct StatsService;

impl StatsService {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate raw rows into a snapshot.
    ///
    /// Entries are filtered to `[anchor - window, anchor]` inclusive by
    /// calendar date. If day/month bucketing of the ranged set yields fewer
    /// than two points, the series is rebuilt from the last two valid
    /// entries overall so a trend chart always has a renderable line; with
    /// fewer than two valid entries in all of history the series stays
    /// empty.
    pub fn aggregate(
        &self,
        records: &[shared::ActivityRecord],
        group_by: GroupBy,
        range: RangeWindow,
        anchor: NaiveDate,
    ) -> AggregateOutcome {
        let mut entries = Vec::with_capacity(records.len());
        let mut skipped = 0u32;
        for record in records {
            match ActivityEntry::from_record(record) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    skipped += 1;
                    warn!("📊 STATS: Skipping record {}: {}", record.id, err);
                }
            }
        }
        entries.sort_by_key(|e| e.timestamp);

        let window_start = range.lookback_days().map(|days| anchor - Duration::days(days));
        let in_range: Vec<&ActivityEntry> = entries
            .iter()
            .filter(|entry| {
                let date = entry.date();
                date <= anchor && window_start.map_or(true, |start| date >= start)
            })
            .collect();

        let mut snapshot = StatsSnapshot::empty();
        snapshot.total = in_range.len() as u32;
        snapshot.first = in_range.first().map(|e| e.timestamp);
        snapshot.last = in_range.last().map(|e| e.timestamp);

        for entry in &in_range {
            *snapshot.by_kind.entry(entry.kind.label()).or_insert(0) += 1;
            if let Some(quantity) = entry.quantity {
                snapshot.quantity_sum += quantity;
            }
            let hour = entry.hour() as usize;
            if hour < 24 {
                snapshot.hour_distribution[hour] += 1;
            }
        }

        snapshot.series = match group_by {
            GroupBy::Hour => Vec::new(),
            GroupBy::Day => Self::day_series(&in_range, &entries),
            GroupBy::Month => Self::month_series(&in_range, &entries),
        };

        AggregateOutcome { snapshot, skipped }
    }

    /// Value an entry contributes to a chart: its quantity, or a count of
    /// one for entries that carry none.
    fn chart_value(entry: &ActivityEntry) -> f64 {
        entry.quantity.unwrap_or(1.0)
    }

    /// One point per calendar day; the chronologically last entry of each
    /// day wins, so a corrected growth measurement replaces the earlier
    /// one. Points come out sorted ascending by date.
    fn day_series(in_range: &[&ActivityEntry], all: &[ActivityEntry]) -> Vec<SeriesPoint> {
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for entry in in_range {
            by_date.insert(entry.date(), Self::chart_value(entry));
        }

        if by_date.len() < 2 {
            return Self::widen_to_last_two(all);
        }

        by_date
            .into_iter()
            .map(|(date, value)| SeriesPoint { date, value })
            .collect()
    }

    /// One point per calendar month, keyed to the first of the month.
    /// Months where entries carry quantities chart the quantity sum;
    /// months without any quantity chart the entry count.
    fn month_series(in_range: &[&ActivityEntry], all: &[ActivityEntry]) -> Vec<SeriesPoint> {
        let mut by_month: BTreeMap<NaiveDate, (f64, u32, bool)> = BTreeMap::new();
        for entry in in_range {
            let date = entry.date();
            let key = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
            let bucket = by_month.entry(key).or_insert((0.0, 0, false));
            bucket.1 += 1;
            if let Some(quantity) = entry.quantity {
                bucket.0 += quantity;
                bucket.2 = true;
            }
        }

        if by_month.len() < 2 {
            return Self::widen_to_last_two(all);
        }

        by_month
            .into_iter()
            .map(|(date, (sum, count, has_quantity))| SeriesPoint {
                date,
                value: if has_quantity { sum } else { count as f64 },
            })
            .collect()
    }

    /// Fall back to the last two valid entries regardless of range. With
    /// fewer than two entries overall there is nothing to chart and the
    /// empty series is the explicit marker for that.
    fn widen_to_last_two(all: &[ActivityEntry]) -> Vec<SeriesPoint> {
        if all.len() < 2 {
            return Vec::new();
        }

        all[all.len() - 2..]
            .iter()
            .map(|entry| SeriesPoint {
                date: entry.date(),
                value: Self::chart_value(entry),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        id: &str,
        entry_type: &str,
        subtype: Option<&str>,
        start_time: Option<&str>,
        quantity: Option<f64>,
    ) -> shared::ActivityRecord {
        shared::ActivityRecord {
            id: id.to_string(),
            baby_id: "baby::1700000000000".to_string(),
            entry_type: entry_type.to_string(),
            subtype: subtype.map(str::to_string),
            start_time: start_time.map(str::to_string),
            quantity,
            note: None,
        }
    }

    fn feeding(id: &str, start_time: &str, ml: f64) -> shared::ActivityRecord {
        record(id, "FEEDING", Some("BOTTLE"), Some(start_time), Some(ml))
    }

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_counts_sums_and_hour_histogram() {
        let service = StatsService::new();
        let records = vec![
            feeding("a1", "2024-03-09T08:15:00Z", 90.0),
            feeding("a2", "2024-03-09T14:00:00Z", 120.0),
            record("a3", "FEEDING", Some("BREAST"), Some("2024-03-10T08:45:00Z"), None),
            record("a4", "SLEEP", None, Some("2024-03-10T20:05:00Z"), None),
        ];

        let outcome = service.aggregate(&records, GroupBy::Hour, RangeWindow::Week, anchor());
        let snapshot = &outcome.snapshot;

        assert_eq!(snapshot.total, 4);
        assert_eq!(snapshot.by_kind.get("feeding.bottle"), Some(&2));
        assert_eq!(snapshot.by_kind.get("feeding.breast"), Some(&1));
        assert_eq!(snapshot.by_kind.get("sleep"), Some(&1));
        assert_eq!(snapshot.quantity_sum, 210.0);
        assert_eq!(snapshot.hour_distribution[8], 2);
        assert_eq!(snapshot.hour_distribution[14], 1);
        assert_eq!(snapshot.hour_distribution[20], 1);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_one_bad_record_never_aborts_aggregation() {
        let service = StatsService::new();
        let records = vec![
            feeding("a1", "2024-03-08T08:00:00Z", 100.0),
            feeding("a2", "2024-03-08T12:00:00Z", 100.0),
            record("a3", "FEEDING", Some("BOTTLE"), None, Some(100.0)),
            feeding("a4", "2024-03-09T08:00:00Z", 100.0),
            feeding("a5", "2024-03-09T12:00:00Z", 100.0),
        ];

        let outcome = service.aggregate(&records, GroupBy::Hour, RangeWindow::Week, anchor());

        assert_eq!(outcome.snapshot.total, 4);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.snapshot.quantity_sum, 400.0);
    }

    #[test]
    fn test_range_filter_is_inclusive() {
        let service = StatsService::new();
        let records = vec![
            feeding("old", "2024-03-03T10:00:00Z", 50.0), // anchor - 7d: outside Week
            feeding("edge", "2024-03-04T10:00:00Z", 60.0), // anchor - 6d: inside
            feeding("today", "2024-03-10T10:00:00Z", 70.0), // anchor day: inside
            feeding("future", "2024-03-11T10:00:00Z", 80.0), // after anchor: outside
        ];

        let outcome = service.aggregate(&records, GroupBy::Hour, RangeWindow::Week, anchor());

        assert_eq!(outcome.snapshot.total, 2);
        assert_eq!(outcome.snapshot.quantity_sum, 130.0);
    }

    #[test]
    fn test_first_and_last_bounds() {
        let service = StatsService::new();
        // Deliberately unsorted input
        let records = vec![
            feeding("b", "2024-03-09T14:00:00Z", 120.0),
            feeding("a", "2024-03-08T08:15:00Z", 90.0),
            feeding("c", "2024-03-10T06:30:00Z", 80.0),
        ];

        let outcome = service.aggregate(&records, GroupBy::Hour, RangeWindow::Week, anchor());
        let snapshot = &outcome.snapshot;

        assert_eq!(
            snapshot.first.unwrap().to_rfc3339(),
            "2024-03-08T08:15:00+00:00"
        );
        assert_eq!(
            snapshot.last.unwrap().to_rfc3339(),
            "2024-03-10T06:30:00+00:00"
        );
    }

    #[test]
    fn test_day_series_last_write_wins_within_a_day() {
        let service = StatsService::new();
        let records = vec![
            record("w1", "GROWTH", Some("WEIGHT"), Some("2024-03-08T09:00:00Z"), Some(5.1)),
            record("w2", "GROWTH", Some("WEIGHT"), Some("2024-03-08T18:00:00Z"), Some(5.2)),
            record("w3", "GROWTH", Some("WEIGHT"), Some("2024-03-10T09:00:00Z"), Some(5.3)),
        ];

        let outcome = service.aggregate(&records, GroupBy::Day, RangeWindow::Week, anchor());
        let series = &outcome.snapshot.series;

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
        assert_eq!(series[0].value, 5.2); // the evening correction wins
        assert_eq!(series[1].date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(series[1].value, 5.3);
    }

    #[test]
    fn test_minimum_two_points_widening() {
        let service = StatsService::new();
        // 3 entries in history, only 1 inside the week window
        let records = vec![
            record("w1", "GROWTH", Some("WEIGHT"), Some("2024-01-05T09:00:00Z"), Some(4.1)),
            record("w2", "GROWTH", Some("WEIGHT"), Some("2024-02-01T09:00:00Z"), Some(4.6)),
            record("w3", "GROWTH", Some("WEIGHT"), Some("2024-03-09T09:00:00Z"), Some(5.2)),
        ];

        let outcome = service.aggregate(&records, GroupBy::Day, RangeWindow::Week, anchor());
        let series = &outcome.snapshot.series;

        // Widened to the last two overall entries, not a single-point series
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(series[0].value, 4.6);
        assert_eq!(series[1].date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(series[1].value, 5.2);
        // The range-scoped counters still reflect the window
        assert_eq!(outcome.snapshot.total, 1);
    }

    #[test]
    fn test_single_entry_overall_yields_empty_series_marker() {
        let service = StatsService::new();
        let records = vec![record(
            "w1",
            "GROWTH",
            Some("WEIGHT"),
            Some("2024-03-09T09:00:00Z"),
            Some(5.2),
        )];

        let outcome = service.aggregate(&records, GroupBy::Day, RangeWindow::Week, anchor());

        assert!(outcome.snapshot.series.is_empty());
        assert_eq!(outcome.snapshot.total, 1);
    }

    #[test]
    fn test_empty_input_yields_zeroed_snapshot() {
        let service = StatsService::new();

        let outcome = service.aggregate(&[], GroupBy::Day, RangeWindow::All, anchor());

        assert_eq!(outcome.snapshot, StatsSnapshot::empty());
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_month_series_sums_quantities() {
        let service = StatsService::new();
        let records = vec![
            feeding("j1", "2024-01-10T08:00:00Z", 100.0),
            feeding("j2", "2024-01-20T08:00:00Z", 110.0),
            feeding("f1", "2024-02-05T08:00:00Z", 130.0),
            feeding("m1", "2024-03-01T08:00:00Z", 150.0),
        ];

        let outcome = service.aggregate(&records, GroupBy::Month, RangeWindow::Year, anchor());
        let series = &outcome.snapshot.series;

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(series[0].value, 210.0);
        assert_eq!(series[1].value, 130.0);
        assert_eq!(series[2].value, 150.0);
    }

    #[test]
    fn test_month_series_counts_when_no_quantities() {
        let service = StatsService::new();
        let records = vec![
            record("s1", "SLEEP", None, Some("2024-01-10T20:00:00Z"), None),
            record("s2", "SLEEP", None, Some("2024-01-12T20:00:00Z"), None),
            record("s3", "SLEEP", None, Some("2024-02-03T20:00:00Z"), None),
        ];

        let outcome = service.aggregate(&records, GroupBy::Month, RangeWindow::Year, anchor());
        let series = &outcome.snapshot.series;

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].value, 2.0); // two January naps, charted as counts
        assert_eq!(series[1].value, 1.0);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let service = StatsService::new();
        let records = vec![
            feeding("a1", "2024-03-09T08:15:00Z", 90.0),
            feeding("a2", "2024-03-10T14:00:00Z", 120.0),
        ];

        let first = service.aggregate(&records, GroupBy::Day, RangeWindow::Week, anchor());
        let second = service.aggregate(&records, GroupBy::Day, RangeWindow::Week, anchor());
        assert_eq!(first, second);
    }

    #[test]
    fn test_to_dto() {
        let service = StatsService::new();
        let records = vec![
            feeding("a1", "2024-03-09T08:15:00Z", 90.0),
            feeding("a2", "2024-03-10T14:00:00Z", 120.0),
        ];

        let dto = service
            .aggregate(&records, GroupBy::Day, RangeWindow::Week, anchor())
            .to_dto();

        assert_eq!(dto.total, 2);
        assert_eq!(dto.hour_distribution.len(), 24);
        assert_eq!(dto.series.len(), 2);
        assert_eq!(dto.series[0].date, "2024-03-09");
        assert_eq!(dto.by_kind[0].kind, "feeding.bottle");
        assert_eq!(dto.by_kind[0].count, 2);
    }
}
