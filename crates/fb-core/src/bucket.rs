//! Daily, weekly and monthly rollups.
//!
//! Each call rebuilds its buckets from the full record slice. Buckets are
//! keyed by [`Granularity::key`] and always returned ascending, so callers
//! take the tail for "recent N periods" views.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::period::{DateRange, Granularity, local_date};
use crate::record::SessionRecord;
use crate::session_type::SessionType;
use crate::units::minutes_to_hours;

/// Aggregate of the records falling in one calendar period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Canonical period key (`YYYY-MM-DD` or `YYYY-MM`).
    pub key: String,
    /// First day of the period, always `YYYY-MM-DD`. For daily buckets this
    /// equals `key`.
    #[serde(rename = "date")]
    pub start: NaiveDate,
    pub focus_minutes: u64,
    pub break_minutes: u64,
    /// Completed focus sessions. Breaks are not counted.
    pub session_count: u32,
}

pub type DailyBucket = Bucket;
pub type WeeklyBucket = Bucket;
pub type MonthlyBucket = Bucket;

impl Bucket {
    fn empty(granularity: Granularity, start: NaiveDate) -> Self {
        Self {
            key: granularity.key(start),
            start,
            focus_minutes: 0,
            break_minutes: 0,
            session_count: 0,
        }
    }

    fn add(&mut self, record: &SessionRecord) {
        let minutes = u64::from(record.duration_minutes);
        match record.session_type {
            SessionType::Work => {
                self.focus_minutes += minutes;
                self.session_count += 1;
            }
            SessionType::Break => self.break_minutes += minutes,
        }
    }

    pub fn focus_hours(&self) -> f64 {
        minutes_to_hours(self.focus_minutes)
    }

    pub fn break_hours(&self) -> f64 {
        minutes_to_hours(self.break_minutes)
    }
}

/// Per-day buckets for days with at least one record.
pub fn daily_stats<Tz: TimeZone>(records: &[SessionRecord], tz: &Tz) -> Vec<DailyBucket> {
    aggregate(records, tz, Granularity::Day)
}

/// Per-week (Monday start) buckets for weeks with at least one record.
pub fn weekly_stats<Tz: TimeZone>(records: &[SessionRecord], tz: &Tz) -> Vec<WeeklyBucket> {
    aggregate(records, tz, Granularity::Week)
}

/// Per-month buckets for months with at least one record.
pub fn monthly_stats<Tz: TimeZone>(records: &[SessionRecord], tz: &Tz) -> Vec<MonthlyBucket> {
    aggregate(records, tz, Granularity::Month)
}

/// Group records into buckets of the given size, skipping empty periods.
pub fn aggregate<Tz: TimeZone>(
    records: &[SessionRecord],
    tz: &Tz,
    granularity: Granularity,
) -> Vec<Bucket> {
    let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
    for record in records {
        let start = granularity.period_start(local_date(record.completed_at, tz));
        buckets
            .entry(start)
            .or_insert_with(|| Bucket::empty(granularity, start))
            .add(record);
    }
    buckets.into_values().collect()
}

/// Buckets for every period overlapping `range`, zero-filling gaps.
///
/// Only records whose local date lies inside `range` are counted, so a
/// partial first or last period covers just the in-range days.
pub fn stats_in_range<Tz: TimeZone>(
    records: &[SessionRecord],
    tz: &Tz,
    granularity: Granularity,
    range: DateRange,
) -> Vec<Bucket> {
    let mut buckets: BTreeMap<NaiveDate, Bucket> = range
        .period_starts(granularity)
        .into_iter()
        .map(|start| (start, Bucket::empty(granularity, start)))
        .collect();

    for record in records {
        let date = local_date(record.completed_at, tz);
        if !range.contains(date) {
            continue;
        }
        if let Some(bucket) = buckets.get_mut(&granularity.period_start(date)) {
            bucket.add(record);
        }
    }
    buckets.into_values().collect()
}

/// Totals for one viewing period, the input to goal evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAggregate {
    pub focus_minutes: u64,
    pub break_minutes: u64,
    pub session_count: u32,
}

impl PeriodAggregate {
    pub fn from_buckets(buckets: &[Bucket]) -> Self {
        buckets.iter().fold(Self::default(), |acc, b| Self {
            focus_minutes: acc.focus_minutes + b.focus_minutes,
            break_minutes: acc.break_minutes + b.break_minutes,
            session_count: acc.session_count + b.session_count,
        })
    }

    /// Totals over records whose local date lies in `range`.
    pub fn for_range<Tz: TimeZone>(records: &[SessionRecord], tz: &Tz, range: DateRange) -> Self {
        let mut total = Bucket::empty(Granularity::Day, range.start);
        for record in records
            .iter()
            .filter(|r| range.contains(local_date(r.completed_at, tz)))
        {
            total.add(record);
        }
        Self {
            focus_minutes: total.focus_minutes,
            break_minutes: total.break_minutes,
            session_count: total.session_count,
        }
    }
}
