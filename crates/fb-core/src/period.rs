//! Calendar period keys shared by every aggregator.
//!
//! All calendar derivations go through this module so that day boundaries and
//! the week-start convention are decided in exactly one place:
//!
//! - Dates are resolved in the viewer's timezone via [`local_date`].
//! - Weeks start on Monday.
//! - Keys are `YYYY-MM-DD` for days, the Monday's `YYYY-MM-DD` for weeks and
//!   `YYYY-MM` for months.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Calendar date of an instant in the given timezone.
pub fn local_date<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    ts.with_timezone(tz).date_naive()
}

/// Hour of day (0-23) of an instant in the given timezone.
pub fn local_hour<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> u32 {
    ts.with_timezone(tz).hour()
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_since_monday = date.weekday().num_days_from_monday();
    date.checked_sub_days(Days::new(u64::from(days_since_monday)))
        .unwrap_or(date)
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn week_key(date: NaiveDate) -> String {
    day_key(week_start(date))
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Size of a calendar bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// First day of the period containing `date`.
    pub fn period_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => week_start(date),
            Self::Month => month_start(date),
        }
    }

    /// Canonical key of the period containing `date`.
    pub fn key(self, date: NaiveDate) -> String {
        match self {
            Self::Day => day_key(date),
            Self::Week => week_key(date),
            Self::Month => month_key(date),
        }
    }

    /// Start of the period after the one starting at `start`.
    pub fn next(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Day => start.checked_add_days(Days::new(1)),
            Self::Week => start.checked_add_days(Days::new(7)),
            Self::Month => start.checked_add_months(Months::new(1)),
        }
    }

    /// Start of the period `n` periods before the one containing `date`.
    pub fn shift_back(self, date: NaiveDate, n: u32) -> Option<NaiveDate> {
        let start = self.period_start(date);
        match self {
            Self::Day => start.checked_sub_days(Days::new(u64::from(n))),
            Self::Week => start.checked_sub_days(Days::new(u64::from(n) * 7)),
            Self::Month => start.checked_sub_months(Months::new(n)),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            _ => Err(format!("invalid period: {s}")),
        }
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `n` most recent periods ending with the one containing `today`.
    ///
    /// `n == 0` yields an empty range.
    pub fn last_n(today: NaiveDate, n: u32, granularity: Granularity) -> Self {
        let start = n
            .checked_sub(1)
            .and_then(|back| granularity.shift_back(today, back))
            .unwrap_or_else(|| today.succ_opt().unwrap_or(today));
        Self { start, end: today }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Start dates of every period overlapping the range, ascending.
    pub fn period_starts(&self, granularity: Granularity) -> Vec<NaiveDate> {
        let mut starts = Vec::new();
        if self.is_empty() {
            return starts;
        }
        let mut current = granularity.period_start(self.start);
        while current <= self.end {
            starts.push(current);
            match granularity.next(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        starts
    }
}
