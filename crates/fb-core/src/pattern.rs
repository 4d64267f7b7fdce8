//! Secondary views: hour-of-day pattern, activity heat-map, month-over-month
//! comparison and weekday distribution.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate, TimeZone, Weekday};
use serde::Serialize;

use crate::bucket::{monthly_stats, stats_in_range};
use crate::period::{DateRange, Granularity, day_key, local_date, local_hour, month_key, week_start};
use crate::record::SessionRecord;
use crate::units::{average, minutes_to_hours};

/// Nominal focus session length used to estimate counts from minute totals.
pub const NOMINAL_SESSION_MINUTES: u64 = 25;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Focus activity by local hour of day (index 0-23).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPattern {
    pub focus_minutes: [u64; 24],
    pub session_counts: [u32; 24],
}

impl Default for HourlyPattern {
    fn default() -> Self {
        Self {
            focus_minutes: [0; 24],
            session_counts: [0; 24],
        }
    }
}

impl HourlyPattern {
    /// Build from raw records, bucketing each work session by the hour it started.
    pub fn from_records<Tz: TimeZone>(records: &[SessionRecord], tz: &Tz) -> Self {
        let mut pattern = Self::default();
        for record in records.iter().filter(|r| r.is_work()) {
            let hour = local_hour(record.started_at(), tz) as usize;
            pattern.focus_minutes[hour] += u64::from(record.duration_minutes);
            pattern.session_counts[hour] += 1;
        }
        pattern
    }

    /// Build from a server-provided `hourly_focus_time` minutes array.
    ///
    /// Session counts are estimated as `round(minutes / 25)` so they stay
    /// consistent with the server's own aggregates. Missing hours count as 0
    /// and anything past index 23 is ignored.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_server_minutes(minutes: &[u64]) -> Self {
        let mut pattern = Self::default();
        for (hour, &m) in minutes.iter().take(24).enumerate() {
            pattern.focus_minutes[hour] = m;
            let estimate = (m + NOMINAL_SESSION_MINUTES / 2) / NOMINAL_SESSION_MINUTES;
            pattern.session_counts[hour] = u32::try_from(estimate).unwrap_or(u32::MAX);
        }
        pattern
    }

    /// Hour with the most work sessions, earliest on ties. `None` when no
    /// hour has a session.
    ///
    /// Reads the same counts [`hourly_distribution`] returns, so zero-minute
    /// sessions still mark their hour.
    #[allow(clippy::cast_possible_truncation)]
    pub fn peak_hour(&self) -> Option<u32> {
        first_max_index(&self.session_counts.map(u64::from)).map(|i| i as u32)
    }

    /// True when no hour has a session or any focus minutes.
    pub fn is_empty(&self) -> bool {
        self.session_counts.iter().all(|&c| c == 0) && self.focus_minutes.iter().all(|&m| m == 0)
    }

    /// Average focus minutes per session in `hour`, 0 when there are none.
    pub fn average_minutes(&self, hour: usize) -> f64 {
        if hour >= 24 {
            return 0.0;
        }
        average(
            self.focus_minutes[hour],
            u64::from(self.session_counts[hour]),
        )
    }

    /// Focus hours per hour of day, for charts labelled in hours.
    pub fn focus_hours(&self) -> [f64; 24] {
        self.focus_minutes.map(minutes_to_hours)
    }
}

/// Work sessions started in each local hour of day.
pub fn hourly_distribution<Tz: TimeZone>(records: &[SessionRecord], tz: &Tz) -> [u32; 24] {
    HourlyPattern::from_records(records, tz).session_counts
}

/// One day of the activity heat-map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub date: String,
    /// Day of week, 0 = Monday.
    pub day: u32,
    pub hours: f64,
}

/// One Monday-start row of the activity heat-map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapWeek {
    pub week_start: String,
    pub days: Vec<HeatmapCell>,
}

/// Focus hours per day for the `weeks` weeks ending with the week of `today`.
///
/// Rows are oldest first, each with exactly seven cells. Days without data,
/// including days after `today`, are 0.
pub fn heatmap_grid<Tz: TimeZone>(
    records: &[SessionRecord],
    tz: &Tz,
    today: NaiveDate,
    weeks: u32,
) -> Vec<HeatmapWeek> {
    if weeks == 0 {
        return Vec::new();
    }
    let Some(start) = Granularity::Week.shift_back(today, weeks - 1) else {
        return Vec::new();
    };
    let this_monday = week_start(today);
    let end = this_monday
        .checked_add_days(Days::new(6))
        .unwrap_or(this_monday);
    let days = stats_in_range(records, tz, Granularity::Day, DateRange::new(start, end));

    days.chunks(7)
        .map(|chunk| HeatmapWeek {
            week_start: chunk.first().map(|b| b.key.clone()).unwrap_or_default(),
            days: chunk
                .iter()
                .map(|bucket| HeatmapCell {
                    date: day_key(bucket.start),
                    day: bucket.start.weekday().num_days_from_monday(),
                    hours: bucket.focus_hours(),
                })
                .collect(),
        })
        .collect()
}

/// Focus hours for one calendar month this year and the year before.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthComparison {
    /// Month number, 1-12.
    pub month: u32,
    pub label: &'static str,
    pub this_year_hours: f64,
    pub last_year_hours: f64,
}

/// Month-over-month comparison for the first `months` months of `today`'s year.
pub fn monthly_comparison<Tz: TimeZone>(
    records: &[SessionRecord],
    tz: &Tz,
    today: NaiveDate,
    months: u32,
) -> Vec<MonthComparison> {
    let totals: HashMap<String, u64> = monthly_stats(records, tz)
        .into_iter()
        .map(|b| (b.key, b.focus_minutes))
        .collect();
    let year = today.year();
    let hours_for = |year: i32, month: u32| {
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first| totals.get(&month_key(first)).copied())
            .map_or(0.0, minutes_to_hours)
    };

    (1..=months.min(12))
        .zip(MONTH_LABELS)
        .map(|(month, label)| MonthComparison {
            month,
            label,
            this_year_hours: hours_for(year, month),
            last_year_hours: hours_for(year - 1, month),
        })
        .collect()
}

/// Focus minutes per local weekday, Monday first.
pub fn weekday_distribution<Tz: TimeZone>(records: &[SessionRecord], tz: &Tz) -> [u64; 7] {
    let mut minutes = [0u64; 7];
    for record in records.iter().filter(|r| r.is_work()) {
        let weekday = local_date(record.completed_at, tz).weekday();
        minutes[weekday.num_days_from_monday() as usize] += u64::from(record.duration_minutes);
    }
    minutes
}

/// Weekday with the most focus minutes, earliest in the week on ties.
pub fn busiest_weekday(distribution: &[u64; 7]) -> Option<Weekday> {
    first_max_index(distribution).map(|i| WEEKDAYS[i])
}

/// Index of the first maximum, or `None` when every value is zero.
fn first_max_index(values: &[u64]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (i, &value) in values.iter().enumerate() {
        if value > best.map_or(0, |(_, v)| v) {
            best = Some((i, value));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "hours are rounded to one decimal and compared exactly"
)]
mod tests {
    use super::*;
    use crate::session_type::SessionType;
    use crate::types::RecordId;
    use chrono::{DateTime, FixedOffset, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session(at: DateTime<Utc>, minutes: u32, kind: SessionType) -> SessionRecord {
        SessionRecord {
            id: RecordId::new(format!("{kind}-{}", at.timestamp())).unwrap(),
            completed_at: at,
            duration_minutes: minutes,
            session_type: kind,
            room_name: None,
        }
    }

    fn work(at: DateTime<Utc>, minutes: u32) -> SessionRecord {
        session(at, minutes, SessionType::Work)
    }

    #[test]
    fn hourly_pattern_uses_start_hour() {
        // Completes at 10:10 after 25 minutes, so it started at 09:45.
        let records = vec![
            work(at(2024, 1, 1, 10, 10), 25),
            work(at(2024, 1, 2, 10, 30), 25),
            session(at(2024, 1, 2, 11, 0), 5, SessionType::Break),
        ];
        let pattern = HourlyPattern::from_records(&records, &Utc);

        assert_eq!(pattern.session_counts[9], 1);
        assert_eq!(pattern.session_counts[10], 1);
        assert_eq!(pattern.session_counts[11], 0);
        assert_eq!(pattern.focus_minutes[9], 25);
        assert_eq!(hourly_distribution(&records, &Utc), pattern.session_counts);
    }

    #[test]
    fn hourly_pattern_follows_timezone() {
        let records = vec![work(at(2024, 1, 1, 0, 30), 25)];
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let pattern = HourlyPattern::from_records(&records, &plus_two);
        assert_eq!(pattern.session_counts[2], 1);
    }

    #[test]
    fn server_minutes_estimate_counts() {
        let mut minutes = vec![0u64; 24];
        minutes[9] = 50;
        minutes[14] = 37; // 1.48 sessions rounds to 1
        minutes[20] = 38; // 1.52 sessions rounds to 2
        let pattern = HourlyPattern::from_server_minutes(&minutes);

        assert_eq!(pattern.session_counts[9], 2);
        assert_eq!(pattern.session_counts[14], 1);
        assert_eq!(pattern.session_counts[20], 2);
        assert_eq!(pattern.average_minutes(9), 25.0);
        assert_eq!(pattern.average_minutes(20), 19.0);
    }

    #[test]
    fn server_minutes_tolerate_short_arrays() {
        let pattern = HourlyPattern::from_server_minutes(&[10, 20]);
        assert_eq!(pattern.focus_minutes[1], 20);
        assert_eq!(pattern.focus_minutes[23], 0);
    }

    #[test]
    fn peak_hour_prefers_earliest_tie() {
        let mut minutes = vec![0u64; 24];
        minutes[8] = 60;
        minutes[15] = 60;
        let pattern = HourlyPattern::from_server_minutes(&minutes);
        assert_eq!(pattern.peak_hour(), Some(8));
    }

    #[test]
    fn peak_hour_follows_session_counts_not_minutes() {
        // Three short sessions starting at 09:xx beat one long one at 14:xx.
        let records = vec![
            work(at(2024, 1, 1, 9, 10), 10),
            work(at(2024, 1, 1, 9, 30), 10),
            work(at(2024, 1, 1, 9, 50), 10),
            work(at(2024, 1, 1, 14, 50), 50),
        ];
        let distribution = hourly_distribution(&records, &Utc);
        let pattern = HourlyPattern::from_records(&records, &Utc);

        assert_eq!(distribution[9], 3);
        assert_eq!(distribution[14], 1);
        assert_eq!(pattern.focus_minutes[14], 50);
        assert_eq!(pattern.peak_hour(), Some(9));
        assert_eq!(pattern.peak_hour(), first_distribution_peak(&distribution));
    }

    #[test]
    fn zero_minute_session_still_marks_its_hour() {
        let records = vec![work(at(2024, 1, 1, 7, 15), 0)];
        let distribution = hourly_distribution(&records, &Utc);
        let pattern = HourlyPattern::from_records(&records, &Utc);

        assert_eq!(distribution[7], 1);
        assert_eq!(pattern.peak_hour(), Some(7));
        assert_eq!(pattern.peak_hour(), first_distribution_peak(&distribution));
        assert!(!pattern.is_empty());
    }

    fn first_distribution_peak(distribution: &[u32; 24]) -> Option<u32> {
        let max = *distribution.iter().max()?;
        if max == 0 {
            return None;
        }
        distribution
            .iter()
            .position(|&v| v == max)
            .and_then(|i| u32::try_from(i).ok())
    }

    #[test]
    fn empty_pattern_has_no_peak_and_zero_averages() {
        let pattern = HourlyPattern::from_records(&[], &Utc);
        assert_eq!(pattern.peak_hour(), None);
        assert!(pattern.is_empty());
        assert_eq!(pattern.average_minutes(5), 0.0);
        assert_eq!(pattern.average_minutes(99), 0.0);
        assert_eq!(pattern.focus_hours(), [0.0; 24]);
    }

    #[test]
    fn heatmap_single_session_eight_weeks_ago() {
        // Wednesday
        let today = date(2024, 6, 12);
        let eight_weeks_ago = at(2024, 4, 17, 12, 0);
        let records = vec![work(eight_weeks_ago, 90)];

        let grid = heatmap_grid(&records, &Utc, today, 12);

        assert_eq!(grid.len(), 12);
        assert!(grid.iter().all(|w| w.days.len() == 7));
        let non_zero: Vec<&HeatmapCell> = grid
            .iter()
            .flat_map(|w| &w.days)
            .filter(|c| c.hours > 0.0)
            .collect();
        assert_eq!(non_zero.len(), 1);
        assert_eq!(non_zero[0].date, "2024-04-17");
        assert_eq!(non_zero[0].day, 2);
        assert_eq!(non_zero[0].hours, 1.5);
    }

    #[test]
    fn heatmap_rows_start_on_monday_and_end_with_current_week() {
        let today = date(2024, 6, 12);
        let grid = heatmap_grid(&[], &Utc, today, 12);

        assert_eq!(grid[0].week_start, "2024-03-25");
        assert_eq!(grid[11].week_start, "2024-06-10");
        assert_eq!(grid[11].days[6].date, "2024-06-16");
        assert!(grid.iter().flat_map(|w| &w.days).all(|c| c.hours == 0.0));
        assert!(heatmap_grid(&[], &Utc, today, 0).is_empty());
    }

    #[test]
    fn heatmap_excludes_sessions_outside_window() {
        let today = date(2024, 6, 12);
        let records = vec![work(at(2024, 1, 1, 9, 0), 60)];
        let grid = heatmap_grid(&records, &Utc, today, 4);
        assert!(grid.iter().flat_map(|w| &w.days).all(|c| c.hours == 0.0));
    }

    #[test]
    fn monthly_comparison_pairs_years() {
        let today = date(2024, 6, 12);
        let records = vec![
            work(at(2024, 3, 5, 9, 0), 120),
            work(at(2023, 3, 9, 9, 0), 30),
            work(at(2023, 12, 1, 9, 0), 60),
            // Two years back is ignored
            work(at(2022, 3, 1, 9, 0), 600),
        ];
        let comparison = monthly_comparison(&records, &Utc, today, 12);

        assert_eq!(comparison.len(), 12);
        assert_eq!(comparison[2].label, "Mar");
        assert_eq!(comparison[2].this_year_hours, 2.0);
        assert_eq!(comparison[2].last_year_hours, 0.5);
        assert_eq!(comparison[11].month, 12);
        assert_eq!(comparison[11].this_year_hours, 0.0);
        assert_eq!(comparison[11].last_year_hours, 1.0);
        assert_eq!(comparison[0].this_year_hours, 0.0);
    }

    #[test]
    fn monthly_comparison_caps_months() {
        let today = date(2024, 6, 12);
        assert_eq!(monthly_comparison(&[], &Utc, today, 6).len(), 6);
        assert_eq!(monthly_comparison(&[], &Utc, today, 40).len(), 12);
    }

    #[test]
    fn weekday_distribution_and_busiest_day() {
        let records = vec![
            // Monday
            work(at(2024, 1, 1, 9, 0), 25),
            // Wednesday, twice
            work(at(2024, 1, 3, 9, 0), 25),
            work(at(2024, 1, 3, 10, 0), 25),
            session(at(2024, 1, 5, 9, 0), 120, SessionType::Break),
        ];
        let dist = weekday_distribution(&records, &Utc);

        assert_eq!(dist, [25, 0, 50, 0, 0, 0, 0]);
        assert_eq!(busiest_weekday(&dist), Some(Weekday::Wed));
        assert_eq!(busiest_weekday(&[0; 7]), None);
    }
}
