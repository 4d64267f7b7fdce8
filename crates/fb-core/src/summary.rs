//! Headline totals and averages.

use std::collections::HashSet;

use chrono::TimeZone;
use serde::Serialize;

use crate::period::local_date;
use crate::record::SessionRecord;
use crate::units::{average, minutes_to_hours, round_one_decimal};

/// Whole-history totals shown above the charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_focus_minutes: u64,
    pub total_break_minutes: u64,
    pub total_focus_hours: f64,
    /// Completed focus sessions.
    pub total_sessions: u32,
    /// Days with at least one work session.
    pub active_days: u32,
    pub average_session_minutes: f64,
    /// Focus minutes per active day.
    pub average_daily_focus_minutes: f64,
}

impl SummaryStats {
    pub fn from_records<Tz: TimeZone>(records: &[SessionRecord], tz: &Tz) -> Self {
        let mut stats = Self::default();
        let mut days = HashSet::new();

        for record in records {
            let minutes = u64::from(record.duration_minutes);
            if record.is_work() {
                stats.total_focus_minutes += minutes;
                stats.total_sessions += 1;
                days.insert(local_date(record.completed_at, tz));
            } else {
                stats.total_break_minutes += minutes;
            }
        }

        stats.active_days = u32::try_from(days.len()).unwrap_or(u32::MAX);
        stats.total_focus_hours = minutes_to_hours(stats.total_focus_minutes);
        stats.average_session_minutes = round_one_decimal(average(
            stats.total_focus_minutes,
            u64::from(stats.total_sessions),
        ));
        stats.average_daily_focus_minutes = round_one_decimal(average(
            stats.total_focus_minutes,
            u64::from(stats.active_days),
        ));
        stats
    }
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "averages are rounded to one decimal and compared exactly"
)]
mod tests {
    use super::*;
    use crate::session_type::SessionType;
    use crate::types::RecordId;
    use chrono::Utc;

    fn session(id: &str, day: u32, minutes: u32, kind: SessionType) -> SessionRecord {
        SessionRecord {
            id: RecordId::new(id).unwrap(),
            completed_at: Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0).unwrap(),
            duration_minutes: minutes,
            session_type: kind,
            room_name: Some("Study Hall".to_string()),
        }
    }

    #[test]
    fn totals_and_averages() {
        let records = vec![
            session("a", 1, 25, SessionType::Work),
            session("b", 1, 5, SessionType::Break),
            session("c", 1, 50, SessionType::Work),
            session("d", 3, 25, SessionType::Work),
        ];
        let stats = SummaryStats::from_records(&records, &Utc);

        assert_eq!(stats.total_focus_minutes, 100);
        assert_eq!(stats.total_break_minutes, 5);
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.active_days, 2);
        assert_eq!(stats.average_session_minutes, 33.3);
        assert_eq!(stats.average_daily_focus_minutes, 50.0);
        assert_eq!(stats.total_focus_hours, 1.7);
    }

    #[test]
    fn empty_input_has_zero_averages() {
        let stats = SummaryStats::from_records(&[], &Utc);
        assert_eq!(stats, SummaryStats::default());
        assert_eq!(stats.average_session_minutes, 0.0);
    }

    #[test]
    fn zero_minute_sessions_do_not_break_averages() {
        let records = vec![session("a", 1, 0, SessionType::Work)];
        let stats = SummaryStats::from_records(&records, &Utc);
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.average_session_minutes, 0.0);
        assert_eq!(stats.active_days, 1);
    }
}
