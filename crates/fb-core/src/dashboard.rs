//! One-call assembly of every statistics view.
//!
//! The statistics page shows the same underlying numbers in several charts.
//! Building them together from one record slice, one timezone and one
//! reference instant keeps those charts consistent with each other.

use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday};
use serde::Serialize;

use crate::bucket::{Bucket, PeriodAggregate, stats_in_range};
use crate::goal::{GoalAchievement, GoalPeriod, GoalType, UserGoals, evaluate_goal};
use crate::pattern::{
    HeatmapWeek, HourlyPattern, MonthComparison, busiest_weekday, heatmap_grid,
    monthly_comparison, weekday_distribution,
};
use crate::period::{DateRange, Granularity, day_key, local_date, week_start};
use crate::record::SessionRecord;
use crate::streak::{StreakState, compute_streaks};
use crate::summary::SummaryStats;

/// Window sizes for the dashboard views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOptions {
    pub recent_days: u32,
    pub recent_weeks: u32,
    pub recent_months: u32,
    pub heatmap_weeks: u32,
    pub comparison_months: u32,
    /// Server-computed focus minutes per hour, preferred over raw records.
    pub hourly_focus_time: Option<Vec<u64>>,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            recent_days: 7,
            recent_weeks: 12,
            recent_months: 12,
            heatmap_weeks: 12,
            comparison_months: 12,
            hourly_focus_time: None,
        }
    }
}

/// Goal progress for the current day and week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub daily_focus: GoalAchievement,
    pub weekly_sessions: GoalAchievement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    /// Local date the dashboard was built for.
    pub today: String,
    pub summary: SummaryStats,
    pub today_totals: PeriodAggregate,
    pub this_week_totals: PeriodAggregate,
    pub recent_days: Vec<Bucket>,
    pub recent_weeks: Vec<Bucket>,
    pub recent_months: Vec<Bucket>,
    pub hourly: HourlyPattern,
    pub peak_hour: Option<u32>,
    /// Focus minutes per weekday, Monday first.
    pub weekday_minutes: [u64; 7],
    pub busiest_weekday: Option<Weekday>,
    pub heatmap: Vec<HeatmapWeek>,
    pub monthly_comparison: Vec<MonthComparison>,
    pub streaks: StreakState,
    pub goals: GoalProgress,
}

impl Dashboard {
    pub fn build<Tz: TimeZone>(
        records: &[SessionRecord],
        user_goals: &UserGoals,
        now: DateTime<Utc>,
        tz: &Tz,
        options: &DashboardOptions,
    ) -> Self {
        let today = local_date(now, tz);
        let today_totals = PeriodAggregate::for_range(records, tz, DateRange::new(today, today));
        let this_week_totals =
            PeriodAggregate::for_range(records, tz, DateRange::new(week_start(today), today));

        let hourly = options.hourly_focus_time.as_deref().map_or_else(
            || HourlyPattern::from_records(records, tz),
            HourlyPattern::from_server_minutes,
        );
        let weekday_minutes = weekday_distribution(records, tz);

        let goals = GoalProgress {
            daily_focus: evaluate_goal(
                &today_totals,
                &user_goals.goal_for(GoalType::FocusTime, GoalPeriod::Daily),
            ),
            weekly_sessions: evaluate_goal(
                &this_week_totals,
                &user_goals.goal_for(GoalType::Sessions, GoalPeriod::Weekly),
            ),
        };

        tracing::debug!(
            records = records.len(),
            today = %today,
            "building dashboard"
        );

        Self {
            generated_at: now,
            today: day_key(today),
            summary: SummaryStats::from_records(records, tz),
            today_totals,
            this_week_totals,
            recent_days: recent(records, tz, today, options.recent_days, Granularity::Day),
            recent_weeks: recent(records, tz, today, options.recent_weeks, Granularity::Week),
            recent_months: recent(records, tz, today, options.recent_months, Granularity::Month),
            peak_hour: hourly.peak_hour(),
            hourly,
            weekday_minutes,
            busiest_weekday: busiest_weekday(&weekday_minutes),
            heatmap: heatmap_grid(records, tz, today, options.heatmap_weeks),
            monthly_comparison: monthly_comparison(records, tz, today, options.comparison_months),
            streaks: compute_streaks(records, tz, today),
            goals,
        }
    }
}

/// The `n` most recent periods ending with today's, zero-filled.
fn recent<Tz: TimeZone>(
    records: &[SessionRecord],
    tz: &Tz,
    today: NaiveDate,
    n: u32,
    granularity: Granularity,
) -> Vec<Bucket> {
    stats_in_range(
        records,
        tz,
        granularity,
        DateRange::last_n(today, n, granularity),
    )
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "exact equality intended for rounded values"
)]
mod tests {
    use super::*;
    use crate::session_type::SessionType;
    use crate::types::RecordId;

    fn session(id: &str, at: DateTime<Utc>, minutes: u32, kind: SessionType) -> SessionRecord {
        SessionRecord {
            id: RecordId::new(id).unwrap(),
            completed_at: at,
            duration_minutes: minutes,
            session_type: kind,
            room_name: None,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn goals() -> UserGoals {
        UserGoals {
            daily_goal_minutes: 100,
            weekly_goal_sessions: 10,
        }
    }

    #[test]
    fn empty_dashboard_is_well_formed() {
        let now = at(2024, 6, 12, 15);
        let dash = Dashboard::build(&[], &goals(), now, &Utc, &DashboardOptions::default());

        assert_eq!(dash.today, "2024-06-12");
        assert_eq!(dash.recent_days.len(), 7);
        assert_eq!(dash.recent_weeks.len(), 12);
        assert_eq!(dash.recent_months.len(), 12);
        assert_eq!(dash.heatmap.len(), 12);
        assert_eq!(dash.monthly_comparison.len(), 12);
        assert_eq!(dash.peak_hour, None);
        assert_eq!(dash.busiest_weekday, None);
        assert_eq!(dash.streaks, StreakState::default());
        assert_eq!(dash.goals.daily_focus.achievement_rate, 0.0);
        assert!(!dash.goals.daily_focus.is_achieved);
        assert_eq!(dash.goals.weekly_sessions.remaining, 10);
    }

    #[test]
    fn dashboard_combines_views() {
        // Wednesday
        let now = at(2024, 6, 12, 15);
        let records = vec![
            session("a", at(2024, 6, 10, 9), 25, SessionType::Work),
            session("b", at(2024, 6, 11, 9), 25, SessionType::Work),
            session("c", at(2024, 6, 12, 9), 50, SessionType::Work),
            session("d", at(2024, 6, 12, 10), 10, SessionType::Break),
            session("e", at(2024, 6, 12, 14), 50, SessionType::Work),
        ];
        let dash = Dashboard::build(&records, &goals(), now, &Utc, &DashboardOptions::default());

        assert_eq!(dash.today_totals.focus_minutes, 100);
        assert_eq!(dash.today_totals.break_minutes, 10);
        assert_eq!(dash.this_week_totals.session_count, 4);
        assert_eq!(dash.streaks.current_streak, 3);
        assert_eq!(dash.goals.daily_focus.achievement_rate, 100.0);
        assert!(dash.goals.daily_focus.is_achieved);
        assert_eq!(dash.goals.weekly_sessions.current_value, 4);
        assert_eq!(dash.goals.weekly_sessions.remaining, 6);
        assert_eq!(dash.recent_days.last().unwrap().focus_minutes, 100);
        assert_eq!(dash.recent_weeks.last().unwrap().key, "2024-06-10");
        assert_eq!(dash.recent_months.last().unwrap().key, "2024-06");
        assert_eq!(dash.busiest_weekday, Some(Weekday::Wed));
        // 50 minutes completing at 09:00 started at 08:10
        assert_eq!(dash.peak_hour, Some(8));
        let june = &dash.monthly_comparison[5];
        assert_eq!(june.this_year_hours, 2.5);
    }

    #[test]
    fn server_hourly_minutes_take_precedence() {
        let mut minutes = vec![0u64; 24];
        minutes[21] = 75;
        let options = DashboardOptions {
            hourly_focus_time: Some(minutes),
            ..DashboardOptions::default()
        };
        let records = vec![session("a", at(2024, 6, 12, 9), 25, SessionType::Work)];
        let dash = Dashboard::build(&records, &goals(), at(2024, 6, 12, 22), &Utc, &options);

        assert_eq!(dash.peak_hour, Some(21));
        assert_eq!(dash.hourly.session_counts[21], 3);
        assert_eq!(dash.hourly.session_counts[8], 0);
    }

    #[test]
    fn dashboard_is_deterministic() {
        let now = at(2024, 6, 12, 15);
        let records = vec![session("a", at(2024, 6, 1, 9), 25, SessionType::Work)];
        let options = DashboardOptions::default();
        let first = Dashboard::build(&records, &goals(), now, &Utc, &options);
        let second = Dashboard::build(&records, &goals(), now, &Utc, &options);
        assert_eq!(first, second);
    }
}
