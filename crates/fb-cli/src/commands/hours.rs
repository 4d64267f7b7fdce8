//! `fb hours`: focus activity by hour of day and by weekday.

use std::fmt::Write;

use anyhow::Result;
use chrono::{Local, TimeZone, Weekday};
use fb_core::HourlyPattern;
use fb_core::pattern::{busiest_weekday, weekday_distribution};
use serde::Serialize;

use super::Context;
use super::util::{format_minutes, progress_bar};

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursData {
    pub hourly: HourlyPattern,
    pub peak_hour: Option<u32>,
    pub weekday_minutes: [u64; 7],
    pub busiest_weekday: Option<Weekday>,
}

/// Hour-of-day pattern, preferring server-aggregated minutes when present.
pub fn build<Tz: TimeZone>(ctx: &Context, tz: &Tz) -> HoursData {
    let hourly = ctx.options.hourly_focus_time.as_deref().map_or_else(
        || HourlyPattern::from_records(&ctx.records, tz),
        HourlyPattern::from_server_minutes,
    );
    let weekday_minutes = weekday_distribution(&ctx.records, tz);
    HoursData {
        peak_hour: hourly.peak_hour(),
        hourly,
        weekday_minutes,
        busiest_weekday: busiest_weekday(&weekday_minutes),
    }
}

/// Formats the human-readable output. Hours without sessions or minutes are omitted.
pub fn format_hours(data: &HoursData) -> String {
    let mut output = String::new();

    writeln!(output, "FOCUS BY HOUR").unwrap();
    writeln!(output).unwrap();

    if data.hourly.is_empty() {
        writeln!(output, "No focus sessions recorded.").unwrap();
        return output;
    }

    let max = data.hourly.focus_minutes.iter().copied().max().unwrap_or(0);
    for (hour, &minutes) in data.hourly.focus_minutes.iter().enumerate() {
        if minutes == 0 && data.hourly.session_counts[hour] == 0 {
            continue;
        }
        writeln!(
            output,
            "{hour:02}:00  {}  {:>7}  {:>3} sessions",
            progress_bar(minutes, max),
            format_minutes(minutes),
            data.hourly.session_counts[hour]
        )
        .unwrap();
    }

    let peak = data
        .peak_hour
        .map_or_else(|| "-".to_string(), |h| format!("{h:02}:00"));
    writeln!(output).unwrap();
    writeln!(output, "Peak hour:     {peak}").unwrap();

    if let Some(day) = data.busiest_weekday {
        let idx = day.num_days_from_monday() as usize;
        writeln!(
            output,
            "Busiest day:   {} ({})",
            WEEKDAY_LABELS[idx],
            format_minutes(data.weekday_minutes[idx])
        )
        .unwrap();
    }

    output
}

pub fn format_hours_json(data: &HoursData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn run(ctx: &Context, json: bool) -> Result<()> {
    let data = build(ctx, &Local);
    if json {
        println!("{}", format_hours_json(&data)?);
    } else {
        print!("{}", format_hours(&data));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, date, records};
    use chrono::Utc;
    use insta::assert_snapshot;

    fn ctx() -> Context {
        context(
            records(
                r#"[
                    {"id": 1, "completed_at": "2024-03-04T09:25:00Z", "duration_minutes": 25, "session_type": "work"},
                    {"id": 2, "completed_at": "2024-03-05T09:50:00Z", "duration_minutes": 50, "session_type": "work"},
                    {"id": 3, "completed_at": "2024-03-05T15:05:00Z", "duration_minutes": 25, "session_type": "work"},
                    {"id": 4, "completed_at": "2024-03-05T15:10:00Z", "duration_minutes": 5, "session_type": "break"}
                ]"#,
            ),
            date(2024, 3, 10),
        )
    }

    #[test]
    fn test_hours_human_output() {
        let data = build(&ctx(), &Utc);
        assert_eq!(data.peak_hour, Some(9));
        assert_eq!(data.busiest_weekday, Some(Weekday::Tue));

        // Session 3 started at 14:40, so it lands in hour 14.
        assert_snapshot!(format_hours(&data), @r"
        FOCUS BY HOUR

        09:00  ██████████   1h 15m    2 sessions
        14:00  ███░░░░░░░      25m    1 sessions

        Peak hour:     09:00
        Busiest day:   Tue (1h 15m)
        ");
    }

    #[test]
    fn test_hours_prefers_server_minutes() {
        let mut ctx = ctx();
        let mut minutes = vec![0; 24];
        minutes[20] = 100;
        ctx.options.hourly_focus_time = Some(minutes);

        let data = build(&ctx, &Utc);
        assert_eq!(data.peak_hour, Some(20));
        assert_eq!(data.hourly.session_counts[20], 4);
    }

    #[test]
    fn test_hours_peak_counts_sessions() {
        let ctx = context(
            records(
                r#"[
                    {"id": 1, "completed_at": "2024-03-04T09:10:00Z", "duration_minutes": 10, "session_type": "work"},
                    {"id": 2, "completed_at": "2024-03-04T09:30:00Z", "duration_minutes": 10, "session_type": "work"},
                    {"id": 3, "completed_at": "2024-03-04T09:50:00Z", "duration_minutes": 10, "session_type": "work"},
                    {"id": 4, "completed_at": "2024-03-04T14:50:00Z", "duration_minutes": 50, "session_type": "work"}
                ]"#,
            ),
            date(2024, 3, 10),
        );
        let data = build(&ctx, &Utc);
        assert_eq!(data.peak_hour, Some(9));
        assert!(format_hours(&data).contains("Peak hour:     09:00"));
    }

    #[test]
    fn test_hours_zero_minute_session_is_shown() {
        let ctx = context(
            records(
                r#"[{"id": 1, "completed_at": "2024-03-04T07:15:00Z", "duration_minutes": 0, "session_type": "work"}]"#,
            ),
            date(2024, 3, 10),
        );
        let data = build(&ctx, &Utc);
        assert_eq!(data.peak_hour, Some(7));

        assert_snapshot!(format_hours(&data), @r"
        FOCUS BY HOUR

        07:00  ░░░░░░░░░░       0m    1 sessions

        Peak hour:     07:00
        ");
    }

    #[test]
    fn test_hours_without_records() {
        let data = build(&context(vec![], date(2024, 3, 10)), &Utc);
        assert_eq!(data.peak_hour, None);
        assert_snapshot!(format_hours(&data), @r"
        FOCUS BY HOUR

        No focus sessions recorded.
        ");
    }
}
