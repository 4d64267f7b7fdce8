//! `fb dashboard`: every statistics view in one go.

use std::fmt::Write;

use anyhow::Result;
use chrono::{Local, TimeZone};
use fb_core::{Dashboard, GoalAchievement};

use super::Context;
use super::util::{format_minutes, progress_bar};

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn build<Tz: TimeZone>(ctx: &Context, tz: &Tz) -> Dashboard {
    Dashboard::build(&ctx.records, &ctx.goals, ctx.now, tz, &ctx.options)
}

fn goal_line(output: &mut String, label: &str, goal: &GoalAchievement, value: &str, target: &str) {
    writeln!(
        output,
        "{label:<16}{}  {:>5.1}%  {value} / {target}",
        progress_bar(goal.current_value, goal.goal_value),
        goal.achievement_rate
    )
    .unwrap();
}

/// Formats the human-readable dashboard.
pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let mut output = String::new();
    let summary = &dashboard.summary;

    writeln!(output, "FOCUS DASHBOARD ({})", dashboard.today).unwrap();
    writeln!(output).unwrap();

    // ========== Totals ==========
    writeln!(
        output,
        "Today:          {} in {} sessions",
        format_minutes(dashboard.today_totals.focus_minutes),
        dashboard.today_totals.session_count
    )
    .unwrap();
    writeln!(
        output,
        "This week:      {} in {} sessions",
        format_minutes(dashboard.this_week_totals.focus_minutes),
        dashboard.this_week_totals.session_count
    )
    .unwrap();
    writeln!(
        output,
        "All time:       {} in {} sessions over {} days",
        format_minutes(summary.total_focus_minutes),
        summary.total_sessions,
        summary.active_days
    )
    .unwrap();
    writeln!(output, "Avg session:    {:.1}m", summary.average_session_minutes).unwrap();

    // ========== Goals ==========
    writeln!(output).unwrap();
    writeln!(output, "GOALS").unwrap();
    let daily = &dashboard.goals.daily_focus;
    goal_line(
        &mut output,
        "Daily focus",
        daily,
        &format_minutes(daily.current_value),
        &format_minutes(daily.goal_value),
    );
    let weekly = &dashboard.goals.weekly_sessions;
    goal_line(
        &mut output,
        "Weekly sessions",
        weekly,
        &weekly.current_value.to_string(),
        &weekly.goal_value.to_string(),
    );

    // ========== Patterns ==========
    writeln!(output).unwrap();
    writeln!(output, "STREAKS & PATTERNS").unwrap();
    writeln!(output, "Current streak: {} days", dashboard.streaks.current_streak).unwrap();
    writeln!(output, "Longest streak: {} days", dashboard.streaks.longest_streak).unwrap();
    let peak = dashboard
        .peak_hour
        .map_or_else(|| "-".to_string(), |h| format!("{h:02}:00"));
    writeln!(output, "Peak hour:      {peak}").unwrap();
    let busiest = dashboard
        .busiest_weekday
        .map_or("-", |d| WEEKDAY_NAMES[d.num_days_from_monday() as usize]);
    writeln!(output, "Busiest day:    {busiest}").unwrap();

    output
}

pub fn format_dashboard_json(dashboard: &Dashboard) -> Result<String> {
    Ok(serde_json::to_string_pretty(dashboard)?)
}

pub fn run(ctx: &Context, json: bool) -> Result<()> {
    let dashboard = build(ctx, &Local);
    if json {
        println!("{}", format_dashboard_json(&dashboard)?);
    } else {
        print!("{}", format_dashboard(&dashboard));
    }
    Ok(())
}
