//! `fb goals`: progress toward the daily and weekly targets.

use std::fmt::Write;

use anyhow::Result;
use chrono::{Local, TimeZone};
use fb_core::period::{month_start, week_start};
use fb_core::{DateRange, GoalAchievement, GoalPeriod, GoalType, PeriodAggregate, evaluate_goal};
use serde::Serialize;

use super::Context;
use super::util::{format_minutes, progress_bar};

/// One evaluated goal with the period it covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalLine {
    pub period: GoalPeriod,
    #[serde(flatten)]
    pub achievement: GoalAchievement,
}

/// Evaluate focus-time and session goals for today, this week and this month.
pub fn evaluate<Tz: TimeZone>(ctx: &Context, tz: &Tz) -> Vec<GoalLine> {
    let today = ctx.today;
    let day = PeriodAggregate::for_range(&ctx.records, tz, DateRange::new(today, today));
    let week = PeriodAggregate::for_range(
        &ctx.records,
        tz,
        DateRange::new(week_start(today), today),
    );
    let month = PeriodAggregate::for_range(
        &ctx.records,
        tz,
        DateRange::new(month_start(today), today),
    );

    [
        (GoalPeriod::Daily, GoalType::FocusTime, &day),
        (GoalPeriod::Daily, GoalType::Sessions, &day),
        (GoalPeriod::Weekly, GoalType::FocusTime, &week),
        (GoalPeriod::Weekly, GoalType::Sessions, &week),
        (GoalPeriod::Monthly, GoalType::FocusTime, &month),
    ]
    .into_iter()
    .map(|(period, goal_type, aggregate)| GoalLine {
        period,
        achievement: evaluate_goal(aggregate, &ctx.goals.goal_for(goal_type, period)),
    })
    .collect()
}

fn describe(value: u64, goal_type: GoalType) -> String {
    match goal_type {
        GoalType::FocusTime => format_minutes(value),
        GoalType::Sessions => format!("{value} sessions"),
    }
}

/// Formats the human-readable goals output.
pub fn format_goals(lines: &[GoalLine]) -> String {
    let mut output = String::new();

    writeln!(output, "GOALS").unwrap();
    writeln!(output, "─────").unwrap();

    for line in lines {
        let a = &line.achievement;
        let label = match a.goal_type {
            GoalType::FocusTime => "focus",
            GoalType::Sessions => "sessions",
        };
        let status = if a.is_achieved { "  ✓" } else { "" };
        writeln!(
            output,
            "{:<8} {label:<9} {}  {:>5.1}%  {} / {}{status}",
            line.period.as_str(),
            progress_bar(a.current_value, a.goal_value),
            a.achievement_rate,
            describe(a.current_value, a.goal_type),
            describe(a.goal_value, a.goal_type),
        )
        .unwrap();
    }

    output
}

pub fn format_goals_json(lines: &[GoalLine]) -> Result<String> {
    Ok(serde_json::to_string_pretty(lines)?)
}

pub fn run(ctx: &Context, json: bool) -> Result<()> {
    let lines = evaluate(ctx, &Local);
    if json {
        println!("{}", format_goals_json(&lines)?);
    } else {
        print!("{}", format_goals(&lines));
    }
    Ok(())
}
