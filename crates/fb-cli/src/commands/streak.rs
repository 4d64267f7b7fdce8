//! `fb streak`: current and longest run of focus days.

use std::fmt::Write;

use anyhow::Result;
use chrono::{Local, NaiveDate, TimeZone};
use fb_core::{StreakState, compute_streaks};
use serde::Serialize;

use super::Context;

fn plural_days(n: u32) -> &'static str {
    if n == 1 { "day" } else { "days" }
}

/// Formats the human-readable streak output.
pub fn format_streak(state: &StreakState, today: NaiveDate) -> String {
    let mut output = String::new();

    writeln!(output, "FOCUS STREAK (as of {today})").unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "Current:  {} {}",
        state.current_streak,
        plural_days(state.current_streak)
    )
    .unwrap();

    match (state.longest_start, state.longest_end) {
        (Some(start), Some(end)) => writeln!(
            output,
            "Longest:  {} {} ({start} to {end})",
            state.longest_streak,
            plural_days(state.longest_streak)
        )
        .unwrap(),
        _ => writeln!(
            output,
            "Longest:  {} {}",
            state.longest_streak,
            plural_days(state.longest_streak)
        )
        .unwrap(),
    }

    output
}

#[derive(Debug, Serialize)]
struct JsonStreak<'a> {
    today: NaiveDate,
    #[serde(flatten)]
    state: &'a StreakState,
}

pub fn format_streak_json(state: &StreakState, today: NaiveDate) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonStreak { today, state })?)
}

pub fn compute<Tz: TimeZone>(ctx: &Context, tz: &Tz) -> StreakState {
    compute_streaks(&ctx.records, tz, ctx.today)
}

pub fn run(ctx: &Context, json: bool) -> Result<()> {
    let state = compute(ctx, &Local);
    if json {
        println!("{}", format_streak_json(&state, ctx.today)?);
    } else {
        print!("{}", format_streak(&state, ctx.today));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, date, records};
    use chrono::Utc;
    use insta::{assert_json_snapshot, assert_snapshot};

    fn streak_records() -> Vec<fb_core::SessionRecord> {
        records(
            r#"[
                {"id": "a", "completed_at": "2024-03-01T09:00:00Z", "duration_minutes": 25, "session_type": "work"},
                {"id": "b", "completed_at": "2024-03-02T09:00:00Z", "duration_minutes": 25, "session_type": "work"},
                {"id": "c", "completed_at": "2024-03-03T09:00:00Z", "duration_minutes": 25, "session_type": "work"},
                {"id": "d", "completed_at": "2024-03-09T09:00:00Z", "duration_minutes": 25, "session_type": "work"},
                {"id": "e", "completed_at": "2024-03-10T09:00:00Z", "duration_minutes": 5, "session_type": "break"}
            ]"#,
        )
    }

    #[test]
    fn test_streak_human_output() {
        let ctx = context(streak_records(), date(2024, 3, 10));
        let state = compute(&ctx, &Utc);

        assert_snapshot!(format_streak(&state, ctx.today), @r"
        FOCUS STREAK (as of 2024-03-10)

        Current:  1 day
        Longest:  3 days (2024-03-01 to 2024-03-03)
        ");
    }

    #[test]
    fn test_streak_broken_by_gap() {
        let ctx = context(streak_records(), date(2024, 3, 11));
        let state = compute(&ctx, &Utc);
        assert_eq!(state.current_streak, 0);
        assert_eq!(state.longest_streak, 3);
    }

    #[test]
    fn test_streak_json_output() {
        let ctx = context(streak_records(), date(2024, 3, 10));
        let state = compute(&ctx, &Utc);
        let parsed: serde_json::Value =
            serde_json::from_str(&format_streak_json(&state, ctx.today).unwrap()).unwrap();

        assert_json_snapshot!(parsed, @r#"
        {
          "currentStreak": 1,
          "longestEnd": "2024-03-03",
          "longestStart": "2024-03-01",
          "longestStreak": 3,
          "today": "2024-03-10"
        }
        "#);
    }

    #[test]
    fn test_streak_without_records() {
        let ctx = context(vec![], date(2024, 3, 10));
        let state = compute(&ctx, &Utc);
        assert_snapshot!(format_streak(&state, ctx.today), @r"
        FOCUS STREAK (as of 2024-03-10)

        Current:  0 days
        Longest:  0 days
        ");
    }
}
