//! `fb heatmap`: focus hours per day, one row per week.

use std::fmt::Write;

use anyhow::Result;
use chrono::{Local, TimeZone};
use fb_core::{HeatmapWeek, heatmap_grid};

use super::Context;

/// Shade for a day's focus hours.
fn shade(hours: f64) -> char {
    if hours <= 0.0 {
        '·'
    } else if hours < 1.0 {
        '░'
    } else if hours < 2.0 {
        '▒'
    } else if hours < 4.0 {
        '▓'
    } else {
        '█'
    }
}

pub fn build<Tz: TimeZone>(ctx: &Context, tz: &Tz, weeks: u32) -> Vec<HeatmapWeek> {
    heatmap_grid(&ctx.records, tz, ctx.today, weeks)
}

/// Formats the heat-map as a grid, oldest week first.
pub fn format_heatmap(grid: &[HeatmapWeek]) -> String {
    let mut output = String::new();

    writeln!(output, "ACTIVITY ({} weeks)", grid.len()).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "week of      M T W T F S S   hours").unwrap();

    for week in grid {
        let cells: Vec<String> = week.days.iter().map(|d| shade(d.hours).to_string()).collect();
        let total: f64 = week.days.iter().map(|d| d.hours).sum();
        writeln!(output, "{}  {}  {total:>6.1}", week.week_start, cells.join(" ")).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "· none  ░ <1h  ▒ <2h  ▓ <4h  █ 4h+").unwrap();

    output
}

pub fn format_heatmap_json(grid: &[HeatmapWeek]) -> Result<String> {
    Ok(serde_json::to_string_pretty(grid)?)
}

pub fn run(ctx: &Context, weeks: u32, json: bool) -> Result<()> {
    let grid = build(ctx, &Local, weeks);
    if json {
        println!("{}", format_heatmap_json(&grid)?);
    } else {
        print!("{}", format_heatmap(&grid));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, date, records};
    use chrono::Utc;
    use insta::assert_snapshot;

    #[test]
    fn test_shade_thresholds() {
        assert_eq!(shade(0.0), '·');
        assert_eq!(shade(0.4), '░');
        assert_eq!(shade(1.0), '▒');
        assert_eq!(shade(3.9), '▓');
        assert_eq!(shade(6.0), '█');
    }

    #[test]
    fn test_heatmap_human_output() {
        let ctx = context(
            records(
                r#"[
                    {"id": 1, "completed_at": "2024-03-04T09:00:00Z", "duration_minutes": 30, "session_type": "work"},
                    {"id": 3, "completed_at": "2024-03-13T12:00:00Z", "duration_minutes": 150, "session_type": "work"},
                    {"id": 4, "completed_at": "2024-03-14T09:00:00Z", "duration_minutes": 90, "session_type": "work"}
                ]"#,
            ),
            date(2024, 3, 14),
        );
        let grid = build(&ctx, &Utc, 2);
        assert_eq!(grid.len(), 2);
        assert!(grid.iter().all(|w| w.days.len() == 7));

        assert_snapshot!(format_heatmap(&grid), @r"
        ACTIVITY (2 weeks)

        week of      M T W T F S S   hours
        2024-03-04  ░ · · · · · ·     0.5
        2024-03-11  · · ▓ ▒ · · ·     4.0

        · none  ░ <1h  ▒ <2h  ▓ <4h  █ 4h+
        ");
    }

    #[test]
    fn test_heatmap_zero_weeks_is_empty() {
        let ctx = context(vec![], date(2024, 3, 14));
        assert!(build(&ctx, &Utc, 0).is_empty());
    }
}
