//! Report command for daily, weekly and monthly rollups.
//!
//! This module implements `fb report` with a bucket size (--period), a
//! window (--last N) and output formats (human-readable, JSON).

use std::fmt::Write;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use fb_core::{Bucket, DateRange, Granularity, PeriodAggregate, stats_in_range};
use serde::Serialize;

use super::Context;
use super::util::{format_minutes, progress_bar, timezone_name};

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub granularity: Granularity,
    pub range: DateRange,
    pub timezone: String,
    pub buckets: Vec<Bucket>,
}

/// Builds zero-filled buckets for the `last` periods ending with `today`'s.
pub fn generate_report_data<Tz: TimeZone>(
    ctx: &Context,
    tz: &Tz,
    granularity: Granularity,
    last: u32,
    timezone: String,
) -> ReportData {
    let range = DateRange::last_n(ctx.today, last, granularity);
    ReportData {
        generated_at: ctx.now,
        granularity,
        range,
        timezone,
        buckets: stats_in_range(&ctx.records, tz, granularity, range),
    }
}

fn period_word(granularity: Granularity, count: usize) -> String {
    let word = match granularity {
        Granularity::Day => "day",
        Granularity::Week => "week",
        Granularity::Month => "month",
    };
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();
    let count = data.buckets.len();

    writeln!(
        output,
        "FOCUS REPORT: last {count} {}",
        period_word(data.granularity, count)
    )
    .unwrap();

    let totals = PeriodAggregate::from_buckets(&data.buckets);
    if totals.focus_minutes == 0 && totals.break_minutes == 0 && totals.session_count == 0 {
        writeln!(output).unwrap();
        writeln!(output, "No sessions recorded in this window.").unwrap();
        return output;
    }

    let max_focus = data
        .buckets
        .iter()
        .map(|b| b.focus_minutes)
        .max()
        .unwrap_or(0);

    writeln!(output).unwrap();
    for bucket in &data.buckets {
        let bar = progress_bar(bucket.focus_minutes, max_focus);
        let focus = format_minutes(bucket.focus_minutes);
        let sessions = bucket.session_count;
        writeln!(
            output,
            "{:<10}  {bar}  {focus:>7}  {sessions:>3} sessions",
            bucket.key
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Focus time:  {}", format_minutes(totals.focus_minutes)).unwrap();
    writeln!(output, "Break time:  {}", format_minutes(totals.break_minutes)).unwrap();
    writeln!(output, "Sessions:    {}", totals.session_count).unwrap();

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: String,
    pub timezone: String,
    pub period: JsonPeriod,
    pub buckets: &'a [Bucket],
    pub totals: PeriodAggregate,
}

#[derive(Debug, Serialize)]
pub struct JsonPeriod {
    pub start: String,
    pub end: String,
    #[serde(rename = "type")]
    pub period_type: Granularity,
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let report = JsonReport {
        generated_at: data.generated_at.to_rfc3339(),
        timezone: data.timezone.clone(),
        period: JsonPeriod {
            start: iso(data.range.start),
            end: iso(data.range.end),
            period_type: data.granularity,
        },
        buckets: &data.buckets,
        totals: PeriodAggregate::from_buckets(&data.buckets),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run(ctx: &Context, granularity: Granularity, last: u32, json: bool) -> Result<()> {
    let data = generate_report_data(ctx, &Local, granularity, last, timezone_name());

    if json {
        let output = format_report_json(&data)?;
        println!("{output}");
    } else {
        let output = format_report(&data);
        print!("{output}");
    }

    Ok(())
}
