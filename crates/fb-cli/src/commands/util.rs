//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bound for relative dates (~1000 years in days).
const MAX_RELATIVE_DAYS: u64 = 1000 * 365;

/// Parse a reference date as ISO, a keyword, or a relative offset from `today`.
///
/// Supports:
/// - ISO 8601 date: "2024-01-15"
/// - Keywords: "today", "yesterday"
/// - Relative: "3 days ago", "2 weeks ago"
pub fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let days_back = match s {
        "today" => 0,
        "yesterday" => 1,
        _ => {
            let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
                anyhow::bail!(
                    "Invalid date: {s}. Use YYYY-MM-DD, 'today', 'yesterday', or relative (e.g., '3 days ago')"
                );
            };
            let n: u64 = caps[1]
                .parse()
                .context("failed to parse number in relative date")?;
            let per_unit = if &caps[2] == "week" { 7 } else { 1 };
            if n > MAX_RELATIVE_DAYS / per_unit {
                anyhow::bail!("Relative date too far back: {s}");
            }
            n * per_unit
        }
    };

    today
        .checked_sub_days(Days::new(days_back))
        .with_context(|| format!("date out of range: {s}"))
}

/// Local noon of `date` as a UTC instant.
///
/// Noon avoids DST transitions, which happen around midnight.
pub fn local_noon_to_utc(date: NaiveDate) -> DateTime<Utc> {
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    Local
        .from_local_datetime(&noon)
        .earliest()
        .map_or_else(|| noon.and_utc(), |dt| dt.with_timezone(&Utc))
}

/// Formats minutes as duration string.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
pub fn format_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;

    if hours >= 1 {
        format!("{hours}h {rest}m")
    } else {
        format!("{rest}m")
    }
}

/// Generates a 10-character progress bar.
/// Values <5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(value: u64, max: u64) -> String {
    if max == 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Name of the local timezone for JSON output.
pub fn timezone_name() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_date_iso() {
        let today = date(2024, 6, 12);
        assert_eq!(parse_date("2024-01-05", today).unwrap(), date(2024, 1, 5));
    }

    #[test]
    fn parse_date_keywords_and_relative() {
        let today = date(2024, 6, 12);
        assert_eq!(parse_date("today", today).unwrap(), today);
        assert_eq!(parse_date("yesterday", today).unwrap(), date(2024, 6, 11));
        assert_eq!(parse_date("3 days ago", today).unwrap(), date(2024, 6, 9));
        assert_eq!(parse_date("1 day ago", today).unwrap(), date(2024, 6, 11));
        assert_eq!(parse_date("2 weeks ago", today).unwrap(), date(2024, 5, 29));
    }

    #[test]
    fn parse_date_rejects_garbage() {
        let today = date(2024, 6, 12);
        assert!(parse_date("next tuesday", today).is_err());
        assert!(parse_date("99999999 weeks ago", today).is_err());
    }

    #[test]
    fn noon_stays_on_the_same_local_date() {
        let d = date(2024, 3, 10);
        assert_eq!(local_noon_to_utc(d).with_timezone(&Local).date_naive(), d);
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(60), "1h 0m");
        assert_eq!(format_minutes(150), "2h 30m");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(100, 100), "██████████");
        assert_eq!(progress_bar(50, 100), "█████░░░░░");
        assert_eq!(progress_bar(1, 100), "█░░░░░░░░░");
        assert_eq!(progress_bar(0, 0), "░░░░░░░░░░");
        assert_eq!(progress_bar(250, 100), "██████████");
    }
}
