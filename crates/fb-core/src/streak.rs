//! Consecutive-day focus streaks.

use std::collections::BTreeSet;

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::period::local_date;
use crate::record::SessionRecord;

/// Current and longest run of consecutive days with a completed work session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    /// Run ending today, or yesterday when today has no session yet.
    pub current_streak: u32,
    pub longest_streak: u32,
    /// First day of the longest run. Earliest run wins ties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longest_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longest_end: Option<NaiveDate>,
}

/// Compute streaks as of `today` in the viewer's timezone.
///
/// Any work record qualifies its day, including zero-minute ones. Dates after
/// `today` still count toward the longest streak but never toward the
/// current one.
pub fn compute_streaks<Tz: TimeZone>(
    records: &[SessionRecord],
    tz: &Tz,
    today: NaiveDate,
) -> StreakState {
    let days: BTreeSet<NaiveDate> = records
        .iter()
        .filter(|r| r.is_work())
        .map(|r| local_date(r.completed_at, tz))
        .collect();

    let mut state = StreakState {
        current_streak: current_run(&days, today),
        ..StreakState::default()
    };

    let mut run_start: Option<NaiveDate> = None;
    let mut run_len = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for &day in &days {
        match prev {
            Some(p) if p.succ_opt() == Some(day) => run_len += 1,
            _ => {
                run_start = Some(day);
                run_len = 1;
            }
        }
        if run_len > state.longest_streak {
            state.longest_streak = run_len;
            state.longest_start = run_start;
            state.longest_end = Some(day);
        }
        prev = Some(day);
    }

    state
}

/// Length of the run ending today, or yesterday if today is missing.
fn current_run(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let anchor = if days.contains(&today) {
        Some(today)
    } else {
        today.pred_opt().filter(|yesterday| days.contains(yesterday))
    };

    let mut streak = 0;
    let mut cursor = anchor;
    while let Some(day) = cursor {
        if !days.contains(&day) {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}
