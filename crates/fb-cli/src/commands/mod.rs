//! CLI subcommand implementations.

pub mod dashboard;
pub mod goals;
pub mod heatmap;
pub mod hours;
pub mod report;
pub mod streak;
pub mod util;

use chrono::{DateTime, Local, NaiveDate, Utc};
use fb_core::{DashboardOptions, SessionRecord, UserGoals, normalize_batch};

use crate::Config;
use crate::input::StatsInput;

/// Everything a command needs: normalized records, targets and "now".
#[derive(Debug)]
pub struct Context {
    pub records: Vec<SessionRecord>,
    /// Entries dropped while reading or normalizing the input.
    pub dropped: usize,
    pub goals: UserGoals,
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
    pub options: DashboardOptions,
}

impl Context {
    /// Normalize an export and resolve goals and reference time.
    ///
    /// Goals embedded in the export win over configured ones. When `today`
    /// is given, "now" is local noon on that date.
    pub fn new(input: StatsInput, config: &Config, today: Option<NaiveDate>) -> Self {
        let batch = normalize_batch(&input.records);
        let dropped = input.skipped + batch.rejected.len();
        if dropped > 0 {
            tracing::info!(dropped, kept = batch.records.len(), "some session entries were skipped");
        }

        let now = today.map_or_else(Utc::now, util::local_noon_to_utc);
        let today = today.unwrap_or_else(|| now.with_timezone(&Local).date_naive());

        Self {
            records: batch.records,
            dropped,
            goals: input.goals.unwrap_or_else(|| config.user_goals()),
            now,
            today,
            options: DashboardOptions {
                heatmap_weeks: config.heatmap_weeks,
                hourly_focus_time: input.hourly_focus_time,
                ..DashboardOptions::default()
            },
        }
    }
}
