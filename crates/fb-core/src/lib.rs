//! Core analytics for focusboard.
//!
//! This crate turns a batch of completed focus/break session records into the
//! numeric views the statistics page renders:
//! - Normalization: accepting the backend's record shapes
//! - Bucketing: daily, weekly (Monday start) and monthly rollups
//! - Patterns: hour-of-day, heat-map, month-over-month, weekday
//! - Streaks and goal achievement
//!
//! Every function is pure. The viewer's timezone and the reference date are
//! always passed in explicitly.

pub mod bucket;
pub mod dashboard;
pub mod goal;
pub mod normalize;
pub mod pattern;
pub mod period;
mod record;
mod session_type;
pub mod streak;
pub mod summary;
mod types;
pub mod units;

pub use bucket::{
    Bucket, DailyBucket, MonthlyBucket, PeriodAggregate, WeeklyBucket, daily_stats,
    monthly_stats, stats_in_range, weekly_stats,
};
pub use dashboard::{Dashboard, DashboardOptions, GoalProgress};
pub use goal::{Goal, GoalAchievement, GoalPeriod, GoalType, UserGoals, evaluate_goal};
pub use normalize::{
    MalformedRecordError, NormalizedBatch, RejectedRecord, WireSessionRecord, normalize,
    normalize_all, normalize_batch,
};
pub use pattern::{
    HeatmapWeek, HourlyPattern, MonthComparison, heatmap_grid, hourly_distribution,
    monthly_comparison,
};
pub use period::{DateRange, Granularity};
pub use record::SessionRecord;
pub use session_type::SessionType;
pub use streak::{StreakState, compute_streaks};
pub use summary::SummaryStats;
pub use types::{RecordId, ValidationError};
