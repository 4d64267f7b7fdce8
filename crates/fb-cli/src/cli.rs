//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fb_core::Granularity;

/// Upper bound for `report --last`, about ten years of daily buckets.
pub const MAX_REPORT_PERIODS: i64 = 3660;

/// Upper bound for `heatmap --weeks`.
pub const MAX_HEATMAP_WEEKS: i64 = 520;

/// Focus session statistics.
///
/// Reads completed focus/break session records exported from the stats
/// backend and prints rollups, patterns, streaks and goal progress.
#[derive(Debug, Parser)]
#[command(name = "fb", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Session records file (JSON array, JSON Lines, or a stats payload).
    /// Use `-` for stdin.
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD, "today", "yesterday", or "N days ago").
    #[arg(long, global = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the full statistics dashboard.
    Dashboard {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show daily, weekly or monthly rollups.
    Report {
        /// Bucket size.
        #[arg(long, value_enum, default_value_t = PeriodArg::Day)]
        period: PeriodArg,

        /// Number of most recent periods to show.
        #[arg(
            long,
            default_value_t = 7,
            value_parser = clap::value_parser!(u32).range(1..=MAX_REPORT_PERIODS)
        )]
        last: u32,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show current and longest focus streaks.
    Streak {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show progress toward the configured goals.
    Goals {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the activity heat-map.
    Heatmap {
        /// Number of weeks (defaults to `heatmap_weeks` from config).
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_HEATMAP_WEEKS))]
        weeks: Option<u32>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show focus activity by hour of day.
    Hours {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Report bucket size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    Day,
    Week,
    Month,
}

impl From<PeriodArg> for Granularity {
    fn from(period: PeriodArg) -> Self {
        match period {
            PeriodArg::Day => Self::Day,
            PeriodArg::Week => Self::Week,
            PeriodArg::Month => Self::Month,
        }
    }
}
