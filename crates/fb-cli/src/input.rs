//! Loading session exports from disk or stdin.
//!
//! Three layouts are accepted:
//! - a JSON array of wire records
//! - JSON Lines, one wire record per line
//! - a stats payload object: `{"sessions": [...], "hourly_focus_time": [...], "goals": {...}}`
//!
//! Entries that are not valid records are logged and skipped. One bad line
//! never aborts the load.

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use fb_core::{UserGoals, WireSessionRecord};
use serde::Deserialize;
use serde_json::Value;

/// Parsed contents of an export.
#[derive(Debug, Default)]
pub struct StatsInput {
    pub records: Vec<WireSessionRecord>,
    /// Entries that could not be read as a wire record at all.
    pub skipped: usize,
    /// Server-aggregated focus minutes per hour, when the payload carries it.
    pub hourly_focus_time: Option<Vec<u64>>,
    /// Goal record, when the payload carries it.
    pub goals: Option<UserGoals>,
}

#[derive(Debug, Deserialize)]
struct StatsPayload {
    #[serde(alias = "records")]
    sessions: Vec<Value>,
    #[serde(default, alias = "hourlyFocusTime")]
    hourly_focus_time: Option<Vec<u64>>,
    #[serde(default)]
    goals: Option<UserGoals>,
}

/// Read an export from `path`, or stdin when `path` is `None` or `-`.
pub fn load(path: Option<&Path>) -> Result<StatsInput> {
    let text = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    parse(&text)
}

/// Parse an export from text.
pub fn parse(text: &str) -> Result<StatsInput> {
    let trimmed = text.trim_start();

    if trimmed.starts_with('[') {
        let values: Vec<Value> =
            serde_json::from_str(trimmed).context("invalid JSON array of session records")?;
        return Ok(from_values(values));
    }

    if trimmed.starts_with('{') {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
            if map.contains_key("sessions") || map.contains_key("records") {
                let payload: StatsPayload = serde_json::from_value(Value::Object(map))
                    .context("invalid stats payload")?;
                let mut input = from_values(payload.sessions);
                input.hourly_focus_time = payload.hourly_focus_time;
                input.goals = payload.goals;
                return Ok(input);
            }
        }
    }

    Ok(parse_lines(text))
}

fn from_values(values: Vec<Value>) -> StatsInput {
    let mut input = StatsInput::default();
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<WireSessionRecord>(value) {
            Ok(record) => input.records.push(record),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping unreadable session entry");
                input.skipped += 1;
            }
        }
    }
    input
}

fn parse_lines(text: &str) -> StatsInput {
    let mut input = StatsInput::default();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<WireSessionRecord>(trimmed) {
            Ok(record) => input.records.push(record),
            Err(e) => {
                tracing::warn!(line = idx + 1, error = %e, "skipping malformed JSON line");
                input.skipped += 1;
            }
        }
    }
    input
}
