//! End-to-end tests for the `fb` binary.
//!
//! Each test writes a session export into a temp directory and runs the
//! binary against it with a pinned `--today` and `TZ=UTC`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn fb_binary() -> String {
    env!("CARGO_BIN_EXE_fb").to_string()
}

fn fb_command(home: &Path) -> Command {
    let mut cmd = Command::new(fb_binary());
    cmd.env("HOME", home)
        .env("TZ", "UTC")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RUST_LOG")
        .env_remove("FB_DAILY_GOAL_MINUTES")
        .env_remove("FB_WEEKLY_GOAL_SESSIONS")
        .env_remove("FB_HEATMAP_WEEKS")
        .env_remove("FB_RECORDS_PATH");
    cmd
}

fn run_fb(home: &Path, args: &[&str]) -> Output {
    let output = fb_command(home)
        .args(args)
        .output()
        .expect("failed to run fb");
    assert!(
        output.status.success(),
        "fb {args:?} should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let output = run_fb(home, args);
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "fb {args:?} should print JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

/// A week of sessions ending Wednesday 2024-03-13.
const SESSIONS: &str = r#"[
    {"id": 1, "completed_at": "2024-03-09T10:00:00Z", "duration_minutes": 25, "session_type": "work"},
    {"id": 2, "completed_at": "2024-03-11T10:00:00Z", "duration_minutes": 25, "session_type": "work"},
    {"id": 3, "completed_at": "2024-03-12T10:00:00Z", "duration_minutes": 50, "session_type": "work"},
    {"id": 4, "completed_at": "2024-03-13T10:00:00Z", "duration_minutes": 25, "session_type": "work"},
    {"id": 5, "completed_at": "2024-03-13T11:00:00Z", "duration_minutes": 35, "session_type": "work"},
    {"id": 6, "completed_at": "2024-03-13T11:05:00Z", "duration_minutes": 5, "session_type": "break"}
]"#;

fn write_sessions(temp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_report_daily_json() {
    let temp = TempDir::new().unwrap();
    let path = write_sessions(&temp, "sessions.json", SESSIONS);
    let path = path.to_str().unwrap();

    let report = run_json(
        temp.path(),
        &["report", "--input", path, "--today", "2024-03-13", "--last", "7", "--json"],
    );

    assert_eq!(report["period"]["type"], "day");
    assert_eq!(report["period"]["start"], "2024-03-07");
    assert_eq!(report["period"]["end"], "2024-03-13");

    let buckets = report["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 7);
    assert_eq!(buckets[6]["key"], "2024-03-13");
    assert_eq!(buckets[6]["focusMinutes"], 60);
    assert_eq!(buckets[6]["breakMinutes"], 5);
    assert_eq!(buckets[6]["sessionCount"], 2);
    assert_eq!(report["totals"]["focusMinutes"], 160);
    assert_eq!(report["totals"]["sessionCount"], 5);
}

#[test]
fn test_report_weekly_and_monthly_json() {
    let temp = TempDir::new().unwrap();
    let path = write_sessions(&temp, "sessions.json", SESSIONS);
    let path = path.to_str().unwrap();

    let weekly = run_json(
        temp.path(),
        &["report", "-i", path, "--today", "2024-03-13", "--period", "week", "--last", "2", "--json"],
    );
    let keys: Vec<&str> = weekly["buckets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["2024-03-04", "2024-03-11"]);
    assert_eq!(weekly["buckets"][0]["focusMinutes"], 25);
    assert_eq!(weekly["buckets"][1]["focusMinutes"], 135);

    let monthly = run_json(
        temp.path(),
        &["report", "-i", path, "--today", "2024-03-13", "--period", "month", "--last", "1", "--json"],
    );
    assert_eq!(monthly["buckets"][0]["key"], "2024-03");
    assert_eq!(monthly["buckets"][0]["focusMinutes"], 160);
}

#[test]
fn test_streak_and_goals_json() {
    let temp = TempDir::new().unwrap();
    let path = write_sessions(&temp, "sessions.json", SESSIONS);
    let path = path.to_str().unwrap();

    let streak = run_json(temp.path(), &["streak", "-i", path, "--today", "2024-03-13", "--json"]);
    assert_eq!(streak["currentStreak"], 3);
    assert_eq!(streak["longestStreak"], 3);
    assert_eq!(streak["longestStart"], "2024-03-11");

    // The day after the last session still counts toward the current streak.
    let streak = run_json(temp.path(), &["streak", "-i", path, "--today", "2024-03-14", "--json"]);
    assert_eq!(streak["currentStreak"], 3);

    let goals = run_json(temp.path(), &["goals", "-i", path, "--today", "2024-03-13", "--json"]);
    let goals = goals.as_array().unwrap();
    assert_eq!(goals[0]["period"], "daily");
    assert_eq!(goals[0]["goalValue"], 120);
    assert_eq!(goals[0]["currentValue"], 60);
    assert_eq!(goals[0]["achievementRate"], 50.0);
    assert_eq!(goals[3]["goalValue"], 20);
    assert_eq!(goals[3]["currentValue"], 4);
}

#[test]
fn test_config_file_sets_goals() {
    let temp = TempDir::new().unwrap();
    let path = write_sessions(&temp, "sessions.json", SESSIONS);
    let config = write_sessions(
        &temp,
        "fb.toml",
        &format!(
            "records_path = \"{}\"\ndaily_goal_minutes = 30\nweekly_goal_sessions = 4\n",
            path.display()
        ),
    );

    let goals = run_json(
        temp.path(),
        &["goals", "--config", config.to_str().unwrap(), "--today", "2024-03-13", "--json"],
    );
    assert_eq!(goals[0]["goalValue"], 30);
    assert_eq!(goals[0]["isAchieved"], true);
    assert_eq!(goals[3]["goalValue"], 4);
    assert_eq!(goals[3]["isAchieved"], true);
}

#[test]
fn test_dashboard_from_stdin_payload() {
    let temp = TempDir::new().unwrap();
    let payload = format!(
        r#"{{"sessions": {SESSIONS}, "goals": {{"dailyGoalMinutes": 60, "weeklyGoalSessions": 5}}}}"#
    );

    let mut child = fb_command(temp.path())
        .args(["dashboard", "--input", "-", "--today", "2024-03-13", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn fb");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(payload.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(
        output.status.success(),
        "dashboard should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let dashboard: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(dashboard["today"], "2024-03-13");
    assert_eq!(dashboard["summary"]["totalSessions"], 5);
    assert_eq!(dashboard["summary"]["activeDays"], 4);
    assert_eq!(dashboard["goals"]["dailyFocus"]["isAchieved"], true);
    assert_eq!(dashboard["goals"]["weeklySessions"]["goalValue"], 5);
    assert_eq!(dashboard["peakHour"], 9);
    assert_eq!(dashboard["busiestWeekday"], "Wed");
    assert_eq!(dashboard["heatmap"].as_array().unwrap().len(), 12);
}

#[test]
fn test_malformed_records_are_skipped() {
    let temp = TempDir::new().unwrap();
    let path = write_sessions(
        &temp,
        "sessions.jsonl",
        concat!(
            r#"{"id": 1, "completed_at": "2024-03-13T10:00:00Z", "duration_minutes": 25, "session_type": "work"}"#,
            "\n",
            "this line is not json\n",
            r#"{"id": 2, "completed_at": "not a date", "duration_minutes": 25, "session_type": "work"}"#,
            "\n",
            r#"{"id": 3, "completed_at": "2024-03-13T11:00:00Z", "duration_minutes": -5, "session_type": "work"}"#,
            "\n",
            r#"{"id": 4, "completed_at": "2024-03-13T12:00:00Z", "duration_minutes": 25, "session_type": "nap"}"#,
            "\n",
            r#"{"id": 5, "completedAt": 1710331200000, "durationMinutes": 25, "sessionType": "focus"}"#,
            "\n",
        ),
    );

    let report = run_json(
        temp.path(),
        &["report", "-i", path.to_str().unwrap(), "--today", "2024-03-13", "--last", "1", "--json"],
    );
    assert_eq!(report["totals"]["sessionCount"], 2);
    assert_eq!(report["totals"]["focusMinutes"], 50);
}

#[test]
fn test_human_heatmap_and_hours() {
    let temp = TempDir::new().unwrap();
    let path = write_sessions(&temp, "sessions.json", SESSIONS);
    let path = path.to_str().unwrap();

    let output = run_fb(
        temp.path(),
        &["heatmap", "-i", path, "--today", "2024-03-13", "--weeks", "2"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ACTIVITY (2 weeks)"), "{stdout}");
    assert!(stdout.contains("2024-03-04"), "{stdout}");
    assert!(stdout.contains("2024-03-11"), "{stdout}");

    let output = run_fb(temp.path(), &["hours", "-i", path, "--today", "2024-03-13"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Peak hour:     09:00"), "{stdout}");
}

#[test]
fn test_empty_input_reports_zeroes() {
    let temp = TempDir::new().unwrap();
    let path = write_sessions(&temp, "empty.json", "[]");

    let report = run_json(
        temp.path(),
        &["report", "-i", path.to_str().unwrap(), "--today", "2024-03-13", "--json"],
    );
    assert_eq!(report["buckets"].as_array().unwrap().len(), 7);
    assert_eq!(report["totals"]["focusMinutes"], 0);

    let streak = run_json(
        temp.path(),
        &["streak", "-i", path.to_str().unwrap(), "--today", "2024-03-13", "--json"],
    );
    assert_eq!(streak["currentStreak"], 0);
    assert_eq!(streak["longestStreak"], 0);
}

#[test]
fn test_missing_input_file_fails() {
    let temp = TempDir::new().unwrap();
    let output = fb_command(temp.path())
        .args(["report", "-i", "/nonexistent/sessions.json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load session records"));
}

#[test]
fn test_invalid_today_fails() {
    let temp = TempDir::new().unwrap();
    let path = write_sessions(&temp, "sessions.json", SESSIONS);
    let output = fb_command(temp.path())
        .args(["streak", "-i", path.to_str().unwrap(), "--today", "someday"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid date"));
}

#[test]
fn test_report_rejects_out_of_range_last() {
    let temp = TempDir::new().unwrap();
    let path = write_sessions(&temp, "sessions.json", SESSIONS);
    let output = fb_command(temp.path())
        .args(["report", "-i", path.to_str().unwrap(), "--period", "day", "--last", "4000000000"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--last"));
}
