//! Wire record normalization.
//!
//! The stats backend has shipped session records in more than one shape:
//! snake_case rows straight from storage and camelCase objects from the
//! client-side cache. Both are accepted here and turned into one canonical
//! [`SessionRecord`]. Unknown fields are ignored.

use chrono::{DateTime, NaiveDateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::SessionRecord;
use crate::session_type::SessionType;
use crate::types::RecordId;

/// Epoch values at or above this are treated as milliseconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Naive timestamp layouts accepted after RFC 3339 fails. Interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MalformedRecordError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },
    #[error("invalid duration: {value} minutes")]
    InvalidDuration { value: f64 },
    #[error("unknown session type: {value}")]
    UnknownSessionType { value: String },
}

/// Identifier as sent by the backend: either a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

/// Timestamp as sent by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    /// Unix epoch, seconds or milliseconds.
    Epoch(i64),
    /// RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS` in UTC.
    Text(String),
}

/// A session record in any of the shapes the backend produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireSessionRecord {
    #[serde(default, alias = "session_id", alias = "sessionId")]
    pub id: Option<WireId>,

    #[serde(
        default,
        alias = "completedAt",
        alias = "ended_at",
        alias = "endedAt"
    )]
    pub completed_at: Option<WireTimestamp>,

    #[serde(default, alias = "durationMinutes", alias = "duration")]
    pub duration_minutes: Option<f64>,

    #[serde(default, alias = "sessionType", alias = "type")]
    pub session_type: Option<String>,

    #[serde(default, alias = "roomName")]
    pub room_name: Option<String>,
}

/// A record that failed normalization, with its position in the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub index: usize,
    pub error: MalformedRecordError,
}

/// Outcome of normalizing a whole batch.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Records that normalized cleanly, in input order.
    pub records: Vec<SessionRecord>,
    pub rejected: Vec<RejectedRecord>,
}

/// Normalize a single wire record.
pub fn normalize(raw: &WireSessionRecord) -> Result<SessionRecord, MalformedRecordError> {
    let completed_at = raw
        .completed_at
        .as_ref()
        .ok_or(MalformedRecordError::MissingField {
            field: "completed_at",
        })
        .and_then(parse_timestamp)?;

    let duration_minutes = raw
        .duration_minutes
        .ok_or(MalformedRecordError::MissingField {
            field: "duration_minutes",
        })
        .and_then(parse_duration)?;

    let session_type = match raw.session_type.as_deref().map(str::trim) {
        None | Some("") => {
            return Err(MalformedRecordError::MissingField {
                field: "session_type",
            });
        }
        Some(value) => value
            .parse::<SessionType>()
            .map_err(|_| MalformedRecordError::UnknownSessionType {
                value: value.to_string(),
            })?,
    };

    let id = raw
        .id
        .as_ref()
        .and_then(|id| match id {
            WireId::Number(n) => RecordId::new(n.to_string()).ok(),
            WireId::Text(s) => RecordId::new(s.trim()).ok(),
        })
        .map_or_else(|| synthesize_id(completed_at, session_type), Ok)?;

    let room_name = raw
        .room_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from);

    Ok(SessionRecord {
        id,
        completed_at,
        duration_minutes,
        session_type,
        room_name,
    })
}

/// Normalize a batch, dropping malformed records.
///
/// Each dropped record is logged at `warn`. Use [`normalize_batch`] when the
/// caller needs the rejections too.
pub fn normalize_all(raw: &[WireSessionRecord]) -> Vec<SessionRecord> {
    normalize_batch(raw).records
}

/// Normalize a batch, keeping both the good records and the rejections.
pub fn normalize_batch(raw: &[WireSessionRecord]) -> NormalizedBatch {
    let results: Vec<Result<SessionRecord, MalformedRecordError>> =
        raw.par_iter().map(normalize).collect();

    let mut batch = NormalizedBatch::default();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(record) => batch.records.push(record),
            Err(error) => {
                tracing::warn!(index, error = %error, "skipping malformed session record");
                batch.rejected.push(RejectedRecord { index, error });
            }
        }
    }

    tracing::debug!(
        kept = batch.records.len(),
        rejected = batch.rejected.len(),
        "normalized session records"
    );
    batch
}

fn parse_timestamp(raw: &WireTimestamp) -> Result<DateTime<Utc>, MalformedRecordError> {
    match raw {
        WireTimestamp::Epoch(value) => {
            let parsed = if value.abs() >= EPOCH_MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(*value)
            } else {
                DateTime::from_timestamp(*value, 0)
            };
            parsed.ok_or_else(|| MalformedRecordError::InvalidTimestamp {
                value: value.to_string(),
            })
        }
        WireTimestamp::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(MalformedRecordError::MissingField {
                    field: "completed_at",
                });
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                return Ok(dt.with_timezone(&Utc));
            }
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|naive| naive.and_utc())
                .ok_or_else(|| MalformedRecordError::InvalidTimestamp {
                    value: text.to_string(),
                })
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_duration(value: f64) -> Result<u32, MalformedRecordError> {
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(MalformedRecordError::InvalidDuration { value });
    }
    Ok(value.round() as u32)
}

/// Builds a stable ID for records the backend sent without one.
fn synthesize_id(
    completed_at: DateTime<Utc>,
    session_type: SessionType,
) -> Result<RecordId, MalformedRecordError> {
    RecordId::new(format!(
        "{}-{}",
        session_type,
        completed_at.timestamp_millis()
    ))
    .map_err(|_| MalformedRecordError::MissingField { field: "id" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn wire(json: &str) -> WireSessionRecord {
        serde_json::from_str(json).expect("valid wire json")
    }

    #[test]
    fn normalizes_snake_case_record() {
        let raw = wire(
            r#"{
                "id": 17,
                "completed_at": "2024-01-01T09:25:00Z",
                "duration_minutes": 25,
                "session_type": "work",
                "room_name": "Library"
            }"#,
        );

        let record = normalize(&raw).unwrap();
        assert_eq!(record.id.as_str(), "17");
        assert_eq!(
            record.completed_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 25, 0).unwrap()
        );
        assert_eq!(record.duration_minutes, 25);
        assert_eq!(record.session_type, SessionType::Work);
        assert_eq!(record.room_name.as_deref(), Some("Library"));
    }

    #[test]
    fn normalizes_camel_case_record_with_offset() {
        let raw = wire(
            r#"{
                "id": "abc",
                "completedAt": "2024-01-01T18:00:00+09:00",
                "durationMinutes": 5,
                "sessionType": "break"
            }"#,
        );

        let record = normalize(&raw).unwrap();
        assert_eq!(
            record.completed_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
        );
        assert_eq!(record.session_type, SessionType::Break);
        assert_eq!(record.room_name, None);
    }

    #[test]
    fn null_and_blank_room_name_become_absent() {
        let null_room = wire(
            r#"{"id": 1, "completed_at": 1704101100, "duration_minutes": 25,
                "session_type": "work", "room_name": null}"#,
        );
        let blank_room = wire(
            r#"{"id": 2, "completed_at": 1704101100, "duration_minutes": 25,
                "session_type": "work", "roomName": "  "}"#,
        );

        assert_eq!(normalize(&null_room).unwrap().room_name, None);
        assert_eq!(normalize(&blank_room).unwrap().room_name, None);
    }

    #[test]
    fn accepts_epoch_seconds_and_millis() {
        let secs = wire(
            r#"{"id": 1, "completed_at": 1704067200, "duration_minutes": 1, "session_type": "work"}"#,
        );
        let millis = wire(
            r#"{"id": 2, "completed_at": 1704067200000, "duration_minutes": 1, "session_type": "work"}"#,
        );
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(normalize(&secs).unwrap().completed_at, expected);
        assert_eq!(normalize(&millis).unwrap().completed_at, expected);
    }

    #[test]
    fn accepts_naive_timestamps_as_utc() {
        let raw = wire(
            r#"{"id": 1, "completed_at": "2024-03-05 14:30:00", "duration_minutes": 25, "session_type": "focus"}"#,
        );
        assert_eq!(
            normalize(&raw).unwrap().completed_at,
            Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn ignores_unknown_fields() {
        let raw = wire(
            r#"{"id": 1, "completed_at": "2024-01-01T00:00:00Z", "duration_minutes": 25,
                "session_type": "work", "user_id": 99, "extra": {"nested": true}}"#,
        );
        assert!(normalize(&raw).is_ok());
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let no_time = wire(r#"{"id": 1, "duration_minutes": 25, "session_type": "work"}"#);
        let no_duration =
            wire(r#"{"id": 1, "completed_at": "2024-01-01T00:00:00Z", "session_type": "work"}"#);
        let no_type =
            wire(r#"{"id": 1, "completed_at": "2024-01-01T00:00:00Z", "duration_minutes": 3}"#);

        assert_eq!(
            normalize(&no_time).unwrap_err(),
            MalformedRecordError::MissingField {
                field: "completed_at"
            }
        );
        assert_eq!(
            normalize(&no_duration).unwrap_err(),
            MalformedRecordError::MissingField {
                field: "duration_minutes"
            }
        );
        assert_eq!(
            normalize(&no_type).unwrap_err(),
            MalformedRecordError::MissingField {
                field: "session_type"
            }
        );
    }

    #[test]
    fn rejects_negative_duration_and_bad_timestamp() {
        let negative = wire(
            r#"{"id": 1, "completed_at": "2024-01-01T00:00:00Z", "duration_minutes": -5, "session_type": "work"}"#,
        );
        let garbage = wire(
            r#"{"id": 1, "completed_at": "yesterday", "duration_minutes": 5, "session_type": "work"}"#,
        );

        assert!(matches!(
            normalize(&negative).unwrap_err(),
            MalformedRecordError::InvalidDuration { .. }
        ));
        assert!(matches!(
            normalize(&garbage).unwrap_err(),
            MalformedRecordError::InvalidTimestamp { .. }
        ));
    }

    #[test]
    fn missing_id_is_synthesized() {
        let raw = wire(
            r#"{"completed_at": "2024-01-01T00:00:00Z", "duration_minutes": 25, "session_type": "work"}"#,
        );
        let record = normalize(&raw).unwrap();
        assert_eq!(record.id.as_str(), "work-1704067200000");
    }

    #[test]
    fn fractional_minutes_round() {
        let raw = wire(
            r#"{"id": 1, "completed_at": "2024-01-01T00:00:00Z", "duration_minutes": 24.6, "session_type": "work"}"#,
        );
        assert_eq!(normalize(&raw).unwrap().duration_minutes, 25);
    }

    #[test]
    fn batch_keeps_good_records_and_reports_bad_ones() {
        let raw = vec![
            wire(
                r#"{"id": 1, "completed_at": "2024-01-01T00:00:00Z", "duration_minutes": 25, "session_type": "work"}"#,
            ),
            wire(r#"{"id": 2, "duration_minutes": 25, "session_type": "work"}"#),
            wire(
                r#"{"id": 3, "completed_at": "2024-01-02T00:00:00Z", "duration_minutes": 5, "session_type": "break"}"#,
            ),
        ];

        let batch = normalize_batch(&raw);
        let ids: Vec<&str> = batch.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].index, 1);

        assert_eq!(normalize_all(&raw).len(), 2);
    }

    #[test]
    fn empty_batch_is_empty() {
        let batch = normalize_batch(&[]);
        assert!(batch.records.is_empty());
        assert!(batch.rejected.is_empty());
    }
}
