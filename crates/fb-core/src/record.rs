//! Canonical in-memory session record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::session_type::SessionType;
use crate::types::RecordId;

/// One completed focus or break interval.
///
/// Records are produced by [`crate::normalize`] and never mutated afterwards.
/// Every aggregator derives its views from a slice of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Opaque identifier, unique per record.
    pub id: RecordId,

    /// When the session finished.
    pub completed_at: DateTime<Utc>,

    /// Minutes actually spent in the session. Zero is valid.
    pub duration_minutes: u32,

    pub session_type: SessionType,

    /// Informational label, not used in any computation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,
}

impl SessionRecord {
    /// When the session started, derived from completion time and duration.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.completed_at - Duration::minutes(i64::from(self.duration_minutes))
    }

    #[must_use]
    pub const fn is_work(&self) -> bool {
        self.session_type.is_work()
    }
}
