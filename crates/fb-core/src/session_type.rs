//! Session type enum as the single source of truth for session type strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::ValidationError;

/// Kind of a completed timer interval.
///
/// Only `Work` sessions count toward focus time, session counts, streaks and
/// goals. `Break` sessions only feed break-time rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionType {
    Work,
    Break,
}

impl SessionType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Break => "break",
        }
    }

    #[must_use]
    pub const fn is_work(&self) -> bool {
        matches!(self, Self::Work)
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "focus" | "pomodoro" => Ok(Self::Work),
            "break" | "short_break" | "long_break" | "shortbreak" | "longbreak" | "rest" => {
                Ok(Self::Break)
            }
            _ => Err(ValidationError::UnknownSessionType {
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for SessionType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SessionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_variants() {
        for variant in [SessionType::Work, SessionType::Break] {
            let s = variant.to_string();
            let parsed: SessionType = s.parse().expect("should parse");
            assert_eq!(parsed, variant, "roundtrip failed for {variant:?}");
        }
    }

    #[test]
    fn wire_aliases_parse() {
        assert_eq!("focus".parse::<SessionType>().unwrap(), SessionType::Work);
        assert_eq!("WORK".parse::<SessionType>().unwrap(), SessionType::Work);
        assert_eq!(
            "short_break".parse::<SessionType>().unwrap(),
            SessionType::Break
        );
        assert_eq!(
            "longBreak".parse::<SessionType>().unwrap(),
            SessionType::Break
        );
    }

    #[test]
    fn unknown_type_errors() {
        let err = "nap".parse::<SessionType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown session type: nap");
    }

    #[test]
    fn serde_uses_canonical_names() {
        assert_eq!(
            serde_json::to_string(&SessionType::Break).unwrap(),
            "\"break\""
        );
        let parsed: SessionType = serde_json::from_str("\"pomodoro\"").unwrap();
        assert_eq!(parsed, SessionType::Work);
    }
}
