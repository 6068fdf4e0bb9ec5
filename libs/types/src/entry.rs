//! Score ledger entries and signed deltas
//!
//! A `ScoreEntry` is the immutable ledger record: one signed point
//! adjustment for one participant. Entries are created exactly once by
//! the store's append operation and never updated or deleted.

use crate::ids::{EntryId, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-zero signed point adjustment
///
/// Zero deltas carry no information and are unrepresentable: both the
/// constructor and deserialization reject them. On the wire a delta is
/// a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Delta(i64);

impl Delta {
    /// Try to create a Delta, returning None for zero
    pub fn try_new(value: i64) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Get the signed point value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Delta {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value).ok_or_else(|| "delta must be non-zero".to_string())
    }
}

impl From<Delta> for i64 {
    fn from(delta: Delta) -> i64 {
        delta.0
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// An immutable ledger record: one delta applied to one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Unique identifier, assigned at append time, never reused
    pub id: EntryId,
    /// Journal sequence: gapless, monotonic, the insertion-order key
    pub seq: u64,
    /// Owning participant; resolved against the directory at write time
    pub participant_id: ParticipantId,
    /// Signed, non-zero point adjustment
    pub delta: Delta,
    /// Optional free-text annotation, ignored by aggregation
    pub reason: Option<String>,
    /// Store-assigned timestamp, non-decreasing in insertion order
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_delta_rejects_zero() {
        assert!(Delta::try_new(0).is_none());
        assert!(Delta::try_new(1).is_some());
        assert!(Delta::try_new(-1).is_some());
    }

    #[test]
    fn test_delta_display_sign() {
        assert_eq!(Delta::try_new(100).unwrap().to_string(), "+100");
        assert_eq!(Delta::try_new(-50).unwrap().to_string(), "-50");
    }

    #[test]
    fn test_delta_serializes_as_bare_integer() {
        let d = Delta::try_new(-50).unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "-50");

        let back: Delta = serde_json::from_str("-50").unwrap();
        assert_eq!(d, back);
    }

    #[test]
    fn test_delta_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Delta>("0").is_err());
    }

    #[test]
    fn test_score_entry_serialization_roundtrip() {
        let entry = ScoreEntry {
            id: EntryId::new(),
            seq: 7,
            participant_id: ParticipantId::new("u1"),
            delta: Delta::try_new(100).unwrap(),
            reason: Some("quiz".into()),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: ScoreEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }

    proptest! {
        #[test]
        fn prop_delta_roundtrips_every_nonzero_value(v in prop::num::i64::ANY) {
            prop_assume!(v != 0);
            let d = Delta::try_new(v).unwrap();
            prop_assert_eq!(d.get(), v);
            let json = serde_json::to_string(&d).unwrap();
            let back: Delta = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(d, back);
        }
    }
}
