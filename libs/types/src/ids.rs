//! Unique identifier types for ledger entities
//!
//! Entry ids use UUID v7 for time-sortable ordering; participant ids are
//! opaque strings assigned by the external provisioning process.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a ledger entry
///
/// Uses UUID v7 so that ids sort roughly in creation order. The
/// authoritative ordering key for history queries is still the journal
/// sequence, not the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Create a new EntryId with current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for a participant
///
/// Assigned by the out-of-scope provisioning process and stable for the
/// participant's lifetime. Must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a new ParticipantId from a string
    ///
    /// # Panics
    /// Panics if the id is empty
    pub fn new(id: impl Into<String>) -> Self {
        let s = id.into();
        assert!(!s.is_empty(), "ParticipantId must be non-empty");
        Self(s)
    }

    /// Try to create a ParticipantId, returning None if empty
    pub fn try_new(id: impl Into<String>) -> Option<Self> {
        let s = id.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Get the id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_creation() {
        let id1 = EntryId::new();
        let id2 = EntryId::new();
        assert_ne!(id1, id2, "EntryIds should be unique");
    }

    #[test]
    fn test_entry_id_serialization() {
        let id = EntryId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_participant_id_creation() {
        let id = ParticipantId::new("u1");
        assert_eq!(id.as_str(), "u1");
    }

    #[test]
    fn test_participant_id_try_new() {
        assert!(ParticipantId::try_new("u1").is_some());
        assert!(ParticipantId::try_new("").is_none());
    }

    #[test]
    #[should_panic(expected = "ParticipantId must be non-empty")]
    fn test_participant_id_empty() {
        ParticipantId::new("");
    }

    #[test]
    fn test_participant_id_serialization() {
        let id = ParticipantId::new("u42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"u42\"");

        let deserialized: ParticipantId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_participant_id_ordering() {
        let a = ParticipantId::new("u1");
        let b = ParticipantId::new("u2");
        assert!(a < b);
    }
}
