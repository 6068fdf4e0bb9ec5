//! Participant directory entries
//!
//! Participants are provisioned externally and read-only to the ledger
//! core. The core never creates or deletes them.

use crate::ids::ParticipantId;
use serde::{Deserialize, Serialize};

/// A named participant known to the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Opaque unique identifier, stable for the participant's lifetime
    pub id: ParticipantId,
    /// Display name; uniqueness is not enforced
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Directory sort key: name ascending, id ascending for duplicate names
    pub fn sort_key(&self) -> (&str, &str) {
        (self.name.as_str(), self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_serialization() {
        let p = Participant::new("u1", "Alice");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"id":"u1","name":"Alice"}"#);

        let back: Participant = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn test_sort_key_breaks_name_ties_by_id() {
        let a = Participant::new("u2", "Alice");
        let b = Participant::new("u1", "Alice");
        assert!(b.sort_key() < a.sort_key());
    }
}
