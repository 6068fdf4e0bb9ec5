//! Participant Directory — externally provisioned participant lookup
//!
//! Participants are managed outside the ledger core: the directory is a
//! JSON array of `{id, name}` objects loaded once at store open. The
//! core only ever reads it; there is no create, update, or delete here.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use types::ids::ParticipantId;
use types::participant::Participant;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("IO error reading participant directory: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid participant directory: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate participant id: {0}")]
    DuplicateId(ParticipantId),
}

#[derive(Debug, Deserialize)]
struct RawParticipant {
    id: ParticipantId,
    name: String,
}

/// In-memory index of all known participants.
pub struct ParticipantDirectory {
    by_id: HashMap<ParticipantId, Participant>,
}

impl ParticipantDirectory {
    /// Load the directory from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let data = fs::read_to_string(path)?;
        let raw: Vec<RawParticipant> = serde_json::from_str(&data)?;
        Self::from_participants(
            raw.into_iter()
                .map(|r| Participant::new(r.id, r.name))
                .collect(),
        )
    }

    /// Build a directory from already-parsed participants.
    pub fn from_participants(
        participants: Vec<Participant>,
    ) -> Result<Self, DirectoryError> {
        let mut by_id = HashMap::with_capacity(participants.len());
        for p in participants {
            if by_id.contains_key(&p.id) {
                return Err(DirectoryError::DuplicateId(p.id));
            }
            by_id.insert(p.id.clone(), p);
        }
        Ok(Self { by_id })
    }

    /// Look up a participant by id.
    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.by_id.get(id)
    }

    /// True if the id resolves to a known participant.
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.by_id.contains_key(id)
    }

    /// All participants, sorted by name ascending (id ascending on ties).
    pub fn list(&self) -> Vec<Participant> {
        let mut all: Vec<Participant> = self.by_id.values().cloned().collect();
        all.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        all
    }

    /// Number of known participants.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ParticipantDirectory {
        ParticipantDirectory::from_participants(vec![
            Participant::new("u2", "Bob"),
            Participant::new("u1", "Alice"),
            Participant::new("u3", "Carol"),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_by_id() {
        let dir = sample();
        assert_eq!(dir.get(&ParticipantId::new("u1")).unwrap().name, "Alice");
        assert!(dir.get(&ParticipantId::new("u9")).is_none());
    }

    #[test]
    fn test_list_sorted_by_name() {
        let dir = sample();
        let names: Vec<_> = dir.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_duplicate_names_tie_break_by_id() {
        let dir = ParticipantDirectory::from_participants(vec![
            Participant::new("u2", "Alice"),
            Participant::new("u1", "Alice"),
        ])
        .unwrap();
        let ids: Vec<_> = dir
            .list()
            .into_iter()
            .map(|p| p.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["u1", "u2"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = ParticipantDirectory::from_participants(vec![
            Participant::new("u1", "Alice"),
            Participant::new("u1", "Alias"),
        ]);
        assert!(matches!(result, Err(DirectoryError::DuplicateId(_))));
    }

    #[test]
    fn test_load_from_json_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("participants.json");
        fs::write(
            &path,
            r#"[{"id":"u1","name":"Alice"},{"id":"u2","name":"Bob"}]"#,
        )
        .unwrap();

        let dir = ParticipantDirectory::load(&path).unwrap();
        assert_eq!(dir.len(), 2);
        assert!(dir.contains(&ParticipantId::new("u2")));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("participants.json");
        fs::write(&path, r#"{"not": "an array"}"#).unwrap();

        assert!(matches!(
            ParticipantDirectory::load(&path),
            Err(DirectoryError::Parse(_))
        ));
    }
}
