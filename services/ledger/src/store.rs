//! Ledger Store — the append-only score ledger facade
//!
//! Owns the journal writer, an in-memory mirror of all entries, and the
//! participant directory. On open, the journal is replayed (tolerating a
//! torn tail from a crashed append) and the writer resumes after the
//! last valid sequence.
//!
//! Concurrency model: appends are serialized behind a mutex; readers
//! take a shared lock on the entry mirror and observe either the pre-
//! or post-append state, never a partial record.

use crate::directory::{DirectoryError, ParticipantDirectory};
use crate::journal::{JournalConfig, JournalError, JournalWriter, ScoreEventRecord};
use crate::reader::{CorruptionKind, JournalReader, ReaderError};
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};
use thiserror::Error;
use types::entry::{Delta, ScoreEntry};
use types::ids::{EntryId, ParticipantId};
use types::participant::Participant;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    #[error("Participant directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),

    #[error("Journal replay error: {0}")]
    Replay(#[from] ReaderError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Corrupt ledger record at seq {seq}: {detail}")]
    Corrupt { seq: u64, detail: String },

    #[error("Ledger writer lock poisoned")]
    Poisoned,
}

// ── Configuration ───────────────────────────────────────────────────

/// Configuration for opening a ledger store.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Directory holding the journal files.
    pub data_dir: PathBuf,
    /// Path to the externally managed participant directory JSON.
    pub participants_path: PathBuf,
}

impl LedgerConfig {
    /// Config with the participant directory at `<data_dir>/participants.json`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let participants_path = data_dir.join("participants.json");
        Self {
            data_dir,
            participants_path,
        }
    }
}

// ── Ledger Store ────────────────────────────────────────────────────

struct WriterState {
    journal: JournalWriter,
    /// Timestamp of the last appended entry, unix nanoseconds. New
    /// entries are clamped to this so created_at never decreases even
    /// if the wall clock steps backwards.
    last_nanos: i64,
}

/// Durable, append-only store of score entries plus participant lookup.
pub struct LedgerStore {
    directory: ParticipantDirectory,
    entries: RwLock<Vec<ScoreEntry>>,
    writer: Mutex<WriterState>,
}

impl LedgerStore {
    /// Open the store: load the participant directory, replay the
    /// journal, and position the writer after the last valid record.
    pub fn open(config: LedgerConfig) -> Result<Self, StoreError> {
        let directory = ParticipantDirectory::load(&config.participants_path)?;

        let mut reader = JournalReader::open(&config.data_dir)?;
        let records = reader.read_all_validated()?;
        for corruption in reader.corruption_log() {
            tracing::warn!(
                file = %corruption.file.display(),
                offset = corruption.offset,
                detail = %corruption.detail,
                "discarded torn journal tail during replay"
            );
            // Cut the torn tail off the active file so the resumed
            // writer appends at a record boundary. Corruption anywhere
            // but the last file has already failed the validated read.
            if corruption.kind == CorruptionKind::TruncatedRecord
                && Some(corruption.file.as_path()) == reader.last_file()
            {
                let file = fs::OpenOptions::new().write(true).open(&corruption.file)?;
                file.set_len(corruption.offset)?;
            }
        }

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let event = ScoreEventRecord::decode(&record.payload)?;
            let delta = Delta::try_new(event.delta).ok_or(StoreError::Corrupt {
                seq: record.seq,
                detail: "zero delta in journal".into(),
            })?;
            entries.push(ScoreEntry {
                id: event.id,
                seq: record.seq,
                participant_id: event.participant_id,
                delta,
                reason: event.reason,
                created_at: DateTime::from_timestamp_nanos(record.created_at_nanos),
            });
        }

        let next_seq = entries.last().map(|e| e.seq + 1).unwrap_or(1);
        let last_nanos = entries
            .last()
            .map(|e| e.created_at.timestamp_nanos_opt().unwrap_or(i64::MAX))
            .unwrap_or(0);

        let mut journal = JournalWriter::open(JournalConfig::new(&config.data_dir))?;
        journal.set_next_seq(next_seq);

        tracing::info!(
            entries = entries.len(),
            participants = directory.len(),
            next_seq,
            "ledger store opened"
        );

        Ok(Self {
            directory,
            entries: RwLock::new(entries),
            writer: Mutex::new(WriterState {
                journal,
                last_nanos,
            }),
        })
    }

    /// Append one score entry for a known participant.
    ///
    /// Assigns id, sequence, and timestamp; persists the record; then
    /// publishes it to readers. Either the whole entry is durable and
    /// visible, or nothing is.
    pub fn append(
        &self,
        participant_id: &ParticipantId,
        delta: Delta,
        reason: Option<String>,
    ) -> Result<ScoreEntry, StoreError> {
        if !self.directory.contains(participant_id) {
            return Err(StoreError::UnknownParticipant(participant_id.clone()));
        }

        let mut state = self.writer.lock().map_err(|_| StoreError::Poisoned)?;

        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        let nanos = now.max(state.last_nanos);

        let entry = ScoreEntry {
            id: EntryId::new(),
            seq: state.journal.next_seq(),
            participant_id: participant_id.clone(),
            delta,
            reason,
            created_at: DateTime::from_timestamp_nanos(nanos),
        };

        let payload = ScoreEventRecord {
            id: entry.id,
            participant_id: entry.participant_id.clone(),
            delta: entry.delta.get(),
            reason: entry.reason.clone(),
        }
        .encode()?;

        state.journal.write_event(entry.seq, nanos, payload)?;
        state.last_nanos = nanos;

        // Publish while still holding the writer lock so the mirror
        // stays ordered by sequence.
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry.clone());

        tracing::info!(
            participant_id = %entry.participant_id,
            delta = entry.delta.get(),
            seq = entry.seq,
            "score entry appended"
        );

        Ok(entry)
    }

    /// All participants, sorted by name ascending.
    pub fn participants(&self) -> Vec<Participant> {
        self.directory.list()
    }

    /// The participant directory, for name joins.
    pub fn directory(&self) -> &ParticipantDirectory {
        &self.directory
    }

    /// The most recent entries, newest first: created_at descending,
    /// ties broken by sequence descending. Never more than `limit` rows.
    pub fn list_recent(&self, limit: usize) -> Vec<ScoreEntry> {
        // The mirror is seq-ascending and created_at is non-decreasing,
        // so the reversed suffix is exactly the newest-first prefix.
        self.read_entries().iter().rev().take(limit).cloned().collect()
    }

    /// All entries, in no particular required order (the aggregator is
    /// order-independent since it sums).
    pub fn list_all(&self) -> Vec<ScoreEntry> {
        self.read_entries().clone()
    }

    /// Number of entries in the ledger.
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, Vec<ScoreEntry>> {
        // A poisoned mirror still holds only fully appended entries.
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
