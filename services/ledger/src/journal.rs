//! Journal Writer — Append-only score event journal with checksums
//!
//! # Binary Format (per record)
//! ```text
//! [body_len: u32]
//! [seq:      u64]
//! [created_at_nanos: i64]
//! [payload_len: u32][payload: bytes]   // bincode ScoreEventRecord
//! [checksum: u32]  // CRC32C over seq + created_at_nanos + payload
//! ```

use crc32c::crc32c;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use types::ids::{EntryId, ParticipantId};

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Sequence error: expected {expected}, got {got}")]
    SequenceError { expected: u64, got: u64 },
}

// ── Payload ─────────────────────────────────────────────────────────

/// The bincode-encoded payload of one journal record.
///
/// Sequence and timestamp live in the record header; the payload carries
/// the entry fields that are opaque to the journal framing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEventRecord {
    pub id: EntryId,
    pub participant_id: ParticipantId,
    pub delta: i64,
    pub reason: Option<String>,
}

impl ScoreEventRecord {
    pub fn encode(&self) -> Result<Vec<u8>, JournalError> {
        bincode::serialize(self).map_err(|e| JournalError::Serialization(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, JournalError> {
        bincode::deserialize(bytes).map_err(|e| JournalError::Serialization(e.to_string()))
    }
}

// ── Journal Record ──────────────────────────────────────────────────

/// A single framed journal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalRecord {
    /// Gapless monotonic sequence number, assigned by the store
    pub seq: u64,
    /// Store-assigned timestamp, unix nanoseconds, non-decreasing
    pub created_at_nanos: i64,
    /// Bincode-serialized ScoreEventRecord
    pub payload: Vec<u8>,
    /// CRC32C checksum over (seq ++ created_at_nanos ++ payload)
    pub checksum: u32,
}

impl JournalRecord {
    /// Create a new record, computing the CRC32C checksum automatically.
    pub fn new(seq: u64, created_at_nanos: i64, payload: Vec<u8>) -> Self {
        let checksum = Self::compute_checksum(seq, created_at_nanos, &payload);
        Self {
            seq,
            created_at_nanos,
            payload,
            checksum,
        }
    }

    /// Compute CRC32C over the concatenation of (seq, created_at_nanos, payload).
    pub fn compute_checksum(seq: u64, created_at_nanos: i64, payload: &[u8]) -> u32 {
        let mut buf = Vec::with_capacity(8 + 8 + payload.len());
        buf.extend_from_slice(&seq.to_le_bytes());
        buf.extend_from_slice(&created_at_nanos.to_le_bytes());
        buf.extend_from_slice(payload);
        crc32c(&buf)
    }

    /// Validate the stored checksum against recomputed value.
    pub fn verify_checksum(&self) -> bool {
        let expected = Self::compute_checksum(self.seq, self.created_at_nanos, &self.payload);
        self.checksum == expected
    }

    /// Serialize record to the binary wire format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let payload_len = self.payload.len() as u32;

        // body_len = 8 (seq) + 8 (ts) + 4 (pl_len) + pl_bytes + 4 (crc)
        let body_len: u32 = 8 + 8 + 4 + payload_len + 4;

        let mut buf = Vec::with_capacity(4 + body_len as usize);
        buf.extend_from_slice(&body_len.to_le_bytes());
        buf.extend_from_slice(&self.seq.to_le_bytes());
        buf.extend_from_slice(&self.created_at_nanos.to_le_bytes());
        buf.extend_from_slice(&payload_len.to_le_bytes());
        buf.extend_from_slice(&self.payload);
        buf.extend_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Deserialize record from the binary wire format.
    ///
    /// Returns `(record, bytes_consumed)` on success. Corrupted or
    /// truncated data yields an error instead of panicking.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), JournalError> {
        if data.len() < 4 {
            return Err(JournalError::Serialization(
                "Not enough data for length prefix".into(),
            ));
        }

        let body_len = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        // Reject implausible lengths: a score event payload is tiny
        if body_len > 1_000_000 {
            return Err(JournalError::Serialization(format!(
                "Implausible body length: {} (likely corruption)",
                body_len
            )));
        }

        let total = 4 + body_len;

        if data.len() < total {
            return Err(JournalError::Serialization(format!(
                "Incomplete record: need {} bytes, have {}",
                total,
                data.len()
            )));
        }

        // Minimum body size: 8 (seq) + 8 (ts) + 4 (pl_len) + 0 (pl) + 4 (crc) = 24
        if body_len < 24 {
            return Err(JournalError::Serialization(format!(
                "Body too small: {} bytes, minimum is 24",
                body_len
            )));
        }

        let body = &data[4..total];
        let mut pos: usize = 0;

        let seq = u64::from_le_bytes(body[pos..pos + 8].try_into().unwrap());
        pos += 8;

        let created_at_nanos = i64::from_le_bytes(body[pos..pos + 8].try_into().unwrap());
        pos += 8;

        let payload_len = u32::from_le_bytes(body[pos..pos + 4].try_into().unwrap()) as usize;
        pos += 4;

        if pos + payload_len + 4 != body.len() {
            return Err(JournalError::Serialization(format!(
                "payload_len {} inconsistent with body length {}",
                payload_len,
                body.len()
            )));
        }
        let payload = body[pos..pos + payload_len].to_vec();
        pos += payload_len;

        let checksum = u32::from_le_bytes(body[pos..pos + 4].try_into().unwrap());

        let record = Self {
            seq,
            created_at_nanos,
            payload,
            checksum,
        };

        Ok((record, total))
    }
}

// ── Flush / Fsync Policies ──────────────────────────────────────────

/// Controls when buffered data is flushed to OS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlushPolicy {
    /// Flush after every write.
    EveryWrite,
    /// Flush every N writes.
    EveryN(usize),
}

/// Controls when `fsync` (durable write) is called.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FsyncPolicy {
    /// Fsync after every write.
    EveryWrite,
    /// Fsync every N writes.
    EveryN(usize),
    /// Fsync only on file rotation.
    OnRotation,
}

// ── Journal Writer Configuration ────────────────────────────────────

/// Configuration for the journal writer.
#[derive(Debug, Clone)]
pub struct JournalConfig {
    /// Directory for journal files.
    pub dir: PathBuf,
    /// Maximum file size in bytes before rotation (default 16 MiB).
    pub max_file_size: u64,
    /// Flush policy.
    pub flush_policy: FlushPolicy,
    /// Fsync policy.
    pub fsync_policy: FsyncPolicy,
}

impl JournalConfig {
    /// Create a config with durable defaults: a lost score submission is
    /// worse than the fsync cost at this write rate.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_file_size: 16 * 1024 * 1024, // 16 MiB
            flush_policy: FlushPolicy::EveryWrite,
            fsync_policy: FsyncPolicy::EveryWrite,
        }
    }
}

// ── Journal Writer ──────────────────────────────────────────────────

/// Append-only journal writer with checksums, rotation, and fsync control.
pub struct JournalWriter {
    config: JournalConfig,
    writer: BufWriter<File>,
    current_file: PathBuf,
    current_file_size: u64,
    next_seq: u64,
    writes_since_flush: usize,
    writes_since_fsync: usize,
    file_index: u64,
}

impl JournalWriter {
    /// Open a new journal writer, creating the directory if needed.
    ///
    /// Resumes appending to the highest-indexed existing file.
    pub fn open(config: JournalConfig) -> Result<Self, JournalError> {
        fs::create_dir_all(&config.dir)?;

        let file_index = Self::find_latest_index(&config.dir);
        let current_file = Self::journal_path(&config.dir, file_index);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&current_file)?;

        let current_file_size = file.metadata()?.len();

        Ok(Self {
            config,
            writer: BufWriter::new(file),
            current_file,
            current_file_size,
            next_seq: 1, // Overridden by the store after replay
            writes_since_flush: 0,
            writes_since_fsync: 0,
            file_index,
        })
    }

    /// Set the next expected sequence number (used after replay).
    pub fn set_next_seq(&mut self, seq: u64) {
        self.next_seq = seq;
    }

    /// Get the next expected sequence number.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Get the current file path.
    pub fn current_file_path(&self) -> &Path {
        &self.current_file
    }

    /// Append a journal record. Validates sequence monotonicity.
    pub fn append(&mut self, record: &JournalRecord) -> Result<(), JournalError> {
        if record.seq != self.next_seq {
            return Err(JournalError::SequenceError {
                expected: self.next_seq,
                got: record.seq,
            });
        }

        if self.current_file_size >= self.config.max_file_size {
            self.rotate()?;
        }

        let bytes = record.to_bytes();
        self.writer.write_all(&bytes)?;

        self.current_file_size += bytes.len() as u64;
        self.next_seq = record.seq + 1;
        self.writes_since_flush += 1;
        self.writes_since_fsync += 1;

        self.apply_flush_policy()?;
        self.apply_fsync_policy()?;

        Ok(())
    }

    /// Frame a payload into a record and append it in one call.
    pub fn write_event(
        &mut self,
        seq: u64,
        created_at_nanos: i64,
        payload: Vec<u8>,
    ) -> Result<JournalRecord, JournalError> {
        let record = JournalRecord::new(seq, created_at_nanos, payload);
        self.append(&record)?;
        Ok(record)
    }

    /// Force flush + fsync (used before shutdown / rotation).
    pub fn sync(&mut self) -> Result<(), JournalError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        self.writes_since_flush = 0;
        self.writes_since_fsync = 0;
        Ok(())
    }

    // ── Internal Helpers ────────────────────────────────────────────

    fn apply_flush_policy(&mut self) -> Result<(), JournalError> {
        let should_flush = match self.config.flush_policy {
            FlushPolicy::EveryWrite => true,
            FlushPolicy::EveryN(n) => self.writes_since_flush >= n,
        };
        if should_flush {
            self.writer.flush()?;
            self.writes_since_flush = 0;
        }
        Ok(())
    }

    fn apply_fsync_policy(&mut self) -> Result<(), JournalError> {
        let should_fsync = match self.config.fsync_policy {
            FsyncPolicy::EveryWrite => true,
            FsyncPolicy::EveryN(n) => self.writes_since_fsync >= n,
            FsyncPolicy::OnRotation => false,
        };
        if should_fsync {
            self.writer.get_ref().sync_all()?;
            self.writes_since_fsync = 0;
        }
        Ok(())
    }

    fn rotate(&mut self) -> Result<(), JournalError> {
        // Fsync current file before rotating
        self.sync()?;

        self.file_index += 1;
        self.current_file = Self::journal_path(&self.config.dir, self.file_index);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.current_file)?;

        self.writer = BufWriter::new(file);
        self.current_file_size = 0;
        Ok(())
    }

    pub(crate) fn journal_path(dir: &Path, index: u64) -> PathBuf {
        dir.join(format!("ledger-{:06}.bin", index))
    }

    pub(crate) fn find_latest_index(dir: &Path) -> u64 {
        fs::read_dir(dir)
            .ok()
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter_map(|e| {
                        let name = e.file_name().to_string_lossy().to_string();
                        if name.starts_with("ledger-") && name.ends_with(".bin") {
                            name.trim_start_matches("ledger-")
                                .trim_end_matches(".bin")
                                .parse::<u64>()
                                .ok()
                        } else {
                            None
                        }
                    })
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
