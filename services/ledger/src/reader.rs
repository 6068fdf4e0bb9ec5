//! Journal Reader — Sequential reader with corruption detection
//!
//! Features:
//! - Sequential record reading across rotated journal files
//! - CRC32C checksum validation on every read
//! - Corruption detection with byte-offset reporting
//! - Torn-tail recovery: a truncated final write is skipped and the
//!   valid prefix is returned, which is what makes a crashed append
//!   invisible to readers
//! - Gapless / monotonic sequence validation on full replay

use crate::journal::{JournalError, JournalRecord};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),

    #[error("Checksum mismatch in {file:?} at byte offset {offset}: record seq={seq}")]
    ChecksumMismatch {
        file: PathBuf,
        offset: u64,
        seq: u64,
    },

    #[error("Sequence gap: expected {expected}, got {got}")]
    SequenceGap { expected: u64, got: u64 },
}

// ── Corruption Log Entry ────────────────────────────────────────────

/// Structured corruption log entry for diagnostics and tail repair.
#[derive(Debug, Clone)]
pub struct CorruptionRecord {
    /// File in which corruption was detected.
    pub file: PathBuf,
    /// Byte offset within that file where the bad data begins. For a
    /// torn tail this is the truncation point that restores the file
    /// to its last valid record boundary.
    pub offset: u64,
    /// Type of corruption.
    pub kind: CorruptionKind,
    /// Human-readable detail message.
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CorruptionKind {
    ChecksumMismatch,
    TruncatedRecord,
}

// ── Journal Reader ──────────────────────────────────────────────────

/// Sequential journal reader with checksum validation.
pub struct JournalReader {
    /// All journal file paths, sorted by index.
    files: Vec<PathBuf>,
    /// Index of the current file being read.
    current_file_idx: usize,
    /// Raw data of the current file.
    data: Vec<u8>,
    /// Current read position within `data`.
    pos: usize,
    /// Accumulated corruption records.
    corruption_log: Vec<CorruptionRecord>,
}

impl JournalReader {
    /// Open a reader over all journal files in the given directory.
    pub fn open(dir: &Path) -> Result<Self, ReaderError> {
        let files = Self::discover_files(dir)?;
        let mut reader = Self {
            files,
            current_file_idx: 0,
            data: Vec::new(),
            pos: 0,
            corruption_log: Vec::new(),
        };
        reader.load_current_file()?;
        Ok(reader)
    }

    /// Read the next valid record, validating its checksum.
    ///
    /// Returns `None` when all records have been read. A truncated tail
    /// is logged and skipped; a checksum mismatch is an error.
    pub fn next_record(&mut self) -> Result<Option<JournalRecord>, ReaderError> {
        loop {
            if self.pos >= self.data.len() {
                if !self.advance_file()? {
                    return Ok(None); // All files exhausted
                }
            }

            let offset_before = self.pos as u64;
            match JournalRecord::from_bytes(&self.data[self.pos..]) {
                Ok((record, consumed)) => {
                    self.pos += consumed;

                    if !record.verify_checksum() {
                        self.corruption_log.push(CorruptionRecord {
                            file: self.current_file().to_path_buf(),
                            offset: offset_before,
                            kind: CorruptionKind::ChecksumMismatch,
                            detail: format!(
                                "CRC32C mismatch for seq={}, stored={:#010x}",
                                record.seq, record.checksum
                            ),
                        });
                        return Err(ReaderError::ChecksumMismatch {
                            file: self.current_file().to_path_buf(),
                            offset: offset_before,
                            seq: record.seq,
                        });
                    }

                    return Ok(Some(record));
                }
                Err(_) => {
                    // Torn write at end of file: log and move on
                    let remaining = self.data.len() - self.pos;
                    if remaining > 0 {
                        self.corruption_log.push(CorruptionRecord {
                            file: self.current_file().to_path_buf(),
                            offset: offset_before,
                            kind: CorruptionKind::TruncatedRecord,
                            detail: format!(
                                "Truncated record: {} bytes remaining, cannot parse",
                                remaining
                            ),
                        });
                    }
                    self.pos = self.data.len();
                }
            }
        }
    }

    /// Read all valid records, collecting them into a Vec.
    pub fn read_all(&mut self) -> Result<Vec<JournalRecord>, ReaderError> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Read all records, enforcing a gapless monotonic sequence.
    pub fn read_all_validated(&mut self) -> Result<Vec<JournalRecord>, ReaderError> {
        let mut records = Vec::new();
        let mut expected_seq: Option<u64> = None;

        while let Some(record) = self.next_record()? {
            if let Some(exp) = expected_seq {
                if record.seq != exp {
                    return Err(ReaderError::SequenceGap {
                        expected: exp,
                        got: record.seq,
                    });
                }
            }
            expected_seq = Some(record.seq + 1);
            records.push(record);
        }
        Ok(records)
    }

    /// Corruption records accumulated while reading.
    pub fn corruption_log(&self) -> &[CorruptionRecord] {
        &self.corruption_log
    }

    /// The last (highest-indexed) journal file, if any. Torn tails are
    /// only repairable there; corruption in earlier files is fatal.
    pub fn last_file(&self) -> Option<&Path> {
        self.files.last().map(|p| p.as_path())
    }

    // ── Internal Helpers ────────────────────────────────────────────

    fn current_file(&self) -> &Path {
        self.files
            .get(self.current_file_idx)
            .map(|p| p.as_path())
            .unwrap_or_else(|| Path::new(""))
    }

    fn discover_files(dir: &Path) -> Result<Vec<PathBuf>, ReaderError> {
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut indexed: Vec<(u64, PathBuf)> = fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                if name.starts_with("ledger-") && name.ends_with(".bin") {
                    name.trim_start_matches("ledger-")
                        .trim_end_matches(".bin")
                        .parse::<u64>()
                        .ok()
                        .map(|idx| (idx, e.path()))
                } else {
                    None
                }
            })
            .collect();
        indexed.sort_by_key(|(idx, _)| *idx);
        Ok(indexed.into_iter().map(|(_, path)| path).collect())
    }

    fn load_current_file(&mut self) -> Result<(), ReaderError> {
        self.data.clear();
        self.pos = 0;
        if let Some(path) = self.files.get(self.current_file_idx) {
            let mut file = File::open(path)?;
            file.read_to_end(&mut self.data)?;
        }
        Ok(())
    }

    fn advance_file(&mut self) -> Result<bool, ReaderError> {
        if self.current_file_idx + 1 >= self.files.len() {
            return Ok(false);
        }
        self.current_file_idx += 1;
        self.load_current_file()?;
        Ok(true)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{FlushPolicy, FsyncPolicy, JournalConfig, JournalWriter, ScoreEventRecord};
    use std::fs::OpenOptions;
    use std::io::Write;
    use tempfile::TempDir;
    use types::ids::{EntryId, ParticipantId};

    fn write_records(dir: &Path, count: u64) {
        let mut writer = JournalWriter::open(JournalConfig::new(dir)).unwrap();
        for seq in 1..=count {
            let payload = ScoreEventRecord {
                id: EntryId::new(),
                participant_id: ParticipantId::new("u1"),
                delta: seq as i64,
                reason: None,
            }
            .encode()
            .unwrap();
            writer.write_event(seq, 1_000 + seq as i64, payload).unwrap();
        }
        writer.sync().unwrap();
    }

    #[test]
    fn test_read_back_written_records() {
        let tmp = TempDir::new().unwrap();
        write_records(tmp.path(), 10);

        let mut reader = JournalReader::open(tmp.path()).unwrap();
        let records = reader.read_all().unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].seq, 1);
        assert_eq!(records[9].seq, 10);
        assert!(reader.corruption_log().is_empty());
    }

    #[test]
    fn test_empty_directory_reads_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut reader = JournalReader::open(tmp.path()).unwrap();
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_reads_across_rotated_files() {
        let tmp = TempDir::new().unwrap();
        let config = JournalConfig {
            max_file_size: 80, // force rotation
            ..JournalConfig::new(tmp.path())
        };
        let mut writer = JournalWriter::open(config).unwrap();
        for seq in 1..=30 {
            let payload = ScoreEventRecord {
                id: EntryId::new(),
                participant_id: ParticipantId::new("u1"),
                delta: 1,
                reason: None,
            }
            .encode()
            .unwrap();
            writer.write_event(seq, seq as i64, payload).unwrap();
        }
        writer.sync().unwrap();

        let mut reader = JournalReader::open(tmp.path()).unwrap();
        let records = reader.read_all_validated().unwrap();
        assert_eq!(records.len(), 30);
    }

    #[test]
    fn test_torn_tail_recovers_valid_prefix() {
        let tmp = TempDir::new().unwrap();
        write_records(tmp.path(), 5);

        // Simulate a crash mid-append: write half a record at the tail
        let path = JournalWriter::journal_path(tmp.path(), 0);
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[0x30, 0x00, 0x00, 0x00, 0xde, 0xad]).unwrap();

        let mut reader = JournalReader::open(tmp.path()).unwrap();
        let records = reader.read_all().unwrap();
        assert_eq!(records.len(), 5, "valid prefix must survive a torn tail");
        assert_eq!(reader.corruption_log().len(), 1);
        assert_eq!(
            reader.corruption_log()[0].kind,
            CorruptionKind::TruncatedRecord
        );
    }

    #[test]
    fn test_checksum_mismatch_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write_records(tmp.path(), 3);

        // Flip one payload byte inside the first record
        let path = JournalWriter::journal_path(tmp.path(), 0);
        let mut data = fs::read(&path).unwrap();
        data[25] ^= 0xff;
        fs::write(&path, &data).unwrap();

        let mut reader = JournalReader::open(tmp.path()).unwrap();
        let result = reader.read_all();
        assert!(matches!(
            result,
            Err(ReaderError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_sequence_gap_detected_on_validated_read() {
        let tmp = TempDir::new().unwrap();
        let config = JournalConfig {
            flush_policy: FlushPolicy::EveryWrite,
            fsync_policy: FsyncPolicy::EveryWrite,
            ..JournalConfig::new(tmp.path())
        };
        let mut writer = JournalWriter::open(config).unwrap();
        let payload = ScoreEventRecord {
            id: EntryId::new(),
            participant_id: ParticipantId::new("u1"),
            delta: 1,
            reason: None,
        }
        .encode()
        .unwrap();
        writer.write_event(1, 1, payload.clone()).unwrap();
        writer.set_next_seq(7); // fabricate a gap
        writer.write_event(7, 2, payload).unwrap();
        writer.sync().unwrap();

        let mut reader = JournalReader::open(tmp.path()).unwrap();
        let result = reader.read_all_validated();
        assert!(matches!(result, Err(ReaderError::SequenceGap { .. })));
    }
}
