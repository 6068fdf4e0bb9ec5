//! Score Ledger Store
//!
//! Durable, append-only persistence of score entries plus participant
//! lookup. Entries are written to a checksummed binary journal and
//! mirrored in memory for reads; the journal is the single source of
//! truth and is replayed on open.
//!
//! The ledger exposes no update or delete operation. That makes the
//! total-score computation a pure fold over whatever the store currently
//! returns, commutative and idempotent regardless of read timing.

pub mod journal;
pub mod reader;
pub mod directory;
pub mod store;

pub use directory::ParticipantDirectory;
pub use store::{LedgerConfig, LedgerStore, StoreError};
