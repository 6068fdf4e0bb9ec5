//! Types library for the score ledger
//!
//! This library provides the core type definitions shared by the ledger
//! store, the ranking aggregator, and the HTTP gateway.
//!
//! # Modules
//! - `ids`: Unique identifiers (ParticipantId, EntryId)
//! - `participant`: Participant directory entries
//! - `entry`: Score ledger entries and signed deltas
//! - `ranking`: Derived ranking rows

// Public modules
pub mod ids;
pub mod participant;
pub mod entry;
pub mod ranking;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::participant::*;
    pub use crate::entry::*;
    pub use crate::ranking::*;
}
