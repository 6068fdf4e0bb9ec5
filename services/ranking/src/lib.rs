//! Ranking Aggregator
//!
//! Pure, stateless derivation of the leaderboard from ledger entries.
//! The aggregator holds no state of its own: it is a total function of
//! whatever the store returns at query time, so rankings can never
//! drift from the recorded ledger. It has no failure modes.

pub mod aggregate;

pub use aggregate::{rank, totals};
