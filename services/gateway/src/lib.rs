//! Ledger API Gateway
//!
//! The HTTP/JSON boundary between UI clients and the ledger core. Two
//! clients consume it: an admin page that appends signed deltas, and a
//! public ranking page that reads the leaderboard and history. All
//! validation happens here, before any store call.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
