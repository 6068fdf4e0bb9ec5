//! Derived ranking rows
//!
//! A `RankingRow` is never persisted; it is recomputed from the ledger
//! on every query so it cannot drift from the recorded entries.

use crate::ids::ParticipantId;
use serde::{Deserialize, Serialize};

/// One row of the derived leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRow {
    pub participant_id: ParticipantId,
    pub name: String,
    /// Sum of all deltas recorded for this participant
    pub total_score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_row_serialization() {
        let row = RankingRow {
            participant_id: ParticipantId::new("u1"),
            name: "Alice".into(),
            total_score: 120,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"participant_id":"u1","name":"Alice","total_score":120}"#
        );
    }
}
