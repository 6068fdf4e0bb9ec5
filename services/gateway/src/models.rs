use chrono::{DateTime, Utc};
use ledger::ParticipantDirectory;
use serde::{Deserialize, Serialize};
use types::entry::{Delta, ScoreEntry};
use types::ids::{EntryId, ParticipantId};
use types::ranking::RankingRow;

/// Body of `POST /scoreEntries`.
///
/// Fields are optional at the wire level so that missing values produce
/// the contract's 400 instead of a generic deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct AppendEntryRequest {
    pub participant_id: Option<String>,
    pub delta: Option<i64>,
    pub reason: Option<String>,
}

/// The persisted entry, echoed back on a successful append.
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub id: EntryId,
    pub participant_id: ParticipantId,
    pub delta: Delta,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ScoreEntry> for EntryResponse {
    fn from(entry: ScoreEntry) -> Self {
        Self {
            id: entry.id,
            participant_id: entry.participant_id,
            delta: entry.delta,
            reason: entry.reason,
            created_at: entry.created_at,
        }
    }
}

/// One history row, joined with the owning participant's name for display.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
    pub id: EntryId,
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub delta: Delta,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HistoryRow {
    /// Join an entry with its participant's display name. Falls back to
    /// the raw id if the directory no longer knows the participant.
    pub fn join(entry: ScoreEntry, directory: &ParticipantDirectory) -> Self {
        let participant_name = directory
            .get(&entry.participant_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| entry.participant_id.as_str().to_string());
        Self {
            id: entry.id,
            participant_id: entry.participant_id,
            participant_name,
            delta: entry.delta,
            reason: entry.reason,
            created_at: entry.created_at,
        }
    }
}

/// Response of `GET /ranking`: the two-panel view (leaderboard + history).
#[derive(Debug, Clone, Serialize)]
pub struct RankingResponse {
    pub rows: Vec<RankingRow>,
    pub history: Vec<HistoryRow>,
}

/// Query string of `GET /scoreEntries`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}
