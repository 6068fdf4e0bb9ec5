//! Total-score and ranking computation
//!
//! `total_score(p) = Σ delta` over all entries for `p`. Summation is
//! commutative, so the result is independent of entry order and of any
//! read/write interleaving at the store.

use std::collections::HashMap;
use types::entry::ScoreEntry;
use types::ids::ParticipantId;
use types::participant::Participant;
use types::ranking::RankingRow;

/// Sum deltas per participant.
///
/// Participants with no entries do not appear in the result; the
/// leaderboard only lists participants with recorded activity.
/// Saturating addition keeps the fold total even at the i64 extremes.
pub fn totals(entries: &[ScoreEntry]) -> HashMap<ParticipantId, i64> {
    let mut sums: HashMap<ParticipantId, i64> = HashMap::new();
    for entry in entries {
        let sum = sums.entry(entry.participant_id.clone()).or_insert(0);
        *sum = sum.saturating_add(entry.delta.get());
    }
    sums
}

/// Derive the ranked leaderboard from ledger entries.
///
/// Rows are sorted by total score descending; ties break by name
/// ascending, then participant id ascending, so repeated queries over
/// the same ledger always produce the same order. Rank is the 1-based
/// position in the returned Vec.
///
/// An entry whose participant is missing from `participants` (which the
/// store's write-time check prevents) falls back to the raw id as its
/// display name rather than failing: this stays a total function.
pub fn rank(entries: &[ScoreEntry], participants: &[Participant]) -> Vec<RankingRow> {
    let names: HashMap<&ParticipantId, &str> = participants
        .iter()
        .map(|p| (&p.id, p.name.as_str()))
        .collect();

    let mut rows: Vec<RankingRow> = totals(entries)
        .into_iter()
        .map(|(participant_id, total_score)| {
            let name = names
                .get(&participant_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| participant_id.as_str().to_string());
            RankingRow {
                participant_id,
                name,
                total_score,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });
    rows
}
