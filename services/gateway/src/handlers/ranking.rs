use crate::error::AppError;
use crate::models::{HistoryRow, RankingResponse};
use crate::state::AppState;
use axum::{Json, extract::State};
use ranking::rank;

/// `GET /ranking` — the two-panel view: leaderboard rows plus the full
/// history, both recomputed from the ledger on every query.
pub async fn get_ranking(
    State(state): State<AppState>,
) -> Result<Json<RankingResponse>, AppError> {
    let entries = state.store.list_all();
    let participants = state.store.participants();

    let rows = rank(&entries, &participants);

    let directory = state.store.directory();
    let history = state
        .store
        .list_recent(usize::MAX)
        .into_iter()
        .map(|entry| HistoryRow::join(entry, directory))
        .collect();

    Ok(Json(RankingResponse { rows, history }))
}
