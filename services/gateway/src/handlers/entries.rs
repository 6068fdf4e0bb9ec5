use crate::error::AppError;
use crate::models::{AppendEntryRequest, EntryResponse, HistoryRow, RecentQuery};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use types::entry::Delta;
use types::ids::ParticipantId;

/// Default page size for the recent-history view.
const DEFAULT_HISTORY_LIMIT: usize = 50;
/// Hard cap so a single query cannot ask for the whole ledger here;
/// the full history lives on `GET /ranking`.
const MAX_HISTORY_LIMIT: usize = 1000;

/// `POST /scoreEntries` — validate and append one signed delta.
///
/// Validation runs before any store call: a rejected request has no
/// partial effect. The atomicity boundary is the single append.
pub async fn append_entry(
    State(state): State<AppState>,
    Json(payload): Json<AppendEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), AppError> {
    let participant_id = payload
        .participant_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("participant_id is required".into()))?;

    let raw_delta = payload
        .delta
        .ok_or_else(|| AppError::BadRequest("delta is required".into()))?;
    let delta = Delta::try_new(raw_delta)
        .ok_or_else(|| AppError::BadRequest("delta must be a non-zero integer".into()))?;

    // An empty reason carries no information; store it as absent
    let reason = payload.reason.filter(|r| !r.trim().is_empty());

    let entry = state
        .store
        .append(&ParticipantId::new(participant_id), delta, reason)?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// `GET /scoreEntries?limit=N` — most recent entries, newest first,
/// each joined with the owning participant's name.
pub async fn list_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<HistoryRow>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if limit == 0 {
        return Err(AppError::BadRequest("limit must be positive".into()));
    }
    let limit = limit.min(MAX_HISTORY_LIMIT);

    let directory = state.store.directory();
    let rows = state
        .store
        .list_recent(limit)
        .into_iter()
        .map(|entry| HistoryRow::join(entry, directory))
        .collect();

    Ok(Json(rows))
}
