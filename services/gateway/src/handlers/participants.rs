use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State};
use types::participant::Participant;

/// `GET /participants` — all known participants, name ascending.
pub async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Participant>>, AppError> {
    Ok(Json(state.store.participants()))
}
