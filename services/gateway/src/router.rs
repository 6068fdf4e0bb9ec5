use crate::handlers::{entries, participants, ranking};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/participants", get(participants::list_participants))
        .route(
            "/scoreEntries",
            post(entries::append_entry).get(entries::list_recent),
        )
        .route("/ranking", get(ranking::get_ranking))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
