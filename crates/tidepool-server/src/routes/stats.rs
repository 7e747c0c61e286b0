//! Store statistics endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/stats", get(stats))
}

async fn stats(State(state): State<Arc<AppState>>) -> Response {
    match state.store.get_stats() {
        Ok(s) => Json(json!({
            "totalDiscussions": s.total_discussions,
            "totalLinks": s.total_links,
            "dbPath": s.db_path,
            "dbSizeMb": s.db_size_mb,
        }))
        .into_response(),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
