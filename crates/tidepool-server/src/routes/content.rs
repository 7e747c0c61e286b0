//! Content seeding and retrieval endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use tidepool_core::Error;
use tidepool_store::{NewDiscussion, NewLink};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/discussions", post(create_discussion))
        .route("/api/discussions/{id}", get(get_discussion))
        .route("/api/discussions/{id}/links", post(create_link))
}

fn error_response(e: Error) -> Response {
    let status = match &e {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({"error": e.to_string()}))).into_response()
}

async fn create_discussion(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewDiscussion>,
) -> Response {
    if new.title.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Title is required"})),
        )
            .into_response();
    }

    match state.store.add_discussion(&new) {
        Ok(id) => {
            info!("Created discussion {}", id);
            // New content makes cached answers stale
            state.cache.clear();
            (StatusCode::CREATED, Json(json!({"id": id}))).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn get_discussion(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match state.store.get_discussion(id) {
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("Discussion {} not found", id)})),
        )
            .into_response(),
        Ok(Some(d)) => Json(json!({
            "id": d.id,
            "title": d.title,
            "body": d.body,
            "hashtags": d.hashtags,
            "author": d.author,
            "commentCount": d.comment_count,
            "linkCount": d.link_count,
            "createdAt": d.created_at,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn create_link(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(new): Json<NewLink>,
) -> Response {
    if new.title.trim().is_empty() || new.url.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Title and url are required"})),
        )
            .into_response();
    }

    match state.store.add_link(id, &new) {
        Ok(link_id) => {
            info!("Created link {} under discussion {}", link_id, id);
            state.cache.clear();
            (StatusCode::CREATED, Json(json!({"id": link_id}))).into_response()
        }
        Err(e) => error_response(e),
    }
}
