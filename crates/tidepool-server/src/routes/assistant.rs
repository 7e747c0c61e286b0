//! Assistant endpoints: ask, status, and LLM configuration.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use tidepool_assist::test_api_key;
use tidepool_relevance::{DiscussionHit, LinkHit};

use crate::pipeline::{run_ask, AskRequest};
use crate::presenter::render_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/assistant/ask", post(ask))
        .route("/api/assistant/status", get(status))
        .route("/api/assistant/config", get(get_config).put(update_config))
        .route("/api/assistant/config/test", post(test_config))
}

/// Rate-limit key: forwarded client address if present, else a shared
/// local bucket.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "local".to_string())
}

fn discussion_json(d: &DiscussionHit) -> serde_json::Value {
    json!({
        "id": d.id,
        "title": d.title,
        "author": d.author,
        "commentCount": d.comment_count,
        "linkCount": d.link_count,
        "relevanceScore": d.relevance_score,
        "createdAt": d.created_at,
    })
}

fn link_json(l: &LinkHit) -> serde_json::Value {
    json!({
        "id": l.id,
        "discussionId": l.discussion_id,
        "title": l.title,
        "url": l.url,
        "description": l.description,
        "contributor": l.contributor,
        "votes": l.votes,
        "relevanceScore": l.relevance_score,
    })
}

async fn ask(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<AskRequest>,
) -> Response {
    let decision = state.limiter.check(&client_key(&headers), "ask");
    if !decision.allowed {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Too many requests",
                "remainingRequests": 0,
                "resetSeconds": decision.reset_secs,
            })),
        )
            .into_response();
    }

    let reply = run_ask(&state, &request).await;
    let html = render_response(&reply.response);

    Json(json!({
        "brief": reply.response.brief_text,
        "discussions": reply.response.discussions.iter().map(discussion_json).collect::<Vec<_>>(),
        "links": reply.response.links.iter().map(link_json).collect::<Vec<_>>(),
        "hasMoreDiscussions": reply.response.has_more_discussions,
        "hasMoreLinks": reply.response.has_more_links,
        "contextId": (reply.page + 1).to_string(),
        "html": html,
    }))
    .into_response()
}

async fn status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let ai_configured = state.llm_config.read().resolve_provider().is_some();
    Json(json!({
        "status": "ok",
        "deterministic": state.config.deterministic,
        "aiConfigured": ai_configured,
        "cacheEntries": state.cache.len(),
    }))
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let response = state.llm_config.read().to_response();
    Json(json!(response))
}

async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<tidepool_assist::LlmConfigUpdate>,
) -> Json<serde_json::Value> {
    let response = {
        let mut config = state.llm_config.write();
        config.apply_update(&update);
        if let Err(e) = config.save() {
            warn!("Failed to persist LLM config: {}", e);
        }
        config.to_response()
    };
    info!("LLM configuration updated");
    Json(json!(response))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestKeyRequest {
    provider: String,
    api_key: String,
}

async fn test_config(Json(request): Json<TestKeyRequest>) -> Json<serde_json::Value> {
    match test_api_key(&request.provider, &request.api_key).await {
        Ok(()) => Json(json!({"ok": true})),
        Err(e) => Json(json!({"ok": false, "error": e})),
    }
}
