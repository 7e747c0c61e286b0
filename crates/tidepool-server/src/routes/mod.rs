//! HTTP route registration.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub mod assistant;
pub mod content;
pub mod stats;

/// Assemble the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(assistant::routes())
        .merge(content::routes())
        .merge(stats::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
