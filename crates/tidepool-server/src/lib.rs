//! Tidepool HTTP server: the ask pipeline, response presentation, and
//! the route surface over the content store and search engine.

pub mod cache;
pub mod pipeline;
pub mod presenter;
pub mod ratelimit;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
