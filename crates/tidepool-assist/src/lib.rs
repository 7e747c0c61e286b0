//! External AI collaborators: provider configuration, bounded text
//! generation, contextual keyword extraction, and brief generation.
//!
//! Everything here is optional from the pipeline's point of view —
//! every failure path degrades to heuristic extraction or a fallback
//! string rather than surfacing an error.

pub mod brief;
pub mod client;
pub mod config;
pub mod keywords;
pub mod types;

pub use brief::{fallback_brief, generate_brief};
pub use client::{generate, test_api_key, GENERATION_TIMEOUT};
pub use config::LlmConfig;
pub use keywords::extract_ai_keywords;
pub use types::{LlmConfigResponse, LlmConfigUpdate, LlmProvider};
