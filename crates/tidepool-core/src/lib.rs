//! Shared types for the Tidepool relevance core: errors, configuration,
//! and the tunable search policy.

pub mod config;
pub mod error;

pub use config::{DataPaths, SearchPolicy, TidepoolConfig};
pub use error::{Error, Result};
