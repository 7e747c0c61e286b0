//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use tidepool_assist::LlmConfig;
use tidepool_core::{Result, TidepoolConfig};
use tidepool_relevance::ContentSearch;
use tidepool_store::ContentStore;

use crate::cache::ResponseCache;
use crate::ratelimit::RateLimiter;

/// Everything the request handlers share.
pub struct AppState {
    pub config: TidepoolConfig,
    pub store: Arc<ContentStore>,
    pub search: ContentSearch,
    pub llm_config: RwLock<LlmConfig>,
    pub http: reqwest::Client,
    pub cache: ResponseCache,
    pub limiter: RateLimiter,
}

impl AppState {
    /// Open the store and wire up the search engine, LLM config, cache,
    /// and rate limiter.
    pub fn new(config: TidepoolConfig) -> Result<Arc<Self>> {
        let store = Arc::new(ContentStore::open(&config.data_paths.contentdb)?);
        let search = ContentSearch::new(store.clone(), config.policy.clone());
        let llm_config = RwLock::new(LlmConfig::load(&config.data_paths.llm_config_file));

        Ok(Arc::new(Self {
            config,
            store,
            search,
            llm_config,
            http: reqwest::Client::new(),
            cache: ResponseCache::default_cache(),
            limiter: RateLimiter::new(30, Duration::from_secs(60)),
        }))
    }
}
