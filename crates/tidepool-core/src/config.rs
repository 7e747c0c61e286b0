//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths to all Tidepool data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Content database directory (`data/contentdb/`).
    pub contentdb: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            contentdb: root.join("contentdb"),
            llm_config_file: root.join("llm-config.json"),
            root,
        };
        std::fs::create_dir_all(&paths.contentdb)?;
        Ok(paths)
    }
}

/// Relevance scoring weights and admission thresholds.
///
/// The reference cutoffs (4/5/8 points, 10-point title-phrase weight)
/// are empirically chosen policy, so everything here is a plain field
/// rather than a constant baked into the scorer or search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPolicy {
    /// Phrase keyword found in a title.
    pub phrase_title_weight: i64,
    /// Phrase keyword found in body/description text.
    pub phrase_body_weight: i64,
    /// Space-stripped phrase found inside a URL.
    pub phrase_url_weight: i64,
    /// Whole-word keyword match in a title.
    pub word_title_weight: i64,
    /// Whole-word keyword match in body/description text.
    pub word_body_weight: i64,
    /// Whole-word keyword match inside a URL.
    pub word_url_weight: i64,
    /// Added per matched keyword when more than one keyword matched.
    pub coverage_bonus_per_match: i64,
    /// Subtracted when fewer than half the keywords matched.
    pub coverage_penalty: i64,
    /// Engagement points per link attached to a discussion.
    pub link_engagement_weight: i64,
    /// Minimum score when any phrase keyword is present (both partitions).
    pub phrase_threshold: i64,
    /// Minimum score for discussions in word-only searches.
    pub discussion_word_threshold: i64,
    /// Minimum score for links in word-only searches.
    pub link_word_threshold: i64,
    /// Cap on a merged keyword list.
    pub max_keywords: usize,
    /// Cap on AI-extracted keywords (and the degraded-mode fallback cap).
    pub max_ai_keywords: usize,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            phrase_title_weight: 10,
            phrase_body_weight: 8,
            phrase_url_weight: 3,
            word_title_weight: 3,
            word_body_weight: 2,
            word_url_weight: 1,
            coverage_bonus_per_match: 2,
            coverage_penalty: 5,
            link_engagement_weight: 2,
            phrase_threshold: 8,
            discussion_word_threshold: 4,
            link_word_threshold: 5,
            max_keywords: 10,
            max_ai_keywords: 8,
        }
    }
}

impl SearchPolicy {
    /// Admission threshold for the discussion partition.
    ///
    /// Phrase searches score higher, so the bar rises with them.
    pub fn discussion_threshold(&self, has_phrase: bool) -> i64 {
        if has_phrase {
            self.phrase_threshold
        } else {
            self.discussion_word_threshold
        }
    }

    /// Admission threshold for the link partition.
    pub fn link_threshold(&self, has_phrase: bool) -> i64 {
        if has_phrase {
            self.phrase_threshold
        } else {
            self.link_word_threshold
        }
    }
}

/// Top-level Tidepool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidepoolConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Skip AI keyword extraction and brief generation (reproducible
    /// search results for testing).
    pub deterministic: bool,
    /// Relevance scoring policy.
    pub policy: SearchPolicy,
}

impl TidepoolConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3004);

        let deterministic = std::env::var("TIDEPOOL_DETERMINISTIC")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            deterministic,
            policy: SearchPolicy::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let policy = SearchPolicy::default();
        assert_eq!(policy.discussion_threshold(false), 4);
        assert_eq!(policy.link_threshold(false), 5);
        assert_eq!(policy.discussion_threshold(true), 8);
        assert_eq!(policy.link_threshold(true), 8);
    }

    #[test]
    fn test_phrase_threshold_never_lower() {
        let policy = SearchPolicy::default();
        assert!(policy.discussion_threshold(true) >= policy.discussion_threshold(false));
        assert!(policy.link_threshold(true) >= policy.link_threshold(false));
    }
}
