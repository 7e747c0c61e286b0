//! Relevance core: keyword extraction, multi-factor scoring, partitioned
//! content search, and the post-ranking quality gate.
//!
//! The scorer is a pure function over plain records; the store is only a
//! recall-oriented prefilter. All weights and thresholds come from
//! [`tidepool_core::SearchPolicy`].

pub mod gate;
pub mod keywords;
pub mod patterns;
pub mod scorer;
pub mod search;
pub mod types;

pub use gate::validate;
pub use keywords::{extract_keywords, has_phrase, merge_keywords};
pub use patterns::KeywordPatterns;
pub use scorer::{score_discussion, score_link};
pub use search::ContentSearch;
pub use types::{DiscussionHit, LinkHit, SearchResults};
