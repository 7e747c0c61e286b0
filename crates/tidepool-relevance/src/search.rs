//! Keyword-driven content search over the store.
//!
//! Fetches candidates per partition, scores them with the canonical
//! scorer, drops sub-threshold items, and returns two ranked, capped
//! sequences. A failure in either sub-query yields an empty partition
//! for that half only; partial results beat total failure.

use std::sync::Arc;

use tracing::warn;

use tidepool_core::SearchPolicy;
use tidepool_store::ContentStore;

use crate::patterns::{store_needles, KeywordPatterns};
use crate::scorer::{score_discussion, score_link};
use crate::types::{DiscussionHit, LinkHit, SearchResults};

/// How many rows the LIKE prefilter may hand back per partition before
/// scoring trims them.
const CANDIDATE_FETCH_CAP: usize = 200;

/// Hard ceiling on the discussion pre-trim window.
const DISCUSSION_POOL_CAP: usize = 50;

/// Content search engine: store handle plus scoring policy.
pub struct ContentSearch {
    store: Arc<ContentStore>,
    policy: SearchPolicy,
}

impl ContentSearch {
    pub fn new(store: Arc<ContentStore>, policy: SearchPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Search both partitions for the keyword set, returning up to
    /// `limit` results per partition.
    ///
    /// Empty keywords short-circuit to empty partitions with no store
    /// query issued.
    pub fn search(&self, keywords: &[String], limit: usize) -> SearchResults {
        if keywords.is_empty() || limit == 0 {
            return SearchResults::default();
        }

        let patterns = KeywordPatterns::build(keywords);
        if patterns.keyword_count() == 0 {
            return SearchResults::default();
        }
        let needles = store_needles(keywords);
        let has_phrase = patterns.has_phrase();

        let discussions = self.search_discussions(&patterns, &needles, has_phrase, limit);
        let links = self.search_links(&patterns, &needles, has_phrase, limit);

        SearchResults { discussions, links }
    }

    fn search_discussions(
        &self,
        patterns: &KeywordPatterns,
        needles: &[String],
        has_phrase: bool,
        limit: usize,
    ) -> Vec<DiscussionHit> {
        let candidates = match self.store.discussion_candidates(needles, CANDIDATE_FETCH_CAP) {
            Ok(c) => c,
            Err(e) => {
                warn!("Discussion sub-query failed, returning empty partition: {}", e);
                return Vec::new();
            }
        };

        let threshold = self.policy.discussion_threshold(has_phrase);
        let mut hits: Vec<DiscussionHit> = candidates
            .into_iter()
            .filter_map(|d| {
                let score = score_discussion(&d, patterns, &self.policy);
                if score < threshold {
                    return None;
                }
                Some(DiscussionHit {
                    id: d.id,
                    title: d.title,
                    body: d.body,
                    hashtags: d.hashtags,
                    author: d.author,
                    comment_count: d.comment_count,
                    link_count: d.link_count,
                    relevance_score: score,
                    created_at: d.created_at,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.relevance_score
                .cmp(&a.relevance_score)
                .then(b.created_at.cmp(&a.created_at))
        });
        hits.truncate((limit * 2).min(DISCUSSION_POOL_CAP));
        hits.truncate(limit);
        hits
    }

    fn search_links(
        &self,
        patterns: &KeywordPatterns,
        needles: &[String],
        has_phrase: bool,
        limit: usize,
    ) -> Vec<LinkHit> {
        let candidates = match self.store.link_candidates(needles, CANDIDATE_FETCH_CAP) {
            Ok(c) => c,
            Err(e) => {
                warn!("Link sub-query failed, returning empty partition: {}", e);
                return Vec::new();
            }
        };

        let threshold = self.policy.link_threshold(has_phrase);
        let mut hits: Vec<LinkHit> = candidates
            .into_iter()
            .filter_map(|l| {
                let score = score_link(&l, patterns, &self.policy);
                if score < threshold {
                    return None;
                }
                Some(LinkHit {
                    id: l.id,
                    discussion_id: l.discussion_id,
                    title: l.title,
                    url: l.url,
                    description: l.description,
                    contributor: l.contributor,
                    votes: l.votes,
                    relevance_score: score,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.relevance_score
                .cmp(&a.relevance_score)
                .then(b.votes.cmp(&a.votes))
        });
        hits.truncate(limit);
        hits
    }
}
