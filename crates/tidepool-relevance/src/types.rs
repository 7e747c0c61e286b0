//! Ranked result records returned by content search.

use serde::{Deserialize, Serialize};

/// A ranked discussion result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionHit {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub hashtags: Vec<String>,
    pub author: String,
    pub comment_count: i64,
    pub link_count: i64,
    pub relevance_score: i64,
    pub created_at: i64,
}

impl DiscussionHit {
    /// The text the quality gate checks: every field the scorer matched
    /// against, so a hashtag-admitted discussion is visible to the gate.
    pub fn gate_text(&self) -> String {
        if self.hashtags.is_empty() {
            format!("{} {}", self.title, self.body)
        } else {
            format!("{} {} {}", self.title, self.body, self.hashtags.join(" "))
        }
    }
}

/// A ranked link result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkHit {
    pub id: i64,
    pub discussion_id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub contributor: String,
    pub votes: i64,
    pub relevance_score: i64,
}

impl LinkHit {
    pub fn gate_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// Search output: two independently ranked partitions, never merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub discussions: Vec<DiscussionHit>,
    pub links: Vec<LinkHit>,
}
