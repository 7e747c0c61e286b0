//! Data types for discussions, links, and store statistics.

use serde::{Deserialize, Serialize};

/// Which sub-collection a link belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Supplied by the discussion's creator.
    Creator,
    /// Contributed by the community.
    Community,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Creator => "creator",
            LinkKind::Community => "community",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "creator" => LinkKind::Creator,
            _ => LinkKind::Community,
        }
    }
}

/// A discussion row, with its derived link count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discussion {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub hashtags: Vec<String>,
    pub author: String,
    pub comment_count: i64,
    /// Number of links attached across both sub-collections.
    pub link_count: i64,
    pub created_at: i64,
}

/// A link row from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub discussion_id: i64,
    pub kind: LinkKind,
    pub title: String,
    pub url: String,
    pub description: String,
    pub contributor: String,
    pub votes: i64,
    pub created_at: i64,
}

/// Fields for inserting a discussion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDiscussion {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub comment_count: i64,
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Fields for inserting a link under a discussion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLink {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contributor: String,
    #[serde(default)]
    pub votes: i64,
    #[serde(default = "default_kind")]
    pub kind: LinkKind,
}

fn default_kind() -> LinkKind {
    LinkKind::Community
}

/// Store-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_discussions: i64,
    pub total_links: i64,
    pub db_path: String,
    pub db_size_mb: f64,
}
