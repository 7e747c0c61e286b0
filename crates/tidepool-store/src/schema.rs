//! Database schema SQL for the content store.

/// Core tables: discussions and their attached links.
///
/// Links live in two logical sub-collections per discussion
/// (creator-supplied and community-contributed), distinguished by `kind`.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS discussions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    body TEXT NOT NULL DEFAULT '',
    hashtags_json TEXT,
    author TEXT NOT NULL DEFAULT '',
    comment_count INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    discussion_id INTEGER NOT NULL REFERENCES discussions(id) ON DELETE CASCADE,
    kind TEXT NOT NULL DEFAULT 'community',
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    contributor TEXT NOT NULL DEFAULT '',
    votes INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_discussions_created ON discussions(created_at);
CREATE INDEX IF NOT EXISTS idx_links_discussion ON links(discussion_id);
CREATE INDEX IF NOT EXISTS idx_links_votes ON links(votes);
"#;
