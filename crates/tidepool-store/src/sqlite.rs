//! SQLite-backed content store for discussions and links.
//!
//! Candidate lookup is a case-insensitive LIKE prefilter across the
//! searchable text columns; the canonical relevance scoring happens in
//! Rust on the returned rows, so the store only needs enough recall to
//! hand back every row a keyword could touch.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::info;

use crate::schema::SCHEMA_SQL;
use crate::types::*;
use tidepool_core::{Error, Result};

/// SQLite store holding the platform's discussions and their links.
pub struct ContentStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl ContentStore {
    /// Open or create the content store.
    ///
    /// `db_dir` is the directory (e.g., `data/contentdb/`). The file will
    /// be `db_dir/tidepool.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("tidepool.db");

        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let discussions = store.count_discussions()?;
        let links = store.count_links()?;
        info!(
            "ContentStore initialized: {} discussions, {} links, path={}",
            discussions,
            links,
            store.db_path.display()
        );

        Ok(store)
    }

    fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    // ---------------------------------------------------------------
    // Inserts
    // ---------------------------------------------------------------

    /// Insert a discussion. Returns the new discussion ID.
    pub fn add_discussion(&self, new: &NewDiscussion) -> Result<i64> {
        let created_at = new.created_at.unwrap_or_else(Self::now_millis);
        let hashtags_json = if new.hashtags.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&new.hashtags)?)
        };

        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO discussions (title, body, hashtags_json, author, comment_count, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                new.title,
                new.body,
                hashtags_json,
                new.author,
                new.comment_count,
                created_at
            ])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id)
    }

    /// Insert a link under a discussion. Returns the new link ID.
    pub fn add_link(&self, discussion_id: i64, new: &NewLink) -> Result<i64> {
        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO links (discussion_id, kind, title, url, description, contributor, votes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                discussion_id,
                new.kind.as_str(),
                new.title,
                new.url,
                new.description,
                new.contributor,
                new.votes,
                Self::now_millis()
            ])
            .map_err(|e| {
                if e.to_string().contains("FOREIGN KEY") {
                    Error::NotFound(format!("discussion {}", discussion_id))
                } else {
                    Error::Database(e.to_string())
                }
            })?;
        Ok(id)
    }

    // ---------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------

    /// Get a discussion by ID.
    pub fn get_discussion(&self, id: i64) -> Result<Option<Discussion>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached(&format!(
                "SELECT {} FROM discussions d WHERE d.id = ?1",
                DISCUSSION_COLUMNS
            ))
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![id], row_to_discussion)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    /// Fetch discussions whose title, body, or hashtag set contains any
    /// of the given needles (case-insensitive), newest first.
    ///
    /// Needles should be lowercase fragments; LIKE wildcards in them are
    /// escaped. An empty needle list returns no rows.
    pub fn discussion_candidates(&self, needles: &[String], cap: usize) -> Result<Vec<Discussion>> {
        if needles.is_empty() {
            return Ok(Vec::new());
        }

        let clause = (1..=needles.len())
            .map(|i| {
                format!(
                    "(lower(d.title) LIKE ?{i} ESCAPE '\\' \
                      OR lower(d.body) LIKE ?{i} ESCAPE '\\' \
                      OR lower(COALESCE(d.hashtags_json, '')) LIKE ?{i} ESCAPE '\\')"
                )
            })
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "SELECT {} FROM discussions d WHERE {} ORDER BY d.created_at DESC LIMIT {}",
            DISCUSSION_COLUMNS, clause, cap
        );

        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(&sql)
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(
                params_from_iter(needles.iter().map(|n| like_pattern(n))),
                row_to_discussion,
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let candidates: Vec<Discussion> = rows.filter_map(|r| r.ok()).collect();
        Ok(candidates)
    }

    /// Fetch links whose title or description contains any of the given
    /// needles (case-insensitive), highest-voted first.
    pub fn link_candidates(&self, needles: &[String], cap: usize) -> Result<Vec<Link>> {
        if needles.is_empty() {
            return Ok(Vec::new());
        }

        let clause = (1..=needles.len())
            .map(|i| {
                format!(
                    "(lower(title) LIKE ?{i} ESCAPE '\\' \
                      OR lower(description) LIKE ?{i} ESCAPE '\\')"
                )
            })
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "SELECT id, discussion_id, kind, title, url, description, contributor, votes, created_at
             FROM links WHERE {} ORDER BY votes DESC LIMIT {}",
            clause, cap
        );

        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(&sql)
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(
                params_from_iter(needles.iter().map(|n| like_pattern(n))),
                row_to_link,
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let candidates: Vec<Link> = rows.filter_map(|r| r.ok()).collect();
        Ok(candidates)
    }

    // ---------------------------------------------------------------
    // Stats
    // ---------------------------------------------------------------

    /// Count total discussions.
    pub fn count_discussions(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM discussions", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Count total links.
    pub fn count_links(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Store-level statistics.
    pub fn get_stats(&self) -> Result<StoreStats> {
        let db_size_mb = std::fs::metadata(&self.db_path)
            .map(|m| m.len() as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0);
        Ok(StoreStats {
            total_discussions: self.count_discussions()?,
            total_links: self.count_links()?,
            db_path: self.db_path.display().to_string(),
            db_size_mb,
        })
    }
}

/// Discussion select list, including the derived link count.
const DISCUSSION_COLUMNS: &str = "d.id, d.title, d.body, d.hashtags_json, d.author, d.comment_count, \
     (SELECT COUNT(*) FROM links l WHERE l.discussion_id = d.id) AS link_count, d.created_at";

/// Escape LIKE wildcards and wrap the needle in `%...%`.
fn like_pattern(needle: &str) -> String {
    let escaped = needle.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

fn row_to_discussion(row: &Row) -> rusqlite::Result<Discussion> {
    let hashtags_json: Option<String> = row.get(3)?;
    let hashtags = hashtags_json
        .as_deref()
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default();
    Ok(Discussion {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        hashtags,
        author: row.get(4)?,
        comment_count: row.get(5)?,
        link_count: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn row_to_link(row: &Row) -> rusqlite::Result<Link> {
    let kind: String = row.get(2)?;
    Ok(Link {
        id: row.get(0)?,
        discussion_id: row.get(1)?,
        kind: LinkKind::parse(&kind),
        title: row.get(3)?,
        url: row.get(4)?,
        description: row.get(5)?,
        contributor: row.get(6)?,
        votes: row.get(7)?,
        created_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (ContentStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn sample_discussion(title: &str, body: &str) -> NewDiscussion {
        NewDiscussion {
            title: title.into(),
            body: body.into(),
            author: "ada".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_and_get_discussion() {
        let (store, _dir) = test_store();
        let id = store
            .add_discussion(&NewDiscussion {
                title: "Intro to Rust".into(),
                body: "Ownership and borrowing".into(),
                hashtags: vec!["rust".into(), "systems".into()],
                author: "ada".into(),
                comment_count: 3,
                created_at: None,
            })
            .unwrap();

        let d = store.get_discussion(id).unwrap().unwrap();
        assert_eq!(d.title, "Intro to Rust");
        assert_eq!(d.hashtags, vec!["rust", "systems"]);
        assert_eq!(d.comment_count, 3);
        assert_eq!(d.link_count, 0);
    }

    #[test]
    fn test_link_count_derived() {
        let (store, _dir) = test_store();
        let id = store
            .add_discussion(&sample_discussion("Rust resources", ""))
            .unwrap();
        for i in 0..3 {
            store
                .add_link(
                    id,
                    &NewLink {
                        title: format!("Link {}", i),
                        url: "https://example.org".into(),
                        description: String::new(),
                        contributor: "bob".into(),
                        votes: i,
                        kind: LinkKind::Community,
                    },
                )
                .unwrap();
        }
        let d = store.get_discussion(id).unwrap().unwrap();
        assert_eq!(d.link_count, 3);
    }

    #[test]
    fn test_discussion_candidates_match_title_body_hashtags() {
        let (store, _dir) = test_store();
        store
            .add_discussion(&sample_discussion("Gardening tips", "Growing tomatoes"))
            .unwrap();
        store
            .add_discussion(&sample_discussion("Cooking", "tomato soup recipes"))
            .unwrap();
        store
            .add_discussion(&NewDiscussion {
                title: "Weekend plans".into(),
                hashtags: vec!["tomato".into()],
                ..Default::default()
            })
            .unwrap();
        store
            .add_discussion(&sample_discussion("Unrelated", "nothing here"))
            .unwrap();

        let hits = store
            .discussion_candidates(&["tomato".into()], 50)
            .unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_empty_needles_returns_nothing() {
        let (store, _dir) = test_store();
        store
            .add_discussion(&sample_discussion("Anything", "at all"))
            .unwrap();
        assert!(store.discussion_candidates(&[], 10).unwrap().is_empty());
        assert!(store.link_candidates(&[], 10).unwrap().is_empty());
    }

    #[test]
    fn test_like_wildcards_escaped() {
        let (store, _dir) = test_store();
        store
            .add_discussion(&sample_discussion("Percent signs", "100% organic"))
            .unwrap();
        // A stray "%" needle must not match everything
        let hits = store
            .discussion_candidates(&["zzz%zzz".into()], 10)
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_link_candidates() {
        let (store, _dir) = test_store();
        let id = store
            .add_discussion(&sample_discussion("Reading list", ""))
            .unwrap();
        store
            .add_link(
                id,
                &NewLink {
                    title: "The Rust Book".into(),
                    url: "https://doc.rust-lang.org/book/".into(),
                    description: "Official guide".into(),
                    contributor: "carol".into(),
                    votes: 12,
                    kind: LinkKind::Creator,
                },
            )
            .unwrap();
        store
            .add_link(
                id,
                &NewLink {
                    title: "Snake care".into(),
                    url: "https://pythonic.org".into(),
                    description: "Reptile husbandry".into(),
                    contributor: "dan".into(),
                    votes: 2,
                    kind: LinkKind::Community,
                },
            )
            .unwrap();

        let hits = store.link_candidates(&["rust".into()], 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "The Rust Book");
        assert_eq!(hits[0].kind, LinkKind::Creator);
    }
}
