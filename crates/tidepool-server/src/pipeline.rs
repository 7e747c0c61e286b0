//! The ask pipeline: query in, presented answer out.
//!
//! Orchestrates keyword extraction, partitioned content search, window
//! pagination with the quality gate, and brief generation. The pipeline
//! never fails: every degraded path still produces a usable response.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use tidepool_assist::{extract_ai_keywords, fallback_brief, generate_brief, LlmConfig};
use tidepool_relevance::{extract_keywords, merge_keywords, validate, DiscussionHit, LinkHit};

use crate::state::AppState;

/// Results shown per partition per page.
pub const PAGE_SIZE: usize = 5;

/// Whether the request starts a new answer or continues a previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AskMode {
    #[default]
    Fresh,
    Continuation,
}

/// An incoming ask request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub query_text: String,
    #[serde(default)]
    pub mode: AskMode,
    /// Opaque continuation token from a previous response.
    #[serde(default)]
    pub context_id: Option<String>,
}

/// An assembled answer: one page per partition plus the brief.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub discussions: Vec<DiscussionHit>,
    pub links: Vec<LinkHit>,
    pub brief_text: String,
    pub has_more_discussions: bool,
    pub has_more_links: bool,
}

/// Pipeline output: the response plus the page it covered, so the
/// presentation layer can mint the next continuation token.
#[derive(Debug, Clone)]
pub struct AskReply {
    pub response: AskResponse,
    pub page: usize,
}

/// Run the full pipeline for one request.
pub async fn run_ask(state: &AppState, request: &AskRequest) -> AskReply {
    let query = request.query_text.trim();
    let page = match request.mode {
        AskMode::Fresh => 0,
        AskMode::Continuation => request
            .context_id
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1),
    };

    if query.is_empty() {
        return AskReply {
            response: AskResponse {
                discussions: Vec::new(),
                links: Vec::new(),
                brief_text: "Ask me about a topic and I'll look for related discussions \
                             and shared links."
                    .to_string(),
                has_more_discussions: false,
                has_more_links: false,
            },
            page,
        };
    }

    let fresh = request.mode == AskMode::Fresh;
    let cache_key = fresh.then(|| query_cache_key(query, request.mode));
    if let Some(key) = &cache_key {
        if let Some(cached) = state.cache.get(key) {
            debug!("Cache hit for query");
            return AskReply {
                response: cached,
                page,
            };
        }
    }

    let llm = state.llm_config.read().clone();
    let keywords = gather_keywords(state, &llm, query).await;
    info!("Query resolved to {} keywords", keywords.len());

    if keywords.is_empty() {
        let response = AskResponse {
            discussions: Vec::new(),
            links: Vec::new(),
            brief_text: if fresh {
                fallback_brief(query, 0, 0)
            } else {
                String::new()
            },
            has_more_discussions: false,
            has_more_links: false,
        };
        return AskReply { response, page };
    }

    // A full page past the window's end, so the gate can probe whether
    // any further valid item exists, not just the next-ranked one.
    let probe_limit = (page + 2) * PAGE_SIZE;
    let results = state.search.search(&keywords, probe_limit);

    let (discussions, has_more_discussions) =
        paginate(results.discussions, page, &keywords, DiscussionHit::gate_text);
    let (links, has_more_links) = paginate(results.links, page, &keywords, LinkHit::gate_text);

    let brief_text = if !fresh {
        String::new()
    } else if state.config.deterministic {
        fallback_brief(query, discussions.len(), links.len())
    } else {
        generate_brief(&state.http, &llm, query, &discussions, &links).await
    };

    let response = AskResponse {
        discussions,
        links,
        brief_text,
        has_more_discussions,
        has_more_links,
    };

    if let Some(key) = cache_key {
        state.cache.put(key, response.clone());
    }

    AskReply { response, page }
}

/// Merge AI and heuristic keywords, degrading per what actually failed:
/// no provider (or deterministic mode) keeps the full heuristic list,
/// while a failed AI call tightens the cap to the AI limit.
async fn gather_keywords(state: &AppState, llm: &LlmConfig, query: &str) -> Vec<String> {
    let policy = state.search.policy();
    let simple = extract_keywords(query, policy.max_keywords);

    if state.config.deterministic || llm.resolve_provider().is_none() {
        return simple;
    }

    match extract_ai_keywords(&state.http, llm, query, policy.max_ai_keywords).await {
        Some(ai) => merge_keywords(&ai, &simple, policy.max_keywords),
        None => {
            debug!("AI extraction failed, degrading to capped heuristic keywords");
            simple
                .into_iter()
                .take(policy.max_ai_keywords)
                .collect()
        }
    }
}

/// Slice one page out of a ranked partition.
///
/// The first page is shown as ranked; continuation pages pass each item
/// through the quality gate. `has_more` is true only if a gate-passing
/// item exists beyond the page.
fn paginate<T>(
    hits: Vec<T>,
    page: usize,
    keywords: &[String],
    gate_text: impl Fn(&T) -> String,
) -> (Vec<T>, bool) {
    let start = page * PAGE_SIZE;
    let end = start + PAGE_SIZE;
    let mut shown = Vec::new();
    let mut has_more = false;

    for (i, hit) in hits.into_iter().enumerate() {
        if i < start {
            continue;
        }
        if i < end {
            if page == 0 || validate(&gate_text(&hit), keywords) {
                shown.push(hit);
            }
        } else if validate(&gate_text(&hit), keywords) {
            has_more = true;
            break;
        }
    }

    (shown, has_more)
}

/// Cache key: hash of the request mode plus the normalized query text.
fn query_cache_key(query: &str, mode: AskMode) -> String {
    let mut hasher = Sha256::new();
    hasher.update(match mode {
        AskMode::Fresh => b"fresh".as_slice(),
        AskMode::Continuation => b"continuation".as_slice(),
    });
    hasher.update([0]);
    hasher.update(query.trim().to_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}
