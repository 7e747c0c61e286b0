//! Multi-factor relevance scoring over plain records.
//!
//! This is the canonical scoring definition; the store's LIKE prefilter
//! only narrows candidates and never decides relevance. Title placement
//! and exact-phrase matches are the strongest signals; isolated word
//! matches in long bodies are weak and need corroboration from other
//! keywords, which is why partial coverage is penalized.

use tidepool_core::SearchPolicy;
use tidepool_store::{Discussion, Link};

use crate::patterns::KeywordPatterns;

/// Keyword points for an item's searchable fields, plus how many of the
/// keywords matched at all.
fn keyword_score(
    title: &str,
    body: &str,
    url: Option<&str>,
    patterns: &KeywordPatterns,
    policy: &SearchPolicy,
) -> (i64, usize) {
    let url_lower = url.map(|u| u.to_lowercase());
    let mut score = 0i64;
    let mut matched = 0usize;

    for phrase in &patterns.phrases {
        let mut hit = false;
        if phrase.text_re.is_match(title) {
            score += policy.phrase_title_weight;
            hit = true;
        }
        if phrase.text_re.is_match(body) {
            score += policy.phrase_body_weight;
            hit = true;
        }
        if let Some(url) = &url_lower {
            if url.contains(&phrase.url_needle) {
                score += policy.phrase_url_weight;
                hit = true;
            }
        }
        if hit {
            matched += 1;
        }
    }

    for word in &patterns.words {
        let mut hit = false;
        if word.re.is_match(title) {
            score += policy.word_title_weight;
            hit = true;
        }
        if word.re.is_match(body) {
            score += policy.word_body_weight;
            hit = true;
        }
        if let Some(url) = &url_lower {
            if url.contains(&word.keyword.to_lowercase()) {
                score += policy.word_url_weight;
                hit = true;
            }
        }
        if hit {
            matched += 1;
        }
    }

    (score, matched)
}

/// Coverage adjustment: corroborated matches earn a bonus, matching
/// fewer than half the keywords costs a flat penalty.
fn coverage_adjustment(matched: usize, total: usize, policy: &SearchPolicy) -> i64 {
    let mut adjustment = 0i64;
    if matched > 1 {
        adjustment += matched as i64 * policy.coverage_bonus_per_match;
    }
    if total > 0 && matched < total.div_ceil(2) {
        adjustment -= policy.coverage_penalty;
    }
    adjustment
}

/// Score a discussion against the keyword patterns.
///
/// Hashtags are folded into the body text for matching. An engagement
/// base (comment count plus weighted link count) is added so
/// equally-matched but popular discussions rank higher; a discussion
/// matching no keyword scores 0 no matter how popular it is. Never
/// negative.
pub fn score_discussion(
    discussion: &Discussion,
    patterns: &KeywordPatterns,
    policy: &SearchPolicy,
) -> i64 {
    let body = if discussion.hashtags.is_empty() {
        discussion.body.clone()
    } else {
        format!("{} {}", discussion.body, discussion.hashtags.join(" "))
    };

    let (keyword_points, matched) =
        keyword_score(&discussion.title, &body, None, patterns, policy);
    if matched == 0 {
        return 0;
    }

    let engagement =
        discussion.comment_count + discussion.link_count * policy.link_engagement_weight;

    let score = engagement
        + keyword_points
        + coverage_adjustment(matched, patterns.keyword_count(), policy);
    score.max(0)
}

/// Score a link against the keyword patterns. Never negative.
pub fn score_link(link: &Link, patterns: &KeywordPatterns, policy: &SearchPolicy) -> i64 {
    let (keyword_points, matched) = keyword_score(
        &link.title,
        &link.description,
        Some(&link.url),
        patterns,
        policy,
    );

    let score = keyword_points + coverage_adjustment(matched, patterns.keyword_count(), policy);
    score.max(0)
}
