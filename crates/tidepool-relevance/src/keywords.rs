//! Heuristic keyword extraction from free text.
//!
//! Produces single important words and 2-3 word phrases for searching.
//! Always available and deterministic; AI-extracted keywords (when the
//! external call succeeds) are merged in front of these via
//! [`merge_keywords`].

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Common function words excluded from keyword and phrase construction.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Articles and determiners
        "the", "and", "for", "are", "was", "were", "been", "being", "this",
        "that", "these", "those", "there", "here", "which", "what", "when",
        "where", "who", "whom", "whose", "why", "how", "all", "any", "both",
        "each", "few", "more", "most", "other", "some", "such",
        // Pronouns
        "you", "your", "yours", "they", "them", "their", "theirs", "she",
        "her", "hers", "him", "his", "its", "our", "ours", "myself", "itself",
        // Common verbs and auxiliaries
        "can", "could", "will", "would", "shall", "should", "may", "might",
        "must", "have", "has", "had", "having", "does", "did", "doing",
        "get", "got", "make", "made", "want", "need", "like", "know", "think",
        // Conjunctions and prepositions
        "but", "not", "nor", "with", "from", "into", "onto", "over", "under",
        "about", "after", "before", "between", "through", "during", "above",
        "below", "off", "out", "then", "than", "too", "very", "just", "also",
        "only", "because", "while", "against",
    ]
    .into_iter()
    .collect()
});

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").unwrap());

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

fn is_numeric(word: &str) -> bool {
    word.chars().all(|c| c.is_ascii_digit())
}

/// Case-insensitive substring overlap in either direction.
///
/// Merged keyword lists treat overlapping entries as duplicates, so
/// "machine learning" absorbs a later "learning".
fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Append `candidate` unless it overlaps something already kept.
fn push_unique(out: &mut Vec<String>, candidate: String, max: usize) {
    if out.len() >= max {
        return;
    }
    if out.iter().any(|kept| overlaps(kept, &candidate)) {
        return;
    }
    out.push(candidate);
}

/// Extract up to `max` keywords from free text: multi-word phrases first,
/// then single important words as a fallback pool.
///
/// Returns an empty list for empty input. Stop words never appear as
/// standalone keywords and never sit at phrase boundaries.
pub fn extract_keywords(text: &str, max: usize) -> Vec<String> {
    if text.trim().is_empty() || max == 0 {
        return Vec::new();
    }

    let stripped = URL_RE.replace_all(text, " ");

    // Words that appear capitalized anywhere in the original text,
    // recorded lowercase. A proxy for proper nouns / important terms,
    // used to admit 3-word phrases.
    let capitalized: HashSet<String> = stripped
        .split_whitespace()
        .filter_map(|w| {
            let cleaned: String = w.chars().filter(|c| c.is_alphanumeric()).collect();
            if cleaned.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
                Some(cleaned.to_lowercase())
            } else {
                None
            }
        })
        .collect();

    // Strip punctuation, lowercase, split, discard short tokens.
    let normalized: String = stripped
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let tokens: Vec<&str> = normalized
        .split_whitespace()
        .filter(|t| t.len() > 2)
        .collect();

    let mut phrases: Vec<String> = Vec::new();

    // Adjacent 3-word windows first so they survive the overlap dedupe
    // against their own bigrams: no stop words, and at least one word
    // seen capitalized in the original text.
    for triple in tokens.windows(3) {
        if triple.iter().any(|t| is_stop_word(t)) {
            continue;
        }
        if !triple.iter().any(|t| capitalized.contains(*t)) {
            continue;
        }
        let phrase = triple.join(" ");
        if phrase.len() > 6 {
            phrases.push(phrase);
        }
    }

    // Adjacent 2-word windows with no stop words at either boundary.
    for pair in tokens.windows(2) {
        if is_stop_word(pair[0]) || is_stop_word(pair[1]) {
            continue;
        }
        let phrase = format!("{} {}", pair[0], pair[1]);
        if phrase.len() > 4 {
            phrases.push(phrase);
        }
    }

    // Remaining single important words.
    let singles: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|t| t.len() > 3 && !is_numeric(t) && !is_stop_word(t))
        .collect();

    let mut keywords: Vec<String> = Vec::new();
    for phrase in phrases {
        push_unique(&mut keywords, phrase, max);
    }
    for word in singles {
        push_unique(&mut keywords, word.to_string(), max);
    }
    keywords
}

/// Merge AI-extracted keywords with the heuristic extraction.
///
/// AI keywords come first; heuristic entries that substring-overlap an
/// AI keyword (case-insensitively) are dropped as duplicates.
pub fn merge_keywords(ai: &[String], simple: &[String], max: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for kw in ai {
        let normalized = kw.trim().to_lowercase();
        if !normalized.is_empty() {
            push_unique(&mut merged, normalized, max);
        }
    }
    for kw in simple {
        push_unique(&mut merged, kw.clone(), max);
    }
    merged
}

/// Whether any keyword in the list is a multi-word phrase.
pub fn has_phrase(keywords: &[String]) -> bool {
    keywords.iter().any(|k| k.contains(' '))
}
