//! AI-assisted contextual keyword extraction.
//!
//! Asks the configured LLM for search phrases grounded in the full text,
//! which catches context the adjacency heuristic misses. Any failure
//! (no provider, HTTP error, timeout, unparseable reply) degrades
//! silently to `None`; the caller falls back to heuristic extraction.

use reqwest::Client;
use tracing::debug;

use crate::client::generate;
use crate::config::LlmConfig;

/// Extract up to `max` contextual keywords/phrases from the text via the
/// external LLM. Returns `None` on any failure or when no provider is
/// configured.
pub async fn extract_ai_keywords(
    client: &Client,
    config: &LlmConfig,
    text: &str,
    max: usize,
) -> Option<Vec<String>> {
    if text.trim().is_empty() || max == 0 {
        return None;
    }

    let (provider, model, api_key) = config.resolve_provider()?;
    let prompt = build_extraction_prompt(text, max);

    match generate(client, provider, &prompt, &model, &api_key, 120, 0.3).await {
        Ok(reply) => {
            let keywords = parse_keyword_list(&reply, max);
            if keywords.is_empty() {
                None
            } else {
                Some(keywords)
            }
        }
        Err(e) => {
            debug!("AI keyword extraction unavailable: {}", e);
            None
        }
    }
}

fn build_extraction_prompt(text: &str, max: usize) -> String {
    let excerpt = truncate(text, 1500);
    format!(
        "Extract the {} most useful search keywords or short phrases (2-3 words) \
         from the following text. Prefer specific topics, names, and technical terms \
         over generic words. Reply with a single comma-separated list and nothing else.\n\n\
         Text:\n{}",
        max, excerpt
    )
}

/// Parse a comma-separated keyword reply, dropping anything too short
/// or too long to be a real search term. Keywords of one or two
/// characters are useless downstream, where matching works on longer
/// fragments.
fn parse_keyword_list(reply: &str, max: usize) -> Vec<String> {
    reply
        .split(',')
        .map(|part| part.trim().trim_matches(&['"', '\'', '.'][..]).to_string())
        .filter(|kw| kw.len() > 2 && kw.len() <= 60 && kw.split_whitespace().count() <= 3)
        .take(max)
        .collect()
}

fn truncate(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        text
    } else {
        let mut end = max_len;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }
}
