//! Brief generation: short natural-language summaries of search results.
//!
//! Owns prompt construction and topicality validation only; the actual
//! text comes from the external generation capability. Never fails —
//! every error path returns a topic-framed fallback sentence, so the
//! rest of the response pipeline is never blocked on this module.

use reqwest::Client;
use tracing::debug;

use tidepool_relevance::{DiscussionHit, LinkHit};

use crate::client::generate;
use crate::config::LlmConfig;

/// How much of a discussion body the prompt may carry.
const EXCERPT_CHARS: usize = 300;

/// Result titles listed in the prompt, per partition.
const PROMPT_RESULT_CAP: usize = 5;

/// Generate a brief for the query over the top search results. Always
/// returns usable text; on any failure the topic-framed fallback is
/// substituted.
pub async fn generate_brief(
    client: &Client,
    config: &LlmConfig,
    query: &str,
    discussions: &[DiscussionHit],
    links: &[LinkHit],
) -> String {
    let Some((provider, model, api_key)) = config.resolve_provider() else {
        return fallback_brief(query, discussions.len(), links.len());
    };

    let prompt = build_brief_prompt(query, discussions, links);

    match generate(client, provider, &prompt, &model, &api_key, 220, 0.7).await {
        Ok(text) if is_on_topic(&text, query) => text,
        Ok(_) => {
            debug!("Generated brief failed topicality check, using fallback");
            fallback_brief(query, discussions.len(), links.len())
        }
        Err(e) => {
            debug!("Brief generation unavailable: {}", e);
            fallback_brief(query, discussions.len(), links.len())
        }
    }
}

/// Build a bounded prompt: the query, result counts, titles, and short
/// body excerpts from the top discussions.
pub fn build_brief_prompt(
    query: &str,
    discussions: &[DiscussionHit],
    links: &[LinkHit],
) -> String {
    let mut sections: Vec<String> = Vec::new();

    if !discussions.is_empty() {
        let listed: Vec<String> = discussions
            .iter()
            .take(PROMPT_RESULT_CAP)
            .enumerate()
            .map(|(i, d)| {
                let excerpt = truncate(&d.body, EXCERPT_CHARS);
                if excerpt.is_empty() {
                    format!("{}. {}", i + 1, d.title)
                } else {
                    format!("{}. {}: {}", i + 1, d.title, excerpt)
                }
            })
            .collect();
        sections.push(format!(
            "Discussions found ({}):\n{}",
            discussions.len(),
            listed.join("\n")
        ));
    }

    if !links.is_empty() {
        let listed: Vec<String> = links
            .iter()
            .take(PROMPT_RESULT_CAP)
            .enumerate()
            .map(|(i, l)| format!("{}. {} — {}", i + 1, l.title, truncate(&l.description, 120)))
            .collect();
        sections.push(format!(
            "Shared links found ({}):\n{}",
            links.len(),
            listed.join("\n")
        ));
    }

    if sections.is_empty() {
        sections.push("No matching results were found.".to_string());
    }

    format!(
        "A community member asked: \"{}\"\n\n{}\n\n\
         Write a brief, friendly two-or-three sentence summary of what the \
         community has on this topic, referencing the results above. Do not \
         invent results that are not listed.",
        truncate(query, 300),
        sections.join("\n\n")
    )
}

/// Whether generated text mentions the query at all: it must contain at
/// least one query word longer than three characters.
pub fn is_on_topic(text: &str, query: &str) -> bool {
    let text_lower = text.to_lowercase();
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() > 3)
        .any(|w| text_lower.contains(w))
}

/// Static topic-framed fallback, used whenever generation is
/// unavailable or off-topic.
pub fn fallback_brief(query: &str, discussion_count: usize, link_count: usize) -> String {
    let topic = truncate(query.trim(), 80);
    if discussion_count == 0 && link_count == 0 {
        format!(
            "I couldn't find community content matching \"{}\" yet — it might be a great topic to start a discussion about.",
            topic
        )
    } else {
        format!(
            "Here's what the community has on \"{}\": {} related discussion{} and {} shared link{} worth a look.",
            topic,
            discussion_count,
            if discussion_count == 1 { "" } else { "s" },
            link_count,
            if link_count == 1 { "" } else { "s" },
        )
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, body: &str) -> DiscussionHit {
        DiscussionHit {
            id: 1,
            title: title.into(),
            body: body.into(),
            hashtags: Vec::new(),
            author: "ada".into(),
            comment_count: 0,
            link_count: 0,
            relevance_score: 10,
            created_at: 0,
        }
    }

    #[test]
    fn test_prompt_truncates_bodies() {
        let long_body = "x".repeat(2000);
        let prompt = build_brief_prompt("sourdough", &[hit("Starters", &long_body)], &[]);
        assert!(prompt.len() < 1200);
        assert!(prompt.contains("Starters"));
        assert!(prompt.contains("Discussions found (1)"));
    }

    #[test]
    fn test_prompt_handles_no_results() {
        let prompt = build_brief_prompt("sourdough", &[], &[]);
        assert!(prompt.contains("No matching results"));
    }

    #[test]
    fn test_topicality() {
        assert!(is_on_topic(
            "The community has several sourdough threads.",
            "sourdough starter help"
        ));
        assert!(!is_on_topic("Completely unrelated reply.", "sourdough starter"));
        // Short query words don't count toward topicality
        assert!(!is_on_topic("it is so big", "is it big"));
    }

    #[test]
    fn test_fallback_shapes() {
        let none = fallback_brief("rust async", 0, 0);
        assert!(none.contains("rust async"));

        let some = fallback_brief("rust async", 2, 1);
        assert!(some.contains("2 related discussions"));
        assert!(some.contains("1 shared link"));
    }

    #[tokio::test]
    async fn test_no_provider_uses_fallback() {
        let client = Client::new();
        let config = LlmConfig::default();
        let brief = generate_brief(&client, &config, "rust async", &[], &[]).await;
        assert!(brief.contains("rust async"));
    }
}
