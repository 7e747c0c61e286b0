//! Post-ranking quality gate.
//!
//! A stricter boolean admission check applied after scoring, to catch
//! candidates that cleared the threshold on coverage bonuses but don't
//! verifiably contain the searched terms. Also used to probe whether
//! any further valid item exists when deciding a "show more" affordance.

use regex::Regex;

/// Whether `keyword` appears in `text` as a whole word, case-insensitive.
fn whole_word_match(text: &str, keyword: &str) -> bool {
    let source = format!(r"(?i)\b{}\b", regex::escape(keyword));
    match Regex::new(&source) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}

/// Validate that a candidate's text genuinely contains the searched terms.
///
/// - Any phrase keyword present: pass if the text contains at least one
///   phrase as a literal case-insensitive substring.
/// - Multiple single-word keywords: pass only if at least half (ceiling)
///   match as whole words.
/// - Single keyword: pass iff it matches as a whole word.
///
/// Empty text or an empty keyword list never passes.
pub fn validate(candidate_text: &str, keywords: &[String]) -> bool {
    if candidate_text.is_empty() || keywords.is_empty() {
        return false;
    }

    let text_lower = candidate_text.to_lowercase();

    let phrases: Vec<&String> = keywords.iter().filter(|k| k.contains(' ')).collect();
    if !phrases.is_empty() {
        return phrases
            .iter()
            .any(|p| text_lower.contains(&p.to_lowercase()));
    }

    if keywords.len() > 1 {
        let required = keywords.len().div_ceil(2);
        let matched = keywords
            .iter()
            .filter(|k| whole_word_match(candidate_text, k))
            .count();
        return matched >= required;
    }

    whole_word_match(candidate_text, &keywords[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_text_or_keywords_fail() {
        assert!(!validate("", &kws(&["rust"])));
        assert!(!validate("some text", &[]));
        assert!(!validate("", &[]));
    }

    #[test]
    fn test_phrase_literal_substring() {
        let keywords = kws(&["machine learning", "neural"]);
        assert!(validate("Intro to Machine Learning", &keywords));
        // Whitespace-flexible matching is NOT required for the gate
        assert!(!validate("machine\tlearning", &keywords));
        // A lone word match can't satisfy a phrase-bearing keyword set
        assert!(!validate("neural networks overview", &keywords));
    }

    #[test]
    fn test_multi_word_half_coverage() {
        let keywords = kws(&["rust", "async", "tokio"]);
        // ceil(3/2) = 2 required
        assert!(validate("rust and tokio tutorial", &keywords));
        assert!(!validate("rust only here", &keywords));
    }

    #[test]
    fn test_single_keyword_whole_word() {
        let keywords = kws(&["cat"]);
        assert!(validate("my cat sleeps", &keywords));
        assert!(!validate("category theory", &keywords));
    }
}
