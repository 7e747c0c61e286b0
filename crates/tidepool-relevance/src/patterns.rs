//! Compiled match patterns for a keyword set.
//!
//! Phrase keywords become whitespace-flexible case-insensitive regexes;
//! single words become word-boundary regexes so "cat" never matches
//! "category". URLs are matched separately: phrases with their spaces
//! stripped, words as plain substrings (URLs have no word boundaries
//! worth trusting).

use regex::Regex;

/// A phrase keyword (contains whitespace) with its compiled matchers.
#[derive(Debug)]
pub struct PhrasePattern {
    pub keyword: String,
    /// Case-insensitive, `\s+` between words.
    pub text_re: Regex,
    /// Lowercase phrase with spaces removed, for URL containment.
    pub url_needle: String,
}

/// A single-word keyword with its word-boundary matcher.
#[derive(Debug)]
pub struct WordPattern {
    pub keyword: String,
    pub re: Regex,
}

/// Keyword set split into phrase and word patterns.
#[derive(Debug, Default)]
pub struct KeywordPatterns {
    pub phrases: Vec<PhrasePattern>,
    pub words: Vec<WordPattern>,
}

impl KeywordPatterns {
    /// Compile patterns for a keyword list. Keywords that fail to
    /// compile (pathological input) are skipped.
    pub fn build(keywords: &[String]) -> Self {
        let mut patterns = KeywordPatterns::default();
        for keyword in keywords {
            let keyword = keyword.trim();
            if keyword.is_empty() {
                continue;
            }
            if keyword.contains(' ') {
                let parts: Vec<String> = keyword
                    .split_whitespace()
                    .map(regex::escape)
                    .collect();
                let source = format!("(?i){}", parts.join(r"\s+"));
                if let Ok(text_re) = Regex::new(&source) {
                    patterns.phrases.push(PhrasePattern {
                        keyword: keyword.to_string(),
                        text_re,
                        url_needle: keyword
                            .to_lowercase()
                            .split_whitespace()
                            .collect::<String>(),
                    });
                }
            } else {
                let source = format!(r"(?i)\b{}\b", regex::escape(keyword));
                if let Ok(re) = Regex::new(&source) {
                    patterns.words.push(WordPattern {
                        keyword: keyword.to_string(),
                        re,
                    });
                }
            }
        }
        patterns
    }

    /// Total number of keywords carried.
    pub fn keyword_count(&self) -> usize {
        self.phrases.len() + self.words.len()
    }

    /// Whether any phrase keyword is present.
    pub fn has_phrase(&self) -> bool {
        !self.phrases.is_empty()
    }
}

/// Lowercase fragments for the store's LIKE prefilter: every individual
/// word of every keyword, deduplicated.
pub fn store_needles(keywords: &[String]) -> Vec<String> {
    let mut needles: Vec<String> = Vec::new();
    for keyword in keywords {
        for word in keyword.split_whitespace() {
            let word = word.to_lowercase();
            if word.len() > 2 && !needles.contains(&word) {
                needles.push(word);
            }
        }
    }
    needles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_boundary_no_substring_false_positive() {
        let patterns = KeywordPatterns::build(&["cat".into()]);
        assert!(patterns.words[0].re.is_match("my cat sleeps"));
        assert!(patterns.words[0].re.is_match("Cat pictures"));
        assert!(!patterns.words[0].re.is_match("category theory"));
    }

    #[test]
    fn test_phrase_whitespace_flexible() {
        let patterns = KeywordPatterns::build(&["machine learning".into()]);
        let re = &patterns.phrases[0].text_re;
        assert!(re.is_match("Intro to Machine Learning"));
        assert!(re.is_match("machine\t learning basics"));
        assert!(!re.is_match("machine-assisted learning"));
        assert_eq!(patterns.phrases[0].url_needle, "machinelearning");
    }

    #[test]
    fn test_split_and_counts() {
        let patterns =
            KeywordPatterns::build(&["machine learning".into(), "neural".into()]);
        assert_eq!(patterns.phrases.len(), 1);
        assert_eq!(patterns.words.len(), 1);
        assert_eq!(patterns.keyword_count(), 2);
        assert!(patterns.has_phrase());
    }

    #[test]
    fn test_store_needles() {
        let needles = store_needles(&["machine learning".into(), "neural".into()]);
        assert_eq!(needles, vec!["machine", "learning", "neural"]);
    }
}
