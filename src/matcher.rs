//! Case-insensitive exact substring matching with Knuth-Morris-Pratt.
//!
//! Patterns are case-folded once when compiled; text is folded lazily while
//! it is scanned, so a match costs O(|pattern| + |text|) with no allocation
//! per verse.

use crate::text_normalizer::tokenize;

fn fold(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(char::to_lowercase)
}

/// A pattern with its precomputed prefix-overlap (failure) table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmpPattern {
    chars: Vec<char>,
    failure: Vec<usize>,
}

impl KmpPattern {
    pub fn new(pattern: &str) -> Self {
        let chars: Vec<char> = fold(pattern).collect();
        let failure = failure_table(&chars);
        KmpPattern { chars, failure }
    }

    /// True if the pattern occurs anywhere in `text`, ignoring case.
    /// An empty pattern or empty text never matches.
    pub fn is_match(&self, text: &str) -> bool {
        if self.chars.is_empty() {
            return false;
        }

        let mut matched = 0;
        for c in fold(text) {
            while matched > 0 && self.chars[matched] != c {
                matched = self.failure[matched - 1];
            }
            if self.chars[matched] == c {
                matched += 1;
                if matched == self.chars.len() {
                    return true;
                }
            }
        }
        false
    }
}

/// `failure[i]` is the length of the longest proper prefix of
/// `pattern[..=i]` that is also a suffix of it.
fn failure_table(pattern: &[char]) -> Vec<usize> {
    let mut failure = vec![0; pattern.len()];
    let mut k = 0;
    for i in 1..pattern.len() {
        while k > 0 && pattern[i] != pattern[k] {
            k = failure[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        failure[i] = k;
    }
    failure
}

/// Case-insensitive substring test.
#[allow(dead_code)]
pub fn contains(pattern: &str, text: &str) -> bool {
    KmpPattern::new(pattern).is_match(text)
}

/// Every query token must occur in the text (logical AND).
#[derive(Debug, Clone)]
pub struct TokenQuery {
    tokens: Vec<String>,
    patterns: Vec<KmpPattern>,
}

impl TokenQuery {
    pub fn parse(query: &str) -> Self {
        let tokens = tokenize(query);
        let patterns = tokens.iter().map(|t| KmpPattern::new(t)).collect();
        TokenQuery { tokens, patterns }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Stops at the first token that is missing. A query without tokens
    /// matches nothing.
    pub fn matches(&self, text: &str) -> bool {
        !self.patterns.is_empty() && self.patterns.iter().all(|p| p.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn naive_contains(pattern: &str, text: &str) -> bool {
        let pattern: Vec<char> = pattern.chars().flat_map(char::to_lowercase).collect();
        let text: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
        if pattern.is_empty() || text.is_empty() {
            return false;
        }
        if pattern.len() > text.len() {
            return false;
        }
        for start in 0..=text.len() - pattern.len() {
            let mut ok = true;
            for offset in 0..pattern.len() {
                if text[start + offset] != pattern[offset] {
                    ok = false;
                    break;
                }
            }
            if ok {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_failure_table() {
        let chars: Vec<char> = "abab".chars().collect();
        assert_eq!(failure_table(&chars), vec![0, 0, 1, 2]);

        let chars: Vec<char> = "aabaaab".chars().collect();
        assert_eq!(failure_table(&chars), vec![0, 1, 0, 1, 2, 2, 3]);

        assert!(failure_table(&[]).is_empty());
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let text = "In the beginning God created the heaven and the earth.";
        assert!(contains("god", text));
        assert!(contains("GOD CREATED", text));
        assert!(contains("Earth.", text));
        assert!(!contains("light", text));
    }

    #[test]
    fn test_contains_needs_fallback() {
        // Partial match "aab" must fall back rather than restart past it.
        assert!(contains("aab", "aaab"));
        assert!(contains("abac", "ababac"));
        assert!(!contains("abac", "ababab"));
    }

    #[test]
    fn test_degenerate_inputs_never_match() {
        assert!(!contains("", "some text"));
        assert!(!contains("god", ""));
        assert!(!contains("", ""));
        assert!(!contains("longer than text", "short"));
    }

    #[test]
    fn test_token_query_requires_every_token() {
        let query = TokenQuery::parse("god earth");
        assert_eq!(query.tokens(), &["god".to_string(), "earth".to_string()]);

        assert!(query.matches("In the beginning God created the heaven and the earth."));
        assert!(query.matches("the EARTH which GOD made"));
        assert!(!query.matches("For God so loved the world"));
        assert!(!query.matches("And the earth was without form"));
    }

    #[test]
    fn test_empty_token_query_matches_nothing() {
        let query = TokenQuery::parse(" ,.; ");
        assert!(query.is_empty());
        assert!(!query.matches("anything at all"));
    }

    proptest! {
        #[test]
        fn prop_agrees_with_naive_search(
            pattern in "[abAB]{0,6}",
            text in "[abAB ]{0,40}",
        ) {
            prop_assert_eq!(contains(&pattern, &text), naive_contains(&pattern, &text));
        }

        #[test]
        fn prop_any_slice_of_text_is_found(
            text in "[a-zA-Z ]{1,60}",
            start in 0usize..60,
            len in 1usize..10,
        ) {
            let start = start % text.len();
            let end = (start + len).min(text.len());
            let pattern = text[start..end].to_uppercase();
            prop_assert!(contains(&pattern, &text));
        }
    }
}
