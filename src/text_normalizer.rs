use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_BOOK_CHARS: Regex = Regex::new(r"[^a-z0-9\s]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref TOKEN: Regex = Regex::new(r"[\p{Alphabetic}\p{N}]+").unwrap();
}

/// Alphanumeric-normalized book name: trimmed, lowercased, stripped of
/// everything outside `[a-z0-9 ]`, whitespace runs collapsed to one space.
///
/// Digits are kept so that "1 Samuel" and "2 Samuel" stay distinct.
pub fn normalize_book(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let stripped = NON_BOOK_CHARS.replace_all(&lowered, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

/// Normalized form with every space removed ("1 samuel" -> "1samuel").
pub fn collapse(normalized: &str) -> String {
    normalized.chars().filter(|c| *c != ' ').collect()
}

/// Splits a free-text query into lowercase word tokens, each a maximal run
/// of alphanumeric characters.
pub fn tokenize(query: &str) -> Vec<String> {
    TOKEN
        .find_iter(query)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}
