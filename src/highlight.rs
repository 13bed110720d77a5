use regex::RegexBuilder;

const HIGHLIGHT_START: &str = "\x1b[93m";
const HIGHLIGHT_END: &str = "\x1b[0m";

/// Wraps every case-insensitive occurrence of each token in bright yellow,
/// keeping the text's own casing.
pub fn highlight(text: &str, tokens: &[String]) -> String {
    let mut alternatives: Vec<String> = tokens
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| regex::escape(t))
        .collect();
    // Alternation is leftmost-first, so longer tokens must come first.
    alternatives.sort_by(|a, b| b.len().cmp(&a.len()));
    if alternatives.is_empty() || text.is_empty() {
        return text.to_string();
    }

    // One alternation so a highlight never lands inside an escape sequence
    // inserted for an earlier token.
    let pattern = match RegexBuilder::new(&alternatives.join("|"))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(_) => return text.to_string(),
    };

    pattern
        .replace_all(text, |caps: &regex::Captures| {
            format!("{}{}{}", HIGHLIGHT_START, &caps[0], HIGHLIGHT_END)
        })
        .into_owned()
}
