use crate::error::ReferenceError;
use crate::models::Reference;
use crate::resolver::BookResolver;

/// Parses "Book Chapter:Verse" into a canonical `Reference`.
///
/// Splits on the first `:`; everything after it must be the verse number,
/// so "Genesis 1:1:2" is rejected. The chapter is the last whitespace
/// separated token before the colon and the rest is the book fragment.
/// The result is only syntactically valid: the chapter and verse may not
/// exist in the corpus.
pub fn parse_reference(text: &str, resolver: &BookResolver<'_>) -> Result<Reference, ReferenceError> {
    let (left, right) = text.split_once(':').ok_or(ReferenceError::MissingColon)?;

    let verse_token = right.trim();
    let verse = parse_number(verse_token)
        .ok_or_else(|| ReferenceError::InvalidVerse(verse_token.to_string()))?;

    let (book_part, chapter_token) = left
        .trim()
        .rsplit_once(char::is_whitespace)
        .ok_or(ReferenceError::MissingSeparator)?;
    let chapter = parse_number(chapter_token)
        .ok_or_else(|| ReferenceError::InvalidChapter(chapter_token.to_string()))?;

    let book = resolver.resolve(book_part)?;

    Ok(Reference::new(book, chapter, verse))
}

/// A run of ASCII digits. Values past `u64::MAX` saturate; no corpus key
/// reaches that far, so the reference simply finds nothing.
fn parse_number(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(token.parse::<u64>().unwrap_or(u64::MAX))
}

/// Whether a query looks like an attempted reference: it has a colon and
/// at least one digit.
pub fn looks_like_reference(text: &str) -> bool {
    text.contains(':') && text.chars().any(|c| c.is_ascii_digit())
}
