//! Recoverable outcomes of book resolution and reference parsing.
//!
//! None of these are fatal: the search engine treats every
//! `ReferenceError` as "not a reference" and falls back to text search.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no book matches '{0}'")]
    NotFound(String),

    #[error("'{fragment}' is ambiguous: {}", .candidates.join(", "))]
    Ambiguous {
        fragment: String,
        candidates: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("missing ':' between chapter and verse")]
    MissingColon,

    #[error("invalid verse number '{0}'")]
    InvalidVerse(String),

    #[error("missing whitespace between book and chapter")]
    MissingSeparator,

    #[error("invalid chapter number '{0}'")]
    InvalidChapter(String),

    #[error("unknown book: {0}")]
    UnknownBook(#[from] ResolveError),
}
