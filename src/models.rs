use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved "Book Chapter:Verse" triple.
///
/// Resolution is syntactic: the book is canonical, but the chapter and
/// verse may still be absent from the corpus. They are wider than corpus
/// keys so that any typed number still forms a reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub book: String,
    pub chapter: u64,
    pub verse: u64,
}

impl Reference {
    pub fn new(book: impl Into<String>, chapter: u64, verse: u64) -> Self {
        Reference {
            book: book.into(),
            chapter,
            verse,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

/// One hit of a search, in corpus traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl SearchResult {
    pub fn reference(&self) -> Reference {
        Reference::new(self.book.clone(), self.chapter.into(), self.verse.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub key: String, // "Book Chapter:Verse"
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub books: usize,
    pub chapters: usize,
    pub verses: usize,
}
