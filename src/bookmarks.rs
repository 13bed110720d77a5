use crate::corpus::Corpus;
use crate::models::{Bookmark, Reference};
use crate::reference::parse_reference;

/// Saved verses keyed by "Book Chapter:Verse", in the order they were added.
/// Lives only as long as the session.
#[derive(Debug, Clone, Default)]
pub struct BookmarkStore {
    entries: Vec<Bookmark>,
}

impl BookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bookmarks a verse, failing if the corpus does not contain it.
    /// Adding an existing key refreshes its text and keeps its position.
    pub fn add(&mut self, corpus: &Corpus, book: &str, chapter: u32, verse: u32) -> bool {
        let text = match corpus.lookup(book, chapter, verse) {
            Some(text) => text.to_string(),
            None => return false,
        };
        let key = Reference::new(book, chapter.into(), verse.into()).to_string();

        match self.entries.iter_mut().find(|b| b.key == key) {
            Some(existing) => existing.text = text,
            None => self.entries.push(Bookmark { key, text }),
        }
        true
    }

    /// Parses `reference` ("gen 1:1") and bookmarks the verse it names.
    pub fn add_by_reference(&mut self, corpus: &Corpus, reference: &str) -> bool {
        match parse_reference(reference, &corpus.resolver()) {
            Ok(parsed) => match (u32::try_from(parsed.chapter), u32::try_from(parsed.verse)) {
                (Ok(chapter), Ok(verse)) => self.add(corpus, &parsed.book, chapter, verse),
                _ => false,
            },
            Err(_) => false,
        }
    }

    #[allow(dead_code)]
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|b| b.key != key);
        self.entries.len() != before
    }

    /// Removes by 1-based position, as listed to the user.
    pub fn remove_at(&mut self, position: usize) -> Option<Bookmark> {
        if position == 0 || position > self.entries.len() {
            return None;
        }
        Some(self.entries.remove(position - 1))
    }

    pub fn list(&self) -> &[Bookmark] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
