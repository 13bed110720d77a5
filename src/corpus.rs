use crate::models::CorpusStats;
use crate::resolver::{BookIndex, BookResolver};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub number: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub number: u32,
    pub verses: Vec<Verse>,
}

impl Chapter {
    fn verse(&self, number: u32) -> Option<&Verse> {
        self.verses.iter().find(|v| v.number == number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub name: String,
    pub chapters: Vec<Chapter>,
}

impl Book {
    fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.number == number)
    }
}

/// A verse visited by `Corpus::iter_verses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseEntry<'a> {
    pub book: &'a str,
    pub chapter: u32,
    pub verse: u32,
    pub text: &'a str,
}

/// Book -> chapter -> verse text, kept in insertion order at every level.
///
/// Keys are unique within their parent. The normalized book index is
/// rebuilt every time a new book is added, so it always names exactly the
/// books present.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    books: Vec<Book>,
    positions: HashMap<String, usize>,
    index: BookIndex,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `text` under (book, chapter, verse), replacing any previous
    /// text for that key without changing its position.
    pub fn insert(&mut self, book: &str, chapter: u32, verse: u32, text: impl Into<String>) {
        let text = text.into();
        let book_pos = match self.positions.get(book) {
            Some(&pos) => pos,
            None => {
                self.books.push(Book {
                    name: book.to_string(),
                    chapters: Vec::new(),
                });
                let pos = self.books.len() - 1;
                self.positions.insert(book.to_string(), pos);
                self.rebuild_index();
                pos
            }
        };

        let chapters = &mut self.books[book_pos].chapters;
        let chapter_pos = match chapters.iter().position(|c| c.number == chapter) {
            Some(pos) => pos,
            None => {
                chapters.push(Chapter {
                    number: chapter,
                    verses: Vec::new(),
                });
                chapters.len() - 1
            }
        };

        let verses = &mut chapters[chapter_pos].verses;
        match verses.iter_mut().find(|v| v.number == verse) {
            Some(existing) => existing.text = text,
            None => verses.push(Verse {
                number: verse,
                text,
            }),
        }
    }

    /// Whether (book, chapter, verse) is already present.
    pub fn contains(&self, book: &str, chapter: u32, verse: u32) -> bool {
        self.lookup(book, chapter, verse).is_some()
    }

    fn rebuild_index(&mut self) {
        self.index = BookIndex::build(self.books.iter().map(|b| b.name.as_str()));
    }

    pub fn index(&self) -> &BookIndex {
        &self.index
    }

    pub fn resolver(&self) -> BookResolver<'_> {
        BookResolver::new(self.index())
    }

    pub fn lookup(&self, book: &str, chapter: u32, verse: u32) -> Option<&str> {
        self.book(book)?
            .chapter(chapter)?
            .verse(verse)
            .map(|v| v.text.as_str())
    }

    pub fn book(&self, name: &str) -> Option<&Book> {
        self.positions.get(name).map(|&pos| &self.books[pos])
    }

    pub fn books(&self) -> impl Iterator<Item = &str> + '_ {
        self.books.iter().map(|b| b.name.as_str())
    }

    /// Chapter numbers of `book` in stored order; empty for an unknown book.
    pub fn chapters(&self, book: &str) -> Vec<u32> {
        self.book(book)
            .map(|b| b.chapters.iter().map(|c| c.number).collect())
            .unwrap_or_default()
    }

    pub fn verses(&self, book: &str, chapter: u32) -> Vec<u32> {
        self.book(book)
            .and_then(|b| b.chapter(chapter))
            .map(|c| c.verses.iter().map(|v| v.number).collect())
            .unwrap_or_default()
    }

    /// Every verse in traversal order: books, then chapters, then verses.
    pub fn iter_verses(&self) -> impl Iterator<Item = VerseEntry<'_>> + '_ {
        self.books.iter().flat_map(|book| {
            book.chapters.iter().flat_map(move |chapter| {
                chapter.verses.iter().map(move |verse| VerseEntry {
                    book: book.name.as_str(),
                    chapter: chapter.number,
                    verse: verse.number,
                    text: verse.text.as_str(),
                })
            })
        })
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            books: self.books.len(),
            chapters: self.books.iter().map(|b| b.chapters.len()).sum(),
            verses: self
                .books
                .iter()
                .flat_map(|b| b.chapters.iter())
                .map(|c| c.verses.len())
                .sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stats().verses == 0
    }

    /// Picks a random book, then a random chapter of it, then a random verse
    /// of that chapter. Books with few verses are therefore favoured over a
    /// uniform pick across all verses.
    pub fn random_verse<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<VerseEntry<'_>> {
        let populated: Vec<&Book> = self
            .books
            .iter()
            .filter(|b| b.chapters.iter().any(|c| !c.verses.is_empty()))
            .collect();
        let book: &Book = *populated.choose(rng)?;

        let chapters: Vec<&Chapter> = book
            .chapters
            .iter()
            .filter(|c| !c.verses.is_empty())
            .collect();
        let chapter: &Chapter = *chapters.choose(rng)?;
        let verse = chapter.verses.choose(rng)?;

        Some(VerseEntry {
            book: book.name.as_str(),
            chapter: chapter.number,
            verse: verse.number,
            text: verse.text.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_corpus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_lookup() {
        let corpus = sample_corpus();

        assert_eq!(
            corpus.lookup("Genesis", 1, 1),
            Some("In the beginning God created the heaven and the earth.")
        );
        assert_eq!(corpus.lookup("Genesis", 1, 99), None);
        assert_eq!(corpus.lookup("Genesis", 99, 1), None);
        assert_eq!(corpus.lookup("Exodus", 1, 1), None);
    }

    #[test]
    fn test_insertion_order_is_traversal_order() {
        let mut corpus = Corpus::new();
        corpus.insert("John", 3, 16, "For God so loved the world");
        corpus.insert("Genesis", 2, 7, "And the LORD God formed man");
        corpus.insert("Genesis", 1, 2, "And the earth was without form");
        corpus.insert("Genesis", 1, 1, "In the beginning");

        assert_eq!(corpus.books().collect::<Vec<_>>(), vec!["John", "Genesis"]);
        assert_eq!(corpus.chapters("Genesis"), vec![2, 1]);
        assert_eq!(corpus.verses("Genesis", 1), vec![2, 1]);

        let order: Vec<(&str, u32, u32)> = corpus
            .iter_verses()
            .map(|v| (v.book, v.chapter, v.verse))
            .collect();
        assert_eq!(
            order,
            vec![("John", 3, 16), ("Genesis", 2, 7), ("Genesis", 1, 2), ("Genesis", 1, 1)]
        );
    }

    #[test]
    fn test_reinsert_replaces_text_in_place() {
        let mut corpus = Corpus::new();
        corpus.insert("Genesis", 1, 1, "old");
        corpus.insert("Genesis", 1, 2, "second");
        corpus.insert("Genesis", 1, 1, "new");

        assert_eq!(corpus.lookup("Genesis", 1, 1), Some("new"));
        assert_eq!(corpus.verses("Genesis", 1), vec![1, 2]);
        assert_eq!(corpus.stats().verses, 2);
    }

    #[test]
    fn test_unknown_book_has_no_chapters() {
        let corpus = sample_corpus();
        assert!(corpus.chapters("Leviticus").is_empty());
        assert!(corpus.verses("Genesis", 42).is_empty());
    }

    #[test]
    fn test_index_tracks_books() {
        let mut corpus = Corpus::new();
        assert!(corpus.index().is_empty());

        corpus.insert("Genesis", 1, 1, "In the beginning");
        corpus.insert("Genesis", 1, 2, "And the earth");
        assert_eq!(corpus.index().len(), 1);

        corpus.insert("1 Samuel", 3, 10, "Speak; for thy servant heareth.");
        assert_eq!(corpus.index().len(), 2);
        assert!(corpus.index().contains("1 Samuel"));
        for book in corpus.books() {
            assert!(corpus.index().contains(book));
        }
        assert_eq!(corpus.resolver().resolve("1sam"), Ok("1 Samuel"));
    }

    #[test]
    fn test_stats_and_browse_order() {
        let corpus = sample_corpus();
        let stats = corpus.stats();
        assert_eq!(stats.books, corpus.books().count());
        assert_eq!(stats.verses, corpus.iter_verses().count());

        assert_eq!(corpus.books().next(), Some("Genesis"));
        assert_eq!(corpus.chapters("Genesis"), vec![1, 2]);
        assert_eq!(corpus.verses("Genesis", 1), vec![1, 2, 3]);
    }

    #[test]
    fn test_random_verse_is_deterministic_with_seed() {
        let corpus = sample_corpus();

        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let a = corpus.random_verse(&mut rng_a).unwrap();
        let b = corpus.random_verse(&mut rng_b).unwrap();

        assert_eq!(a, b);
        assert_eq!(corpus.lookup(a.book, a.chapter, a.verse), Some(a.text));
    }

    #[test]
    fn test_random_verse_on_empty_corpus() {
        let corpus = Corpus::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(corpus.is_empty());
        assert!(corpus.random_verse(&mut rng).is_none());
    }
}
