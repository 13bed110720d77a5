use crate::error::ResolveError;
use crate::text_normalizer::{collapse, normalize_book};

/// Longest fragment the short-abbreviation stage applies to.
const SHORT_ABBREVIATION_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedBook {
    pub canonical: String,
    pub normalized: String,
    pub collapsed: String,
}

impl IndexedBook {
    fn new(canonical: &str) -> Self {
        let normalized = normalize_book(canonical);
        let collapsed = collapse(&normalized);
        IndexedBook {
            canonical: canonical.to_string(),
            normalized,
            collapsed,
        }
    }
}

/// Normalized book names derived from the corpus, in corpus book order.
///
/// Owned by `Corpus`, which rebuilds it whenever its book set changes.
#[derive(Debug, Clone, Default)]
pub struct BookIndex {
    entries: Vec<IndexedBook>,
}

impl BookIndex {
    pub fn build<'a>(books: impl IntoIterator<Item = &'a str>) -> Self {
        BookIndex {
            entries: books.into_iter().map(IndexedBook::new).collect(),
        }
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[allow(dead_code)]
    pub fn contains(&self, canonical: &str) -> bool {
        self.entries.iter().any(|e| e.canonical == canonical)
    }
}

/// Normalized user fragment in both its spaced and collapsed forms.
struct Fragment {
    key: String,
    collapsed: String,
}

type Stage = fn(&IndexedBook, &Fragment) -> bool;

fn exact(book: &IndexedBook, fragment: &Fragment) -> bool {
    book.normalized == fragment.key
}

fn exact_collapsed(book: &IndexedBook, fragment: &Fragment) -> bool {
    book.collapsed == fragment.collapsed
}

fn prefix(book: &IndexedBook, fragment: &Fragment) -> bool {
    [&book.normalized, &book.collapsed].iter().any(|name| {
        name.starts_with(fragment.key.as_str()) || name.starts_with(fragment.collapsed.as_str())
    })
}

fn reverse_prefix(book: &IndexedBook, fragment: &Fragment) -> bool {
    fragment.key.starts_with(book.normalized.as_str())
        || fragment.collapsed.starts_with(book.collapsed.as_str())
}

fn short_abbreviation(book: &IndexedBook, fragment: &Fragment) -> bool {
    if fragment.key.chars().count() > SHORT_ABBREVIATION_LEN {
        return false;
    }
    let head: String = fragment.key.chars().take(SHORT_ABBREVIATION_LEN).collect();
    book.normalized.starts_with(head.as_str())
}

/// Order matters: each stage runs only when every earlier one failed to
/// produce exactly one candidate.
const STAGES: [Stage; 5] = [
    exact,
    exact_collapsed,
    prefix,
    reverse_prefix,
    short_abbreviation,
];

/// Maps user-typed book fragments ("gen.", "1sam", "SONG OF") onto the
/// canonical names of a `BookIndex`.
pub struct BookResolver<'a> {
    index: &'a BookIndex,
}

impl<'a> BookResolver<'a> {
    pub fn new(index: &'a BookIndex) -> Self {
        BookResolver { index }
    }

    /// Returns the unique canonical book for `fragment`.
    ///
    /// Never picks among several candidates: a fragment that no stage can
    /// narrow to one book fails, as `Ambiguous` if some stage saw more than
    /// one candidate and `NotFound` otherwise. Books whose names normalize
    /// to nothing (no ASCII letters or digits) are never candidates.
    pub fn resolve(&self, fragment: &str) -> Result<&'a str, ResolveError> {
        let key = normalize_book(fragment);
        if key.is_empty() {
            return Err(ResolveError::NotFound(fragment.to_string()));
        }
        let fragment_forms = Fragment {
            collapsed: collapse(&key),
            key,
        };

        let mut first_ambiguity: Option<Vec<String>> = None;
        for stage in STAGES {
            let candidates: Vec<&'a IndexedBook> = self
                .index
                .entries
                .iter()
                .filter(|book| !book.normalized.is_empty() && stage(book, &fragment_forms))
                .collect();

            match candidates.as_slice() {
                &[only] => return Ok(only.canonical.as_str()),
                &[] => {}
                many => {
                    if first_ambiguity.is_none() {
                        first_ambiguity =
                            Some(many.iter().map(|b| b.canonical.clone()).collect());
                    }
                }
            }
        }

        Err(match first_ambiguity {
            Some(candidates) => ResolveError::Ambiguous {
                fragment: fragment.to_string(),
                candidates,
            },
            None => ResolveError::NotFound(fragment.to_string()),
        })
    }
}
