use crate::corpus::Corpus;
use crate::history::QueryHistory;
use crate::matcher::TokenQuery;
use crate::models::{Reference, SearchResult};
use crate::reference::parse_reference;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SearchMode {
    /// The query parsed as a reference; no text search was attempted.
    Reference { reference: Reference },
    Text { tokens: Vec<String> },
    /// Neither a reference nor any word tokens.
    Empty,
}

impl SearchMode {
    pub fn name(&self) -> &'static str {
        match self {
            SearchMode::Reference { .. } => "reference",
            SearchMode::Text { .. } => "text",
            SearchMode::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    #[serde(flatten)]
    pub mode: SearchMode,
    pub results: Vec<SearchResult>,
}

/// Resolves queries against a corpus: reference lookup first, then an
/// all-tokens text scan in corpus order. Results are never ranked.
pub struct SearchEngine<'a> {
    corpus: &'a Corpus,
}

impl<'a> SearchEngine<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        SearchEngine { corpus }
    }

    #[allow(dead_code)]
    pub fn search(&self, query: &str, history: &mut QueryHistory) -> Vec<SearchResult> {
        self.search_detailed(query, history).results
    }

    /// Every call records `query` in `history`, whatever the outcome.
    pub fn search_detailed(&self, query: &str, history: &mut QueryHistory) -> SearchReport {
        let report = self.run(query);
        history.record(query);
        report
    }

    fn run(&self, query: &str) -> SearchReport {
        if let Ok(reference) = parse_reference(query, &self.corpus.resolver()) {
            // Numbers beyond the corpus key range name no stored verse.
            let results = match (u32::try_from(reference.chapter), u32::try_from(reference.verse)) {
                (Ok(chapter), Ok(verse)) => self
                    .corpus
                    .lookup(&reference.book, chapter, verse)
                    .map(|text| SearchResult {
                        book: reference.book.clone(),
                        chapter,
                        verse,
                        text: text.to_string(),
                    })
                    .into_iter()
                    .collect(),
                _ => Vec::new(),
            };
            return SearchReport {
                mode: SearchMode::Reference { reference },
                results,
            };
        }

        let token_query = TokenQuery::parse(query);
        if token_query.is_empty() {
            return SearchReport {
                mode: SearchMode::Empty,
                results: Vec::new(),
            };
        }

        let results = self
            .corpus
            .iter_verses()
            .filter(|entry| token_query.matches(entry.text))
            .map(|entry| SearchResult {
                book: entry.book.to_string(),
                chapter: entry.chapter,
                verse: entry.verse,
                text: entry.text.to_string(),
            })
            .collect();

        SearchReport {
            mode: SearchMode::Text {
                tokens: token_query.tokens().to_vec(),
            },
            results,
        }
    }
}
