use crate::canon::{book_by_number, heading_book, heading_chapter};
use crate::corpus::Corpus;
use crate::models::{CorpusStats, Reference};
use anyhow::{Context, Result};
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CorpusFormat {
    /// Detect from the content.
    Auto,
    /// `{"Genesis": {"1": {"1": "In the beginning..."}}}`
    Nested,
    /// `{"Genesis 1:1": "In the beginning..."}`
    Flat,
    /// `{"resultset": {"row": [{"field": [id, book, chapter, verse, text]}]}}`
    #[value(name = "resultset")]
    ResultSet,
    /// Book headings, `Chapter N` lines and `N text` verse lines.
    Text,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub format: CorpusFormat,
    pub sha256: String,
    pub stats: CorpusStats,
    pub skipped: usize,
    pub warnings: Vec<String>,
}

/// Corpus under construction plus everything noticed along the way.
struct LoadState {
    corpus: Corpus,
    skipped: usize,
    warnings: Vec<String>,
}

impl LoadState {
    fn new() -> Self {
        LoadState {
            corpus: Corpus::new(),
            skipped: 0,
            warnings: Vec::new(),
        }
    }

    fn skip(&mut self, message: String) {
        self.skipped += 1;
        self.warnings.push(message);
    }

    fn insert(&mut self, book: &str, chapter: u32, verse: u32, text: &str) {
        let text = text.trim();
        let reference = Reference::new(book, chapter.into(), verse.into());
        if text.is_empty() {
            self.skip(format!("Empty verse text for {}", reference));
            return;
        }
        if self.corpus.contains(book, chapter, verse) {
            self.warnings
                .push(format!("Duplicate verse {}; keeping the later text", reference));
        }
        self.corpus.insert(book, chapter, verse, text);
    }
}

pub struct CorpusLoader {
    flat_key_pattern: Regex,
    verse_pattern: Regex,
    chapter_pattern: Regex,
}

impl CorpusLoader {
    pub fn new() -> Result<Self> {
        Ok(CorpusLoader {
            flat_key_pattern: Regex::new(r"^(.+?)\s+(\d+):(\d+)$")
                .context("Failed to compile flat key pattern")?,
            verse_pattern: Regex::new(r"^\s*(\d+)\s+(.+)$")
                .context("Failed to compile verse pattern")?,
            chapter_pattern: Regex::new(r"^\s*(?:Chapter\s+)?(\d+)\s*$")
                .context("Failed to compile chapter pattern")?,
        })
    }

    pub fn load_file(&self, path: &Path, format: CorpusFormat) -> Result<(Corpus, LoadReport)> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus: {:?}", path))?;

        let (corpus, report) = self
            .load_str(&content, format)
            .with_context(|| format!("Failed to load corpus: {:?}", path))?;

        if corpus.is_empty() {
            return Err(anyhow::anyhow!("No verses found in corpus: {:?}", path));
        }

        Ok((corpus, report))
    }

    pub fn load_str(&self, content: &str, format: CorpusFormat) -> Result<(Corpus, LoadReport)> {
        let sha256 = hash_content(content);

        let (format, state) = match format {
            CorpusFormat::Text => (CorpusFormat::Text, self.load_text(content)),
            CorpusFormat::Auto => match serde_json::from_str::<Value>(content) {
                Ok(value) => {
                    let map = as_object(&value)?;
                    let detected = detect_json_format(map);
                    (detected, self.load_json(map, detected)?)
                }
                Err(_) => (CorpusFormat::Text, self.load_text(content)),
            },
            json_format => {
                let value: Value =
                    serde_json::from_str(content).context("Corpus is not valid JSON")?;
                (json_format, self.load_json(as_object(&value)?, json_format)?)
            }
        };

        let report = LoadReport {
            format,
            sha256,
            stats: state.corpus.stats(),
            skipped: state.skipped,
            warnings: state.warnings,
        };
        Ok((state.corpus, report))
    }

    fn load_json(&self, map: &Map<String, Value>, format: CorpusFormat) -> Result<LoadState> {
        match format {
            CorpusFormat::Nested => Ok(load_nested(map)),
            CorpusFormat::Flat => Ok(self.load_flat(map)),
            CorpusFormat::ResultSet => load_result_set(map),
            other => Err(anyhow::anyhow!("{:?} is not a JSON corpus format", other)),
        }
    }

    fn load_flat(&self, map: &Map<String, Value>) -> LoadState {
        let mut state = LoadState::new();

        for (key, value) in map {
            let captures = match self.flat_key_pattern.captures(key.trim()) {
                Some(caps) => caps,
                None => {
                    state.skip(format!("Unrecognized reference key '{}'", key));
                    continue;
                }
            };
            let book = captures[1].trim();
            let (chapter, verse) = match (captures[2].parse::<u32>(), captures[3].parse::<u32>()) {
                (Ok(c), Ok(v)) => (c, v),
                _ => {
                    state.skip(format!("Chapter or verse out of range in '{}'", key));
                    continue;
                }
            };
            match value.as_str() {
                Some(text) => state.insert(book, chapter, verse, text),
                None => state.skip(format!("Verse text for '{}' is not a string", key)),
            }
        }

        state
    }

    fn load_text(&self, content: &str) -> LoadState {
        let mut state = LoadState::new();
        let mut current_book: Option<&'static str> = None;
        let mut current_chapter: Option<u32> = None;

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(book) = heading_book(line) {
                current_book = Some(book);
                current_chapter = heading_chapter(line);
                continue;
            }

            if let Some(chapter) = self.extract_chapter_number(line) {
                current_chapter = Some(chapter);
                continue;
            }

            let captures = match self.verse_pattern.captures(line) {
                Some(caps) => caps,
                None => {
                    state.skip(format!("Line {}: not a heading, chapter or verse", line_no + 1));
                    continue;
                }
            };

            match (current_book, current_chapter, captures[1].parse::<u32>()) {
                (Some(book), Some(chapter), Ok(verse)) => {
                    state.insert(book, chapter, verse, &captures[2]);
                }
                (None, _, _) => state.skip(format!("Line {}: verse before any book heading", line_no + 1)),
                (_, None, _) => state.skip(format!("Line {}: verse before any chapter", line_no + 1)),
                (_, _, Err(_)) => state.skip(format!("Line {}: verse number out of range", line_no + 1)),
            }
        }

        state
    }

    fn extract_chapter_number(&self, line: &str) -> Option<u32> {
        self.chapter_pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
    }
}

fn as_object(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("Corpus JSON must be an object at the top level"))
}

fn detect_json_format(map: &Map<String, Value>) -> CorpusFormat {
    if map.contains_key("resultset") {
        CorpusFormat::ResultSet
    } else if map.keys().any(|k| k.contains(':')) {
        CorpusFormat::Flat
    } else {
        CorpusFormat::Nested
    }
}

fn load_nested(map: &Map<String, Value>) -> LoadState {
    let mut state = LoadState::new();

    for (book, chapters) in map {
        let book = book.trim();
        let chapters = match chapters.as_object() {
            Some(chapters) => chapters,
            None => {
                state.skip(format!("Book '{}' does not hold a chapter map", book));
                continue;
            }
        };

        for (chapter_key, verses) in chapters {
            let chapter = match chapter_key.trim().parse::<u32>() {
                Ok(chapter) => chapter,
                Err(_) => {
                    state.skip(format!("{}: invalid chapter key '{}'", book, chapter_key));
                    continue;
                }
            };
            let verses = match verses.as_object() {
                Some(verses) => verses,
                None => {
                    state.skip(format!("{} {}: chapter does not hold a verse map", book, chapter));
                    continue;
                }
            };

            for (verse_key, text) in verses {
                let verse = match verse_key.trim().parse::<u32>() {
                    Ok(verse) => verse,
                    Err(_) => {
                        state.skip(format!("{} {}: invalid verse key '{}'", book, chapter, verse_key));
                        continue;
                    }
                };
                match text.as_str() {
                    Some(text) => state.insert(book, chapter, verse, text),
                    None => state.skip(format!(
                        "Verse text for {} is not a string",
                        Reference::new(book, chapter.into(), verse.into())
                    )),
                }
            }
        }
    }

    state
}

fn load_result_set(map: &Map<String, Value>) -> Result<LoadState> {
    let rows = map
        .get("resultset")
        .and_then(|rs| rs.get("row"))
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow::anyhow!("Invalid result set: missing 'resultset' or 'row' key"))?;

    let mut state = LoadState::new();

    for (idx, row) in rows.iter().enumerate() {
        let fields = match row.get("field").and_then(Value::as_array) {
            Some(fields) if fields.len() >= 5 => fields,
            _ => {
                state.skip(format!("Row {}: expected 5 fields", idx));
                continue;
            }
        };

        let book = fields[1].as_u64().and_then(book_by_number);
        let chapter = fields[2].as_u64().and_then(|n| u32::try_from(n).ok());
        let verse = fields[3].as_u64().and_then(|n| u32::try_from(n).ok());

        match (book, chapter, verse, fields[4].as_str()) {
            (Some(book), Some(chapter), Some(verse), Some(text)) => {
                state.insert(book, chapter, verse, text)
            }
            (None, ..) => state.skip(format!("Row {}: unknown book number {}", idx, fields[1])),
            _ => state.skip(format!("Row {}: malformed chapter, verse or text", idx)),
        }
    }

    Ok(state)
}

fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn loader() -> CorpusLoader {
        CorpusLoader::new().unwrap()
    }

    #[test]
    fn test_load_nested_preserves_order() {
        let json = r#"{
            "John": {"3": {"16": "For God so loved the world"}},
            "Genesis": {"2": {"7": "And the LORD God formed man"}, "1": {"1": "In the beginning"}}
        }"#;

        let (corpus, report) = loader().load_str(json, CorpusFormat::Auto).unwrap();

        assert_eq!(report.format, CorpusFormat::Nested);
        assert_eq!(corpus.books().collect::<Vec<_>>(), vec!["John", "Genesis"]);
        assert_eq!(corpus.chapters("Genesis"), vec![2, 1]);
        assert_eq!(corpus.lookup("Genesis", 1, 1), Some("In the beginning"));
        assert_eq!(report.stats.verses, 3);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_load_flat() {
        let json = r#"{
            "Genesis 1:1": "In the beginning God created the heaven and the earth.",
            "1 Samuel 3:10": "Speak; for thy servant heareth.",
            "Song of Solomon 2:1": "I am the rose of Sharon",
            "weird key": "skipped"
        }"#;

        let (corpus, report) = loader().load_str(json, CorpusFormat::Auto).unwrap();

        assert_eq!(report.format, CorpusFormat::Flat);
        assert_eq!(
            corpus.books().collect::<Vec<_>>(),
            vec!["Genesis", "1 Samuel", "Song of Solomon"]
        );
        assert_eq!(corpus.lookup("1 Samuel", 3, 10), Some("Speak; for thy servant heareth."));
        assert_eq!(report.skipped, 1);
        assert!(report.warnings[0].contains("weird key"));
    }

    #[test]
    fn test_load_result_set() {
        let json = r#"{"resultset": {"row": [
            {"field": [1001001, 1, 1, 1, "In the beginning God created the heaven and the earth."]},
            {"field": [43003016, 43, 3, 16, "For God so loved the world"]},
            {"field": [99001001, 99, 1, 1, "No such book"]},
            {"field": [1]}
        ]}}"#;

        let (corpus, report) = loader().load_str(json, CorpusFormat::Auto).unwrap();

        assert_eq!(report.format, CorpusFormat::ResultSet);
        assert_eq!(corpus.books().collect::<Vec<_>>(), vec!["Genesis", "John"]);
        assert_eq!(corpus.lookup("John", 3, 16), Some("For God so loved the world"));
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn test_result_set_without_rows_is_an_error() {
        let json = r#"{"resultset": {"rows": []}}"#;
        assert!(loader().load_str(json, CorpusFormat::Auto).is_err());
    }

    #[test]
    fn test_load_plain_text() {
        let text = "Genesis\nChapter 1\n1 In the beginning God created the heaven and the earth.\n2 And the earth was without form, and void;\n\nPsalm 23\n1 The LORD is my shepherd; I shall not want.\n1 John\n4\n8 He that loveth not knoweth not God; for God is love.";

        let (corpus, report) = loader().load_str(text, CorpusFormat::Auto).unwrap();

        assert_eq!(report.format, CorpusFormat::Text);
        assert_eq!(
            corpus.books().collect::<Vec<_>>(),
            vec!["Genesis", "Psalms", "1 John"]
        );
        assert_eq!(corpus.verses("Genesis", 1), vec![1, 2]);
        assert_eq!(
            corpus.lookup("Psalms", 23, 1),
            Some("The LORD is my shepherd; I shall not want.")
        );
        assert!(corpus.contains("1 John", 4, 8));
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_plain_text_verse_before_heading_is_skipped() {
        let text = "1 Orphan verse\nGenesis 1\n1 In the beginning";
        let (corpus, report) = loader().load_str(text, CorpusFormat::Text).unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(corpus.lookup("Genesis", 1, 1), Some("In the beginning"));
    }

    #[test]
    fn test_empty_and_duplicate_verses() {
        let json = r#"{
            "Genesis 1:1": "first",
            "Genesis  1:1": "second",
            "Genesis 1:2": "   "
        }"#;

        let (corpus, report) = loader().load_str(json, CorpusFormat::Flat).unwrap();

        assert_eq!(corpus.lookup("Genesis", 1, 1), Some("second"));
        assert_eq!(corpus.lookup("Genesis", 1, 2), None);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_explicit_json_format_rejects_text() {
        assert!(loader().load_str("Genesis\n1 In the beginning", CorpusFormat::Nested).is_err());
        assert!(loader().load_str("[1, 2, 3]", CorpusFormat::Auto).is_err());
    }

    #[test]
    fn test_load_file_and_checksum() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"Genesis 1:1": "In the beginning"}}"#).unwrap();

        let (corpus, report) = loader().load_file(file.path(), CorpusFormat::Auto).unwrap();
        assert_eq!(corpus.stats().verses, 1);
        assert_eq!(report.sha256.len(), 64);

        let (_, again) = loader().load_file(file.path(), CorpusFormat::Auto).unwrap();
        assert_eq!(report.sha256, again.sha256);
    }

    #[test]
    fn test_missing_or_empty_file_is_fatal() {
        let missing = Path::new("/nonexistent/corpus.json");
        assert!(loader().load_file(missing, CorpusFormat::Auto).is_err());

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();
        assert!(loader().load_file(file.path(), CorpusFormat::Auto).is_err());
    }
}
