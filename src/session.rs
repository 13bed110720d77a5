use crate::bookmarks::BookmarkStore;
use crate::config::LookupConfig;
use crate::corpus::Corpus;
use crate::highlight::highlight;
use crate::history::QueryHistory;
use crate::logger::{DiagnosticLogger, LogLevel, SessionReport};
use crate::models::{Bookmark, SearchResult};
use crate::reference::looks_like_reference;
use crate::search::{SearchEngine, SearchMode, SearchReport};
use anyhow::{Context, Result};
use rand::Rng;
use serde_json::json;
use std::io::{BufRead, Write};

const MENU: &str = "\nMenu\n[0] Search\n[1] Browse\n[2] My bookmarks\n[3] Verse of the day\n[4] History\n[5] Exit\n";
const REFERENCE_HINT: &str =
    "That does not look like a valid reference. Use 'Book Chapter:Verse' (e.g. 'Gen 1:1'). Showing word matches instead.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Menu,
    Exit,
}

/// Everything one run of the program owns: the corpus it was started with
/// and the state built up while the user works with it.
pub struct Session {
    corpus: Corpus,
    history: QueryHistory,
    bookmarks: BookmarkStore,
    logger: DiagnosticLogger,
    config: LookupConfig,
}

impl Session {
    pub fn new(corpus: Corpus, logger: DiagnosticLogger, config: LookupConfig) -> Self {
        Session {
            corpus,
            history: QueryHistory::new(config.history_size),
            bookmarks: BookmarkStore::new(),
            logger,
            config,
        }
    }

    #[cfg(test)]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    #[cfg(test)]
    pub fn history(&self) -> &QueryHistory {
        &self.history
    }

    #[cfg(test)]
    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    pub fn search(&mut self, query: &str) -> SearchReport {
        let engine = SearchEngine::new(&self.corpus);
        let report = engine.search_detailed(query, &mut self.history);
        self.logger
            .search(query, report.mode.name(), report.results.len());
        report
    }

    pub fn verse_of_the_day<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SearchResult> {
        self.corpus.random_verse(rng).map(|entry| SearchResult {
            book: entry.book.to_string(),
            chapter: entry.chapter,
            verse: entry.verse,
            text: entry.text.to_string(),
        })
    }

    pub fn add_bookmark(&mut self, reference: &str) -> bool {
        let added = self.bookmarks.add_by_reference(&self.corpus, reference);
        if added {
            self.logger.log(
                LogLevel::Info,
                "Bookmark added".to_string(),
                Some(json!({ "reference": reference })),
            );
        }
        added
    }

    pub fn remove_bookmark_at(&mut self, position: usize) -> Option<Bookmark> {
        let removed = self.bookmarks.remove_at(position);
        if let Some(bookmark) = &removed {
            self.logger.log(
                LogLevel::Info,
                "Bookmark removed".to_string(),
                Some(json!({ "key": bookmark.key })),
            );
        }
        removed
    }

    /// `Book C:V - text`, with query words highlighted for text searches.
    pub fn format_result(&self, result: &SearchResult, mode: &SearchMode) -> String {
        let text = match mode {
            SearchMode::Text { tokens } if self.config.color => highlight(&result.text, tokens),
            _ => result.text.clone(),
        };
        format!("{} - {}", result.reference(), text)
    }

    /// Logs the end of the session, builds its report and prunes old logs.
    pub fn finish(&self) -> Result<SessionReport> {
        self.logger.log(
            LogLevel::Info,
            "Session ended".to_string(),
            Some(json!({
                "bookmarks": self.bookmarks.len(),
                "history": self.history.list(),
            })),
        );
        let report = self
            .logger
            .generate_report(self.corpus.stats())
            .context("Failed to generate session report")?;
        self.logger
            .rotate_logs(self.config.max_log_files)
            .context("Failed to rotate session logs")?;
        Ok(report)
    }

    /// Runs the numbered menu until the user exits or input ends.
    pub fn run_menu<I, O, R>(&mut self, input: &mut I, output: &mut O, rng: &mut R) -> Result<()>
    where
        I: BufRead,
        O: Write,
        R: Rng + ?Sized,
    {
        writeln!(output, "Welcome to the terminal scripture lookup!")?;

        loop {
            writeln!(output, "{}", MENU)?;
            let choice = match prompt(input, output, "Choose an option: ")? {
                Some(choice) => choice,
                None => break,
            };

            let flow = match choice.as_str() {
                "0" => self.search_menu(input, output)?,
                "1" => {
                    self.browse(output)?;
                    Flow::Menu
                }
                "2" => self.bookmarks_menu(input, output)?,
                "3" => {
                    match self.verse_of_the_day(rng) {
                        Some(result) => writeln!(output, "Verse of the Day:\n{} - {}", result.reference(), result.text)?,
                        None => writeln!(output, "The corpus is empty.")?,
                    }
                    Flow::Menu
                }
                "4" => self.history_menu(input, output)?,
                "5" => Flow::Exit,
                _ => {
                    writeln!(output, "Unknown option. Please enter a number from 0 to 5.")?;
                    Flow::Menu
                }
            };

            if flow == Flow::Exit {
                break;
            }
        }

        writeln!(output, "Goodbye!")?;
        Ok(())
    }

    fn search_menu<I: BufRead, O: Write>(&mut self, input: &mut I, output: &mut O) -> Result<Flow> {
        loop {
            let query = match prompt(
                input,
                output,
                "\nEnter a reference (e.g. gen 1:1) or words to search, or press Enter to cancel: ",
            )? {
                Some(query) => query,
                None => return Ok(Flow::Exit),
            };
            if query.is_empty() {
                return Ok(Flow::Menu);
            }

            self.print_search(&query, output)?;

            loop {
                let action = match prompt(
                    input,
                    output,
                    "\n[s] Search again  [a] Bookmark a verse  [Enter] Menu  [exit] Quit: ",
                )? {
                    Some(action) => action.to_lowercase(),
                    None => return Ok(Flow::Exit),
                };

                match action.as_str() {
                    "" => return Ok(Flow::Menu),
                    "s" => break,
                    "a" => {
                        let reference = match prompt(input, output, "Reference to bookmark: ")? {
                            Some(reference) => reference,
                            None => return Ok(Flow::Exit),
                        };
                        self.report_bookmark_add(&reference, output)?;
                    }
                    "exit" => return Ok(Flow::Exit),
                    _ => writeln!(output, "Unknown option.")?,
                }
            }
        }
    }

    fn print_search<O: Write>(&mut self, query: &str, output: &mut O) -> Result<()> {
        let report = self.search(query);

        let is_reference = matches!(report.mode, SearchMode::Reference { .. });
        if looks_like_reference(query) && !is_reference {
            writeln!(output, "{}", REFERENCE_HINT)?;
        }

        if report.results.is_empty() {
            writeln!(output, "No verses found.")?;
        }
        for result in &report.results {
            writeln!(output, "{}", self.format_result(result, &report.mode))?;
        }
        Ok(())
    }

    fn browse<O: Write>(&self, output: &mut O) -> Result<()> {
        for book in self.corpus.books() {
            writeln!(output, "- {}", book)?;
            for chapter in self.corpus.chapters(book) {
                writeln!(output, "  Chapter {}: {:?}", chapter, self.corpus.verses(book, chapter))?;
            }
        }
        Ok(())
    }

    fn bookmarks_menu<I: BufRead, O: Write>(&mut self, input: &mut I, output: &mut O) -> Result<Flow> {
        let action = match prompt(
            input,
            output,
            "Press Enter to view bookmarks, type a reference to add (e.g. 'Genesis 1:1'), 'remove' to delete or 'back': ",
        )? {
            Some(action) => action,
            None => return Ok(Flow::Exit),
        };

        match action.to_lowercase().as_str() {
            "" => {
                if self.bookmarks.is_empty() {
                    writeln!(output, "No bookmarks yet.")?;
                }
                for bookmark in self.bookmarks.list() {
                    writeln!(output, "{} - {}", bookmark.key, bookmark.text)?;
                }
            }
            "remove" => {
                if self.bookmarks.is_empty() {
                    writeln!(output, "No bookmarks to remove.")?;
                    return Ok(Flow::Menu);
                }
                for (idx, bookmark) in self.bookmarks.list().iter().enumerate() {
                    writeln!(output, "{}. {} - {}", idx + 1, bookmark.key, bookmark.text)?;
                }
                let answer = match prompt(input, output, "Enter index to remove: ")? {
                    Some(answer) => answer,
                    None => return Ok(Flow::Exit),
                };
                match answer.parse::<usize>() {
                    Ok(position) => match self.remove_bookmark_at(position) {
                        Some(_) => writeln!(output, "Bookmark removed.")?,
                        None => writeln!(output, "Invalid index.")?,
                    },
                    Err(_) => writeln!(output, "Invalid input.")?,
                }
            }
            "back" => {}
            "exit" => return Ok(Flow::Exit),
            _ => self.report_bookmark_add(&action, output)?,
        }

        Ok(Flow::Menu)
    }

    fn report_bookmark_add<O: Write>(&mut self, reference: &str, output: &mut O) -> Result<()> {
        if self.add_bookmark(reference) {
            writeln!(output, "Bookmark added.")?;
        } else {
            writeln!(
                output,
                "Couldn't add bookmark; ensure format is 'Book Chapter:Verse' and that the verse exists."
            )?;
        }
        Ok(())
    }

    fn history_menu<I: BufRead, O: Write>(&mut self, input: &mut I, output: &mut O) -> Result<Flow> {
        writeln!(output, "Search History (last {}):", self.history.capacity())?;
        if self.history.is_empty() {
            writeln!(output, "No search history yet.")?;
            return Ok(Flow::Menu);
        }
        for query in self.history.list() {
            writeln!(output, "- {}", query)?;
        }

        match prompt(input, output, "Type 'clear' to clear history or press Enter to return: ")? {
            Some(answer) if answer.eq_ignore_ascii_case("clear") => {
                self.history.clear();
                writeln!(output, "History cleared.")?;
                Ok(Flow::Menu)
            }
            Some(_) => Ok(Flow::Menu),
            None => Ok(Flow::Exit),
        }
    }
}

/// Writes `message`, then reads one trimmed line. `None` at end of input.
fn prompt<I: BufRead, O: Write>(input: &mut I, output: &mut O, message: &str) -> Result<Option<String>> {
    write!(output, "{}", message)?;
    output.flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
