mod bookmarks;
mod canon;
mod cli;
mod config;
mod corpus;
mod error;
#[cfg(test)]
mod fixtures;
mod highlight;
mod history;
mod loader;
mod logger;
mod matcher;
mod models;
mod reference;
mod resolver;
mod search;
mod session;
mod text_normalizer;

use crate::cli::Cli;
use crate::loader::{CorpusLoader, LoadReport};
use crate::logger::{DiagnosticLogger, LogLevel};
use crate::session::Session;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    let logger = if cli.no_log {
        DiagnosticLogger::in_memory()
    } else {
        DiagnosticLogger::new(&cli.log_dir).context("Failed to create logger")?
    };

    logger.info(format!("Session {} started", logger.session_id()));

    let loader = CorpusLoader::new().context("Failed to create corpus loader")?;
    let (corpus, load_report) = match loader.load_file(&cli.data, config.format) {
        Ok(loaded) => loaded,
        Err(e) => {
            logger.error(format!("{:#}", e), Some(serde_json::json!({ "path": cli.data })));
            return Err(e);
        }
    };
    log_load_report(&logger, &cli.data, &load_report);

    let mut session = Session::new(corpus, logger, config);

    if let Some(query) = &cli.query {
        let report = session.search(query);
        if cli.json {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize search report")?;
            println!("{}", json);
        } else if report.results.is_empty() {
            println!("No verses found.");
        } else {
            for result in &report.results {
                println!("{}", session.format_result(result, &report.mode));
            }
        }
    } else if cli.verse_of_the_day {
        let mut rng = seeded_rng(cli.seed);
        match session.verse_of_the_day(&mut rng) {
            Some(result) => println!("{} - {}", result.reference(), result.text),
            None => println!("The corpus is empty."),
        }
    } else {
        println!(
            "Loaded {} verse(s) in {} book(s) from {:?} ({:?} format)",
            load_report.stats.verses, load_report.stats.books, cli.data, load_report.format
        );
        if load_report.skipped > 0 {
            println!("Skipped {} malformed corpus entries; see the session log", load_report.skipped);
        }

        let mut rng = seeded_rng(cli.seed);
        let stdin = io::stdin();
        let stdout = io::stdout();
        session
            .run_menu(&mut stdin.lock(), &mut stdout.lock(), &mut rng)
            .context("Interactive session failed")?;
    }

    let report = session.finish()?;
    if report.summary.errors > 0 {
        eprintln!("Session finished with {} error(s)", report.summary.errors);
    }

    Ok(())
}

fn log_load_report(logger: &DiagnosticLogger, path: &Path, report: &LoadReport) {
    for warning in &report.warnings {
        logger.warning(warning.clone(), Some(serde_json::json!({ "path": path })));
    }
    logger.log(
        LogLevel::Info,
        format!("Loaded corpus from {:?}", path),
        Some(serde_json::json!({
            "path": path,
            "format": report.format,
            "sha256": report.sha256,
            "books": report.stats.books,
            "chapters": report.stats.chapters,
            "verses": report.stats.verses,
            "skipped": report.skipped,
        })),
    );
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
