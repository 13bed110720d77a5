use crate::config::{LookupConfig, DEFAULT_MAX_LOG_FILES};
use crate::history::DEFAULT_HISTORY_SIZE;
use crate::loader::CorpusFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scripture-lookup")]
#[command(about = "Look up and search verses in a scripture corpus", long_about = None)]
pub struct Cli {
    #[arg(long, help = "Corpus file (nested JSON, flat JSON, result set JSON or plain text)")]
    pub data: PathBuf,

    #[arg(long, value_enum, default_value_t = CorpusFormat::Auto, help = "Corpus format")]
    pub format: CorpusFormat,

    #[arg(long, default_value = "logs", help = "Log directory")]
    pub log_dir: PathBuf,

    #[arg(long, help = "Do not write session logs")]
    pub no_log: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_LOG_FILES, help = "Number of session logs to keep")]
    pub max_logs: usize,

    #[arg(long, default_value_t = DEFAULT_HISTORY_SIZE, help = "Number of recent queries to remember")]
    pub history_size: usize,

    #[arg(long, help = "Disable highlighting of matched words")]
    pub no_color: bool,

    #[arg(long, help = "Run a single search and exit")]
    pub query: Option<String>,

    #[arg(long, requires = "query", help = "Print the search report as JSON")]
    pub json: bool,

    #[arg(long, conflicts_with = "query", help = "Print a random verse and exit")]
    pub verse_of_the_day: bool,

    #[arg(long, help = "Seed for the verse of the day")]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn config(&self) -> LookupConfig {
        LookupConfig::new(self.history_size, !self.no_color, self.max_logs, self.format)
    }
}
