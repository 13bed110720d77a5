use crate::models::CorpusStats;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use walkdir::WalkDir;

const SESSION_PREFIX: &str = "session-";
const SESSION_SUFFIX: &str = ".jsonl";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub timestamp: String,
    pub summary: ReportSummary,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub searches: usize,
    pub corpus: CorpusStats,
}

#[derive(Debug, Default)]
struct Counters {
    errors: usize,
    warnings: usize,
    searches: usize,
}

/// Session diagnostics: every entry is kept in memory and, when a log
/// directory is configured, appended as one JSON line to
/// `session-<id>.jsonl`.
#[derive(Clone)]
pub struct DiagnosticLogger {
    log_dir: Option<PathBuf>,
    log_file: Arc<Mutex<Option<BufWriter<File>>>>,
    session_id: String,
    entries: Arc<Mutex<Vec<LogEntry>>>,
    counters: Arc<Mutex<Counters>>,
}

impl DiagnosticLogger {
    pub fn new(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

        let session_id = Utc::now().format("%Y%m%d-%H%M%S").to_string();
        let log_file_path = log_dir.join(format!("{}{}{}", SESSION_PREFIX, session_id, SESSION_SUFFIX));

        let log_file = Some(BufWriter::new(
            File::create(&log_file_path)
                .with_context(|| format!("Failed to create log file: {:?}", log_file_path))?,
        ));

        Ok(DiagnosticLogger {
            log_dir: Some(log_dir.to_path_buf()),
            log_file: Arc::new(Mutex::new(log_file)),
            session_id,
            entries: Arc::new(Mutex::new(Vec::new())),
            counters: Arc::new(Mutex::new(Counters::default())),
        })
    }

    /// A logger that never touches the filesystem.
    pub fn in_memory() -> Self {
        DiagnosticLogger {
            log_dir: None,
            log_file: Arc::new(Mutex::new(None)),
            session_id: Utc::now().format("%Y%m%d-%H%M%S").to_string(),
            entries: Arc::new(Mutex::new(Vec::new())),
            counters: Arc::new(Mutex::new(Counters::default())),
        }
    }

    pub fn log(&self, level: LogLevel, message: String, context: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            level: level.clone(),
            message,
            context,
        };

        if let Ok(mut counters) = self.counters.lock() {
            match level {
                LogLevel::Error => counters.errors += 1,
                LogLevel::Warning => counters.warnings += 1,
                LogLevel::Info => {}
            }
        }

        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                if let Ok(json) = serde_json::to_string(&entry) {
                    let _ = writeln!(file, "{}", json);
                }
            }
        }

        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    pub fn info(&self, message: String) {
        self.log(LogLevel::Info, message, None);
    }

    pub fn warning(&self, message: String, context: Option<serde_json::Value>) {
        self.log(LogLevel::Warning, message, context);
    }

    pub fn error(&self, message: String, context: Option<serde_json::Value>) {
        self.log(LogLevel::Error, message, context);
    }

    pub fn search(&self, query: &str, mode: &str, hits: usize) {
        if let Ok(mut counters) = self.counters.lock() {
            counters.searches += 1;
        }
        self.log(
            LogLevel::Info,
            format!("Search '{}' returned {} result(s)", query, hits),
            Some(serde_json::json!({
                "query": query,
                "mode": mode,
                "hits": hits,
            })),
        );
    }

    pub fn generate_report(&self, corpus: CorpusStats) -> Result<SessionReport> {
        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                file.flush()
                    .context("Failed to flush log file before generating report")?;
            }
        }

        let (errors, warnings, searches) = self
            .counters
            .lock()
            .map(|c| (c.errors, c.warnings, c.searches))
            .unwrap_or_default();
        let entries = self
            .entries
            .lock()
            .map(|e| e.to_vec())
            .unwrap_or_default();

        Ok(SessionReport {
            session_id: self.session_id.clone(),
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            summary: ReportSummary {
                errors,
                warnings,
                searches,
                corpus,
            },
            entries,
        })
    }

    /// Deletes the oldest session logs so at most `max_sessions` remain.
    pub fn rotate_logs(&self, max_sessions: usize) -> Result<()> {
        let log_dir = match &self.log_dir {
            Some(dir) => dir,
            None => return Ok(()),
        };

        let mut session_files: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();

        for entry in WalkDir::new(log_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if let Some(file_name) = entry.file_name().to_str() {
                if file_name.starts_with(SESSION_PREFIX) && file_name.ends_with(SESSION_SUFFIX) {
                    if let Ok(metadata) = entry.metadata() {
                        if let Ok(modified) = metadata.modified() {
                            let datetime: DateTime<Utc> = modified.into();
                            session_files.push((entry.path().to_path_buf(), datetime));
                        }
                    }
                }
            }
        }

        if session_files.len() > max_sessions {
            session_files.sort_by(|a, b| a.1.cmp(&b.1));

            let to_delete = session_files.len() - max_sessions;
            for (path, _) in session_files.iter().take(to_delete) {
                fs::remove_file(path)
                    .with_context(|| format!("Failed to delete old log file: {:?}", path))?;
            }
        }

        Ok(())
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Drop for DiagnosticLogger {
    fn drop(&mut self) {
        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                let _ = file.flush();
            }
        }
    }
}
