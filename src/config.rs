use crate::history::DEFAULT_HISTORY_SIZE;
use crate::loader::CorpusFormat;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_LOG_FILES: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    pub history_size: usize,
    pub color: bool,
    pub max_log_files: usize,
    pub format: CorpusFormat,
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            history_size: DEFAULT_HISTORY_SIZE,
            color: true,
            max_log_files: DEFAULT_MAX_LOG_FILES,
            format: CorpusFormat::Auto,
        }
    }
}

impl LookupConfig {
    pub fn new(history_size: usize, color: bool, max_log_files: usize, format: CorpusFormat) -> Self {
        LookupConfig {
            history_size,
            color,
            max_log_files,
            format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LookupConfig::default();
        assert_eq!(config.history_size, 5);
        assert!(config.color);
        assert_eq!(config.max_log_files, 10);
        assert_eq!(config.format, CorpusFormat::Auto);
    }

    #[test]
    fn test_config_serializes_format_lowercase() {
        let config = LookupConfig::new(3, false, 2, CorpusFormat::ResultSet);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["format"], "resultset");
        assert_eq!(json["history_size"], 3);
    }
}
