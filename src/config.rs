use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;

const MEGABYTE: u64 = 1024 * 1024;

/// Runtime settings for the MCP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Workbooks larger than this are rejected before decoding
    pub max_file_size_bytes: u64,
    pub log_level: LevelFilter,
    /// Extra log destination besides stderr
    pub log_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 200 * MEGABYTE, // Max 200MB per file
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl ServerConfig {
    /// Read `WORKBOOK_MAX_FILE_MB`, `WORKBOOK_LOG_FILE` and `RUST_LOG`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("WORKBOOK_MAX_FILE_MB") {
            match raw.trim().parse::<u64>() {
                Ok(mb) if mb > 0 => config.max_file_size_bytes = mb * MEGABYTE,
                _ => eprintln!(
                    "Warning: invalid WORKBOOK_MAX_FILE_MB '{}', using default (200)",
                    raw
                ),
            }
        }

        if let Some(raw) = lookup("RUST_LOG") {
            match LevelFilter::from_str(raw.trim()) {
                Ok(level) => config.log_level = level,
                Err(_) => eprintln!("Warning: invalid RUST_LOG '{}', using default (info)", raw),
            }
        }

        config.log_file = lookup("WORKBOOK_LOG_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        config
    }
}
