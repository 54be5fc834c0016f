//! Activity log
//!
//! A small file-backed structured logger: append-only, one timestamped
//! line per event. This is a one-shot batch pipeline with no persistent
//! per-user state between runs, so the caller supplies the log path
//! directly (typically alongside the input file) instead of resolving
//! one under the user's home directory.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub event: String,
    pub details: Option<String>,
}

pub struct ActivityLogger {
    log_path: PathBuf,
}

impl ActivityLogger {
    pub fn new(log_path: impl Into<PathBuf>) -> ActivityLogger {
        ActivityLogger { log_path: log_path.into() }
    }

    fn log(&self, level: LogLevel, event: &str, details: Option<&str>) -> Result<()> {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            event: event.to_string(),
            details: details.map(str::to_string),
        };

        let mut file = OpenOptions::new().create(true).append(true).open(&self.log_path)?;

        let level_str = match entry.level {
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
        };
        writeln!(
            file,
            "{} {} {} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            level_str,
            entry.event,
            entry.details.as_deref().unwrap_or(""),
        )?;
        Ok(())
    }

    pub fn info(&self, event: &str, details: Option<&str>) -> Result<()> {
        self.log(LogLevel::Info, event, details)
    }

    pub fn error(&self, event: &str, details: Option<&str>) -> Result<()> {
        self.log(LogLevel::Error, event, details)
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}
