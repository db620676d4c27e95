//! Log setup: human-readable lines on stderr, plus optional JSON lines in a
//! file.

use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use raidtree_api::error::{InternalError, RaidTreeError, ReportError};

mod background_log;
mod multilog;

pub use background_log::BackgroundLog;
pub use multilog::MultiLogger;

/// One line of the JSON log file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub target: String,
    pub location: String,
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl From<log::Level> for Level {
    fn from(value: log::Level) -> Self {
        match value {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Trace,
        }
    }
}

impl From<&log::Record<'_>> for LogEntry {
    fn from(value: &log::Record) -> Self {
        Self {
            level: value.level().into(),
            message: value.args().to_string(),
            target: value.target().to_string(),
            location: format!(
                "{}:{}",
                value.file().unwrap_or_default(),
                value.line().unwrap_or_default()
            ),
        }
    }
}

/// Installs the global logger. Only this crate and its helpers log below
/// `warn`; everything else is capped there.
pub fn init(verbosity: LevelFilter, log_file: Option<&Path>) -> Result<(), RaidTreeError> {
    let mut logger = MultiLogger::new()
        .with_logger(Box::new(
            env_logger::builder()
                .format_timestamp(None)
                .filter_level(LevelFilter::Warn.min(verbosity))
                .filter_module("raidtree", verbosity)
                .filter_module("osutils", verbosity)
                .build(),
        ))
        .with_max_level(verbosity);

    if let Some(path) = log_file {
        logger = logger.with_max_level(verbosity.max(LevelFilter::Debug));
        logger.add_logger(
            BackgroundLog::new(path)
                .structured(InternalError::Logging)?
                .with_max_level(LevelFilter::Debug)
                .into_logger(),
        );
    }

    logger.init().structured(InternalError::Logging)
}
