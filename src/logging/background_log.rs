use std::{fs::File, io::Write, path::Path, sync::Mutex};

use anyhow::Error;
use log::{LevelFilter, Log, Metadata, Record};

use osutils::files;

use super::LogEntry;

/// Writes every accepted record to a file as one JSON object per line.
pub struct BackgroundLog {
    target: Mutex<File>,
    max_level: LevelFilter,
}

impl BackgroundLog {
    /// Creates (or truncates) the log file and its parent directories.
    pub fn new(target: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self {
            target: Mutex::new(files::create_file(target)?),
            max_level: LevelFilter::Trace,
        })
    }

    pub fn with_max_level(self, max_level: LevelFilter) -> Self {
        Self { max_level, ..self }
    }

    pub fn into_logger(self) -> Box<dyn Log> {
        Box::new(self)
    }

    fn write_entry(&self, record: &Record) -> Result<(), Box<dyn std::error::Error + '_>> {
        let mut serialized = serde_json::to_string(&LogEntry::from(record))?;
        serialized.push('\n');

        let mut file = self.target.lock()?;
        file.write_all(serialized.as_bytes())?;
        Ok(())
    }
}

impl Log for BackgroundLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        // Best effort: a broken log file must not fail the report
        let _ = self.write_entry(record);
    }

    fn flush(&self) {
        if let Ok(mut file) = self.target.lock() {
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use log::Level;
    use tempfile::tempdir;

    use crate::logging::Level as EntryLevel;

    fn record<'a>(level: Level, args: std::fmt::Arguments<'a>) -> Record<'a> {
        Record::builder()
            .args(args)
            .level(level)
            .target("raidtree::topology")
            .file(Some("src/topology/mod.rs"))
            .line(Some(12))
            .build()
    }

    #[test]
    fn test_filter() {
        let test_dir = tempdir().unwrap();
        let logger = BackgroundLog::new(test_dir.path().join("raidtree.log"))
            .unwrap()
            .with_max_level(LevelFilter::Debug)
            .into_logger();

        assert!(logger.enabled(&Metadata::builder().level(Level::Debug).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Trace).build()));
    }

    #[test]
    fn test_creation_failure() {
        let test_dir = tempdir().unwrap();
        // A directory cannot be opened as a log file
        assert!(BackgroundLog::new(test_dir.path()).is_err());
    }

    #[test]
    fn test_background_log() {
        let test_dir = tempdir().unwrap();
        let target = test_dir.path().join("logs").join("raidtree.log");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "stale content\n").unwrap();

        let logger = BackgroundLog::new(&target).unwrap().into_logger();
        logger.log(&record(Level::Info, format_args!("Linked span 0:1")));
        logger.log(&record(Level::Warn, format_args!("Array 4 is not a span")));
        logger.flush();

        let content = fs::read_to_string(&target).unwrap();
        let entries = content
            .lines()
            .map(|line| serde_json::from_str::<LogEntry>(line).unwrap())
            .collect::<Vec<_>>();

        assert_eq!(entries.len(), 2, "Stale content should be truncated");
        assert_eq!(entries[0].level, EntryLevel::Info);
        assert_eq!(entries[0].message, "Linked span 0:1");
        assert_eq!(entries[1].level, EntryLevel::Warn);
        assert_eq!(entries[1].location, "src/topology/mod.rs:12");
    }
}
