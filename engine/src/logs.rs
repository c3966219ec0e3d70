//! Console logging for the `promo` binary.
//!
//! The library reports through the `log` facade. The binary installs
//! [`ConsoleLogger`], which turns each record into a [`LogEntry`] and prints
//! it to stderr with a level prefix, leaving stdout for command output.

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Log level for console display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => LogLevel::Error,
            Level::Warn => LogLevel::Warning,
            Level::Info | Level::Debug | Level::Trace => LogLevel::Info,
        }
    }
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Entry for a `log` record. Debug and trace records are indented one
    /// level under the info lines they belong to.
    pub fn from_record(record: &Record<'_>) -> Self {
        let indent = match record.level() {
            Level::Debug | Level::Trace => 1,
            _ => 0,
        };
        Self {
            level: record.level().into(),
            message: record.args().to_string(),
            indent,
        }
    }

    /// The line printed for this entry.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// `log` backend printing rendered entries to stderr.
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", LogEntry::from_record(record).render());
        }
    }

    fn flush(&self) {}
}

static LOGGER: OnceCell<ConsoleLogger> = OnceCell::new();

/// Install the console logger. `log` accepts a single global backend, so
/// only the first call's threshold is kept.
pub fn init(level: LevelFilter) {
    let logger = LOGGER.get_or_init(|| ConsoleLogger::new(level));
    if log::set_logger(logger).is_err() {
        log::debug!("Console logger already installed");
    }
    log::set_max_level(logger.level);
}

/// Print an entry directly, for command status lines that are not library
/// diagnostics.
pub fn emit(entry: LogEntry) {
    eprintln!("{}", entry.render());
}

/// Print a success line. `log` has no success level, so this bypasses the
/// facade.
pub fn log_success(msg: impl Into<String>) {
    emit(LogEntry::success(msg));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prefixes() {
        assert_eq!(LogEntry::info("hello").render(), "    hello");
        assert_eq!(LogEntry::success("done").render(), "   ✓ done");
        assert!(LogEntry::warning("careful").render().contains("⚠️ careful"));
        assert!(LogEntry::error("boom").render().contains("❌ boom"));
    }

    #[test]
    fn test_render_indent() {
        let line = LogEntry::success("nested").with_indent(2).render();
        assert!(line.starts_with("      "));
        assert!(line.ends_with("✓ nested"));
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(LogLevel::from(Level::Warn), LogLevel::Warning);
        assert_eq!(LogLevel::from(Level::Debug), LogLevel::Info);
        assert_eq!(LogLevel::from(Level::Error), LogLevel::Error);
    }

    #[test]
    fn test_entry_from_record() {
        let entry = LogEntry::from_record(
            &Record::builder()
                .args(format_args!("Unrecognized date format: '{}'", "x"))
                .level(Level::Warn)
                .build(),
        );
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.message, "Unrecognized date format: 'x'");
        assert_eq!(entry.indent, 0);

        let debug = LogEntry::from_record(
            &Record::builder()
                .args(format_args!("detail"))
                .level(Level::Debug)
                .build(),
        );
        assert_eq!(debug.indent, 1);
    }

    #[test]
    fn test_logger_threshold() {
        let logger = ConsoleLogger::new(LevelFilter::Warn);
        let warn = Metadata::builder().level(Level::Warn).build();
        let info = Metadata::builder().level(Level::Info).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&info));
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let json = serde_json::to_value(LogEntry::warning("w").with_indent(1)).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["indent"], 1);
    }
}
