use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Stderr logger with optional colors and an optional file mirror
pub struct Logger {
    pub severity: Level,
    pub file: Option<Mutex<File>>,
    pub enable_colors: bool,
}

impl Logger {
    /// Create a new logger. The file is opened in append mode; if that fails
    /// the logger falls back to stderr only.
    pub fn new(severity: Level, file_path: Option<&Path>, enable_colors: bool) -> Self {
        let file = file_path.and_then(|path| {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
                .map(Mutex::new)
        });

        Logger { severity, file, enable_colors }
    }

    /// Install the logger from `WIKI_LOG`/`RUST_LOG`, `WIKI_LOG_FILE` and `NO_COLOR`
    pub fn init() -> Result<(), log::SetLoggerError> {
        let severity = std::env::var("WIKI_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .and_then(|s| s.parse::<Level>().ok())
            .unwrap_or(Level::Info);
        let file_path = std::env::var_os("WIKI_LOG_FILE");
        let enable_colors = std::env::var_os("NO_COLOR").is_none();

        let logger = Logger::new(severity, file_path.as_deref().map(Path::new), enable_colors);
        log::set_max_level(LevelFilter::Trace);
        log::set_logger(Box::leak(Box::new(logger)))?;
        Ok(())
    }

    fn timestamp() -> String {
        OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "-".to_string())
    }

    fn color(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[36m",
            Level::Debug => "\x1b[35m",
            Level::Trace => "\x1b[37m",
        }
    }

    /// One log line without the trailing newline
    pub fn format_line(timestamp: &str, level: Level, args: &std::fmt::Arguments<'_>, colored: bool) -> String {
        if colored {
            format!("{}[{timestamp}] {}\x1b[0m {args}", Self::color(level), level.as_str())
        } else {
            format!("[{timestamp}] {} {args}", level.as_str())
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.severity
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Self::timestamp();
        let line = Self::format_line(&timestamp, record.level(), record.args(), self.enable_colors);
        let _ = writeln!(std::io::stderr(), "{line}");

        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                let plain = Self::format_line(&timestamp, record.level(), record.args(), false);
                let _ = writeln!(guard, "{plain}");
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                let _ = guard.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line() {
        let line = Logger::format_line("2026-01-01T00:00:00Z", Level::Warn, &format_args!("page {}", "Foo"), false);
        assert_eq!(line, "[2026-01-01T00:00:00Z] WARN page Foo");
    }

    #[test]
    fn test_colored_line_resets() {
        let line = Logger::format_line("t", Level::Error, &format_args!("boom"), true);
        assert!(line.starts_with("\x1b[31m[t] ERROR"));
        assert!(line.ends_with("\x1b[0m boom"));
    }

    #[test]
    fn test_severity_filter() {
        let logger = Logger::new(Level::Info, None, false);
        let debug = Metadata::builder().level(Level::Debug).build();
        let warn = Metadata::builder().level(Level::Warn).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&warn));
    }

    #[test]
    fn test_file_mirror_is_uncolored() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("logs").join("wiki.log");
        let logger = Logger::new(Level::Info, Some(path.as_path()), true);

        logger.log(&Record::builder().level(Level::Info).args(format_args!("saved Foo")).build());
        logger.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with(" INFO saved Foo\n"));
        assert!(!contents.contains('\x1b'));
    }
}
