//! Injected logging.
//!
//! The engine never logs through a global handle. A `MindbugGame` holds an
//! `Arc<dyn GameLogger>` and hands it to the managers it drives; search
//! clones swap in a `NullLogger` so rollouts stay silent.
//!
//! ```
//! use std::sync::Arc;
//! use mindbug_engine::core::{GameLogger, LogLevel, MemoryLogger};
//!
//! let logger = Arc::new(MemoryLogger::default());
//! logger.log(LogLevel::Warn, format_args!("index {} out of range", 7));
//! assert_eq!(logger.lines(), vec!["WARN index 7 out of range".to_string()]);
//! ```

use std::fmt;
use std::sync::{Arc, Mutex};

/// Severity of a log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        })
    }
}

/// Logging capability passed to the engine.
pub trait GameLogger: Send + Sync {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>);

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }
}

/// Forwards to `tracing` under the `mindbug` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl GameLogger for TracingLogger {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "mindbug", "{}", args),
            LogLevel::Info => tracing::info!(target: "mindbug", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "mindbug", "{}", args),
            LogLevel::Error => tracing::error!(target: "mindbug", "{}", args),
        }
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogger;

impl GameLogger for NullLogger {
    fn log(&self, _level: LogLevel, _args: fmt::Arguments<'_>) {}
}

/// Keeps formatted lines in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    /// All lines logged so far, as `"LEVEL message"`.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Does any logged line at `level` contain `needle`?
    #[must_use]
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        let prefix = format!("{level} ");
        self.lines()
            .iter()
            .any(|line| line.starts_with(&prefix) && line.contains(needle))
    }
}

impl GameLogger for MemoryLogger {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(format!("{level} {args}"));
        }
    }
}

/// Shared silent logger.
#[must_use]
pub fn null_logger() -> Arc<dyn GameLogger> {
    Arc::new(NullLogger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_levels() {
        let logger = MemoryLogger::default();
        logger.debug(format_args!("drew {}", 2));
        logger.error(format_args!("bad card"));

        assert!(logger.contains(LogLevel::Debug, "drew 2"));
        assert!(logger.contains(LogLevel::Error, "bad card"));
        assert!(!logger.contains(LogLevel::Warn, "bad card"));
    }

    #[test]
    fn test_null_logger_is_silent() {
        let logger = null_logger();
        logger.warn(format_args!("ignored"));
    }
}
