//! Bridge to the `log` crate facade.
//!
//! Firmware code and third-party crates log through `log::info!` and
//! friends; this adapter routes those records into a [`DebugLogger`].
//! The crate's own macros remain the precise path: `log` records carry
//! no enclosing-function name.

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

use crate::call_site::CallSite;
use crate::logger::DebugLogger;
use crate::severity::LogLevel;
use crate::transport::Transport;

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => LogLevel::Error,
            Level::Warn => LogLevel::Warning,
            Level::Info => LogLevel::Info,
            Level::Debug | Level::Trace => LogLevel::Debug,
        }
    }
}

impl LogLevel {
    /// Matching `log` facade filter.
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        }
    }
}

impl<T: Transport + Send> log::Log for DebugLogger<T> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        LogLevel::from(metadata.level()) <= self.level()
    }

    fn log(&self, record: &Record) {
        let level = LogLevel::from(record.level());
        // The record's module path stands in for the function name.
        let call_site = if level.wants_call_site() {
            CallSite {
                file: record.file_static().unwrap_or("<unknown>"),
                line: record.line().unwrap_or(0),
                function: record.module_path_static().unwrap_or("<unknown>"),
            }
        } else {
            CallSite::EMPTY
        };
        DebugLogger::log(self, level, call_site, *record.args());
    }

    fn flush(&self) {}
}

/// Register `logger` as the process-wide `log` sink and align the
/// facade's max level with the logger's threshold.
pub fn install<T: Transport + Send>(
    logger: &'static DebugLogger<T>,
) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(logger.level().to_level_filter());
    Ok(())
}
