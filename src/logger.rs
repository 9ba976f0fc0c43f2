//! Leveled logger over a shared debug transport.
//!
//! A log call runs: level filter → lock → assemble into the scratch
//! buffer → one transport write. The filter runs before the lock, so a
//! suppressed call costs one comparison and nothing else. The scratch
//! buffer and the transport sit behind the same mutex, so concurrent
//! messages are strictly serialized and never tear.

use core::fmt;
use core::fmt::Write as _;

use alloc::string::String;

use crate::call_site::CallSite;
use crate::kernel;
use crate::severity::LogLevel;
use crate::transport::{ctrl, Transport};

/// Default scratch reservation in bytes.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 256;

/// State behind the lock: the message under construction and the channel
/// it goes out on.
struct Channel<T> {
    scratch: String,
    transport: T,
}

impl<T: Transport> Channel<T> {
    /// Build one message in the scratch buffer. Caller holds the lock.
    fn assemble(&mut self, level: LogLevel, call_site: CallSite, args: fmt::Arguments<'_>) {
        self.scratch.clear();
        self.scratch.push_str(ctrl::RESET);
        let _ = write!(self.scratch, "{} ", kernel::epoch_seconds());
        self.scratch.push_str(level.colour());
        self.scratch.push_str(level.tag());
        let _ = self.scratch.write_fmt(args);
        if level.wants_call_site() {
            let _ = write!(
                self.scratch,
                " ({}:{}) '{}'",
                call_site.file, call_site.line, call_site.function
            );
        }
        self.scratch.push('\n');
    }
}

/// Thread-safe leveled logger.
///
/// Create one instance at startup and share it (`&'static` or `Arc`).
/// Calling from an ISR or before the scheduler runs corrupts the
/// transport at the hardware level; entry points assert against it in
/// debug builds.
pub struct DebugLogger<T> {
    /// Minimum severity to emit. Written only before the logger is
    /// shared, read without synchronization afterwards.
    level: LogLevel,
    channel: kernel::Mutex<Channel<T>>,
}

impl<T: Transport> DebugLogger<T> {
    /// Create a logger with the given threshold and scratch reservation.
    pub fn new(level: LogLevel, scratch_capacity: usize, transport: T) -> Self {
        Self {
            level,
            channel: kernel::Mutex::new(Channel {
                scratch: String::with_capacity(scratch_capacity),
                transport,
            }),
        }
    }

    /// Logger with the build-mode default threshold and the default
    /// scratch reservation.
    pub fn with_defaults(transport: T) -> Self {
        Self::new(LogLevel::DEFAULT, DEFAULT_SCRATCH_CAPACITY, transport)
    }

    /// Override threshold and scratch reservation.
    ///
    /// Meant for single-threaded startup, before the logger is shared;
    /// the exclusive borrow enforces that. The reservation is a floor,
    /// the scratch buffer never shrinks.
    pub fn reconfigure(&mut self, level: LogLevel, scratch_capacity: usize) {
        self.level = level;
        let channel = self.channel.get_mut();
        channel.scratch.clear();
        channel.scratch.reserve(scratch_capacity);
    }

    /// Configured minimum severity.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Current scratch buffer capacity in bytes.
    pub fn scratch_capacity(&self) -> usize {
        self.channel.lock().scratch.capacity()
    }

    /// Emit one message if `level` passes the threshold.
    ///
    /// The call-site suffix is appended for `Error` and `Warning` only;
    /// pass [`CallSite::EMPTY`] for the other levels. Prefer the
    /// [`log_error!`](crate::log_error!) macro family, which captures
    /// the call site for you.
    pub fn log(&self, level: LogLevel, call_site: CallSite, args: fmt::Arguments<'_>) {
        debug_assert!(kernel::in_thread(), "log call outside thread context");

        if level > self.level {
            return;
        }

        let mut channel = self.channel.lock();
        channel.assemble(level, call_site, args);
        let Channel { scratch, transport } = &mut *channel;
        transport.write(scratch.as_bytes());
    }

    /// Write pre-built bytes to the transport unmodified.
    ///
    /// Bypasses the level filter by design: raw payloads are assumed to
    /// be pre-filtered. No timestamp, colour or newline is added, and
    /// the scratch buffer is left alone.
    pub fn write_raw(&self, bytes: &[u8]) {
        debug_assert!(kernel::in_thread(), "log call outside thread context");

        let mut channel = self.channel.lock();
        channel.transport.write(bytes);
    }

    /// Clear the debug viewer's display.
    ///
    /// Independent of the level filter and the scratch buffer.
    pub fn clear(&self) {
        debug_assert!(kernel::in_thread(), "log call outside thread context");

        let mut channel = self.channel.lock();
        channel.transport.write(ctrl::CLEAR.as_bytes());
    }
}

/// Log at `Error` level, capturing the call site.
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::LogLevel::Error, $crate::call_site!(), core::format_args!($($arg)*))
    };
}

/// Log at `Warning` level, capturing the call site.
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::LogLevel::Warning, $crate::call_site!(), core::format_args!($($arg)*))
    };
}

/// Log at `Info` level. Info messages carry no call site.
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::LogLevel::Info, $crate::CallSite::EMPTY, core::format_args!($($arg)*))
    };
}

/// Log at `Debug` level. Debug messages carry no call site.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::LogLevel::Debug, $crate::CallSite::EMPTY, core::format_args!($($arg)*))
    };
}

/// Clear the debug viewer's display.
#[macro_export]
macro_rules! log_clear {
    ($logger:expr) => {
        $logger.clear()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    fn make(level: LogLevel) -> (DebugLogger<MemoryTransport>, MemoryTransport) {
        let sink = MemoryTransport::new();
        (DebugLogger::new(level, 256, sink.clone()), sink)
    }

    #[test]
    fn test_filtered_call_writes_nothing() {
        let (logger, sink) = make(LogLevel::Warning);

        logger.log(LogLevel::Info, CallSite::EMPTY, format_args!("quiet"));
        logger.log(LogLevel::Debug, CallSite::EMPTY, format_args!("quiet"));

        assert!(sink.writes().is_empty());
    }

    #[test]
    fn test_passing_call_is_one_write() {
        let (logger, sink) = make(LogLevel::Debug);

        logger.log(LogLevel::Info, CallSite::EMPTY, format_args!("a {} b {}", 1, 2));

        assert_eq!(sink.writes().len(), 1);
    }

    #[test]
    fn test_error_message_shape() {
        let (logger, sink) = make(LogLevel::Debug);
        let site = CallSite {
            file: "main.c",
            line: 42,
            function: "run",
        };

        logger.log(LogLevel::Error, site, format_args!("disk fault"));

        let writes = sink.writes();
        let text = core::str::from_utf8(&writes[0]).unwrap();

        let rest = text.strip_prefix(ctrl::RESET).expect("reset prefix");
        let (stamp, rest) = rest.split_once(' ').expect("timestamp separator");
        assert!(stamp.parse::<i64>().is_ok(), "integer timestamp, got {:?}", stamp);
        assert_eq!(
            rest,
            format!("{}ERR : disk fault (main.c:42) 'run'\n", ctrl::TEXT_BRIGHT_RED)
        );
    }

    #[test]
    fn test_warning_carries_call_site() {
        let (logger, sink) = make(LogLevel::Debug);
        let site = CallSite {
            file: "sensor.rs",
            line: 7,
            function: "poll",
        };

        logger.log(LogLevel::Warning, site, format_args!("stale reading"));

        let writes = sink.writes();
        let text = core::str::from_utf8(&writes[0]).unwrap();
        assert!(text.contains("WARN: stale reading (sensor.rs:7) 'poll'"));
    }

    #[test]
    fn test_info_ignores_supplied_call_site() {
        let (logger, sink) = make(LogLevel::Debug);
        let site = CallSite {
            file: "main.c",
            line: 42,
            function: "run",
        };

        logger.log(LogLevel::Info, site, format_args!("status"));

        let writes = sink.writes();
        let text = core::str::from_utf8(&writes[0]).unwrap();
        assert!(!text.contains("main.c"));
        assert!(text.ends_with("status\n"));
    }

    #[test]
    fn test_raw_bypasses_filter_and_decoration() {
        let (logger, sink) = make(LogLevel::Error);

        logger.write_raw(b"\x01\x02raw");

        assert_eq!(sink.writes(), vec![b"\x01\x02raw".to_vec()]);
    }

    #[test]
    fn test_clear_emits_control_sequence_only() {
        let (logger, sink) = make(LogLevel::Error);
        let capacity = logger.scratch_capacity();

        logger.clear();

        assert_eq!(sink.writes(), vec![ctrl::CLEAR.as_bytes().to_vec()]);
        assert_eq!(logger.scratch_capacity(), capacity);
    }

    #[test]
    fn test_reconfigure_overrides_previous() {
        let sink = MemoryTransport::new();
        let mut logger = DebugLogger::new(LogLevel::Debug, 64, sink.clone());

        logger.reconfigure(LogLevel::Warning, 1024);

        assert_eq!(logger.level(), LogLevel::Warning);
        assert!(logger.scratch_capacity() >= 1024);
        logger.log(LogLevel::Info, CallSite::EMPTY, format_args!("dropped"));
        assert!(sink.writes().is_empty());
    }

    #[test]
    fn test_no_reallocation_within_reservation() {
        let (logger, _sink) = make(LogLevel::Debug);
        let capacity = logger.scratch_capacity();

        for _ in 0..16 {
            logger.log(LogLevel::Debug, CallSite::EMPTY, format_args!("short message"));
        }

        assert_eq!(logger.scratch_capacity(), capacity);
    }

    #[test]
    fn test_with_defaults_uses_build_mode_level() {
        let logger = DebugLogger::with_defaults(MemoryTransport::new());
        assert_eq!(logger.level(), LogLevel::DEFAULT);
        assert!(logger.scratch_capacity() >= DEFAULT_SCRATCH_CAPACITY);
    }
}
