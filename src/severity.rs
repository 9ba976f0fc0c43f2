//! Message severity levels.

use crate::transport::ctrl;

/// Log severity, ordered from most to least severe.
///
/// The ordinal ordering drives filtering: a message is emitted when its
/// level is `<=` the configured threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Default threshold: verbose in debug builds, quiet in release.
    #[cfg(debug_assertions)]
    pub const DEFAULT: Self = LogLevel::Debug;
    /// Default threshold: verbose in debug builds, quiet in release.
    #[cfg(not(debug_assertions))]
    pub const DEFAULT: Self = LogLevel::Warning;

    /// Convert from raw u8 value. Unknown values map to `Debug`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Error,
            1 => LogLevel::Warning,
            2 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }

    /// Colour control sequence prefixing messages of this level.
    pub fn colour(self) -> &'static str {
        match self {
            LogLevel::Error => ctrl::TEXT_BRIGHT_RED,
            LogLevel::Warning => ctrl::TEXT_BRIGHT_YELLOW,
            LogLevel::Info => ctrl::TEXT_BRIGHT_GREEN,
            LogLevel::Debug => ctrl::TEXT_BRIGHT_MAGENTA,
        }
    }

    /// Fixed-width tag following the colour sequence.
    pub fn tag(self) -> &'static str {
        match self {
            LogLevel::Error => "ERR : ",
            LogLevel::Warning => "WARN: ",
            LogLevel::Info => "INFO: ",
            LogLevel::Debug => "DBG : ",
        }
    }

    /// True if messages of this level carry the call-site suffix.
    pub fn wants_call_site(self) -> bool {
        self <= LogLevel::Warning
    }
}
