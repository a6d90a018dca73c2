use std::fmt;

/// Severity of a log line, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Per-byte and per-poll detail.
    Trace,
    /// Dropped frames, discarded replies, retry decisions.
    Debug,
    /// State transitions and completed exchanges.
    Info,
    /// Security events and recoverable failures.
    Warn,
    /// Conditions that end in a restart or a lost actuation.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}
