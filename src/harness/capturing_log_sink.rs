use std::sync::Mutex;

use crate::log::{LogLevel, LogSink};

/// Keeps every line in memory for assertions.
#[derive(Debug, Default)]
pub struct CapturingLogSink {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl CapturingLogSink {
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        match self.lines.lock() {
            Ok(l) => l.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// True if some line at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|(l, text)| *l == level && text.contains(needle))
    }
}

impl LogSink for CapturingLogSink {
    fn log(&self, level: LogLevel, msg: &str, _target: &'static str) {
        match self.lines.lock() {
            Ok(mut l) => l.push((level, msg.to_string())),
            Err(poisoned) => poisoned.into_inner().push((level, msg.to_string())),
        }
    }
}
