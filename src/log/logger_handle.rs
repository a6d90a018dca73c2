use std::sync::mpsc;

use crate::{
    clock::unix_millis,
    log::{log_level::LogLevel, log_msg::LogMsg, log_sink::LogSink},
};

/// Cloneable, never-blocking front end of a [`Logger`](super::Logger).
///
/// Lines go into a bounded queue; when the writer falls behind they are
/// dropped rather than stalling a control loop that is inside a reply wait.
#[derive(Clone)]
pub struct LoggerHandle {
    pub(super) tx: mpsc::SyncSender<LogMsg>,
    pub(super) min_level: LogLevel,
}

impl LogSink for LoggerHandle {
    #[inline]
    fn log(&self, level: LogLevel, msg: &str, target: &'static str) {
        let _ = self.try_log(level, msg, target);
    }
}

impl LoggerHandle {
    /// Enqueues one line.
    ///
    /// # Errors
    ///
    /// `TrySendError::Full` when the queue is at capacity and
    /// `TrySendError::Disconnected` once the writer thread is gone. Lines
    /// below the handle's minimum level are accepted and discarded.
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), mpsc::TrySendError<LogMsg>> {
        if level < self.min_level {
            return Ok(());
        }
        self.tx
            .try_send(LogMsg::new(level, text, target, unix_millis()))
    }
}
