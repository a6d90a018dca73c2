use std::{fmt, sync::Arc};

use crate::{log::LogSink, sink_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartReason {
    /// The control loop did not feed the supervisor for a whole period.
    LivenessExpired,
    /// Free memory fell below the critical threshold.
    ResourceExhaustion,
}

impl fmt::Display for RestartReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartReason::LivenessExpired => f.write_str("liveness expired"),
            RestartReason::ResourceExhaustion => f.write_str("resource exhaustion"),
        }
    }
}

/// Performs the unconditional restart. Must not touch the actuator.
pub trait RestartHandle: Send + Sync {
    fn restart(&self, reason: RestartReason);
}

/// Ends the process with a non-zero status so the service manager starts a
/// fresh instance.
pub struct ProcessRestart {
    logger: Arc<dyn LogSink>,
    exit_code: i32,
}

impl ProcessRestart {
    pub fn new(logger: Arc<dyn LogSink>) -> Self {
        Self {
            logger,
            exit_code: 70,
        }
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }
}

impl RestartHandle for ProcessRestart {
    fn restart(&self, reason: RestartReason) {
        sink_error!(&self.logger, "[SUPERVISOR] restarting: {}", reason);
        std::process::exit(self.exit_code);
    }
}
