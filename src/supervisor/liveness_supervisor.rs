use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use super::{
    liveness::Liveness,
    restart::{RestartHandle, RestartReason},
};
use crate::{log::LogSink, sink_error, sink_trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Alive,
    /// No feed since the previous check; a restart was requested.
    Expired,
}

/// Liveness flag plus the restart it guards.
///
/// `feed` may be called from the control loop while `check` runs on the
/// watchdog thread; the flag is a single atomic and `check` only inspects
/// and clears it. The flag starts set so the first period after start-up
/// counts as alive.
pub struct LivenessSupervisor {
    fed: AtomicBool,
    expirations: AtomicU64,
    restart: Arc<dyn RestartHandle>,
    logger: Arc<dyn LogSink>,
}

impl LivenessSupervisor {
    pub fn new(restart: Arc<dyn RestartHandle>, logger: Arc<dyn LogSink>) -> Self {
        Self {
            fed: AtomicBool::new(true),
            expirations: AtomicU64::new(0),
            restart,
            logger,
        }
    }

    /// Called once per supervisor period.
    pub fn check(&self) -> Verdict {
        if self.fed.swap(false, Ordering::AcqRel) {
            sink_trace!(&self.logger, "[SUPERVISOR] alive");
            Verdict::Alive
        } else {
            self.expirations.fetch_add(1, Ordering::Relaxed);
            sink_error!(&self.logger, "[SUPERVISOR] control loop stalled for a full period");
            self.restart.restart(RestartReason::LivenessExpired);
            Verdict::Expired
        }
    }

    /// Forwards a fatal condition detected by the control loop itself.
    pub fn force_restart(&self, reason: RestartReason) {
        sink_error!(&self.logger, "[SUPERVISOR] forced restart: {}", reason);
        self.restart.restart(reason);
    }

    pub fn expirations(&self) -> u64 {
        self.expirations.load(Ordering::Relaxed)
    }
}

impl Liveness for LivenessSupervisor {
    #[inline]
    fn feed(&self) {
        self.fed.store(true, Ordering::Release);
    }
}
