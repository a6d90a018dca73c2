use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use super::Clock;

/// Deterministic clock for tests and simulations.
///
/// Time only moves when someone calls [`ManualClock::advance`] or
/// [`Clock::sleep`], so a twelve second reply wait completes instantly while
/// still exercising every poll iteration.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
    unix_base_secs: AtomicU64,
}

impl ManualClock {
    pub fn new(unix_base_secs: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(0),
            unix_base_secs: AtomicU64::new(unix_base_secs),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set_now_ms(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }

    pub fn set_unix_base(&self, secs: u64) {
        self.unix_base_secs.store(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    fn unix_secs(&self) -> u64 {
        self.unix_base_secs.load(Ordering::SeqCst) + self.now_ms() / 1_000
    }

    fn sleep(&self, d: Duration) {
        self.advance(d.as_millis() as u64);
    }
}
