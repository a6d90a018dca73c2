use std::sync::atomic::{AtomicU64, Ordering};

use crate::supervisor::Liveness;

#[derive(Debug, Default)]
pub struct CountingLiveness {
    feeds: AtomicU64,
}

impl CountingLiveness {
    pub fn count(&self) -> u64 {
        self.feeds.load(Ordering::Relaxed)
    }
}

impl Liveness for CountingLiveness {
    fn feed(&self) {
        self.feeds.fetch_add(1, Ordering::Relaxed);
    }
}
