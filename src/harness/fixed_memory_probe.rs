use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use crate::endpoint::MemoryProbe;

/// Free-heap figure set by the test. Clones share the value.
#[derive(Debug, Clone)]
pub struct FixedMemoryProbe {
    free: Arc<AtomicU32>,
}

impl FixedMemoryProbe {
    pub fn new(free: u32) -> Self {
        Self {
            free: Arc::new(AtomicU32::new(free)),
        }
    }

    pub fn set(&self, free: u32) {
        self.free.store(free, Ordering::Relaxed);
    }
}

impl MemoryProbe for FixedMemoryProbe {
    fn free_bytes(&self) -> u32 {
        self.free.load(Ordering::Relaxed)
    }
}
