use std::time::Duration;

use super::constants::{MEMORY_CHECK_INTERVAL, MEMORY_CRITICAL_BYTES, MEMORY_LOW_BYTES};
use crate::config::{Config, ConfigError};

/// Source of the free-heap figure.
pub trait MemoryProbe: Send {
    fn free_bytes(&self) -> u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryThresholds {
    pub low_bytes: u32,
    pub critical_bytes: u32,
    pub interval: Duration,
}

impl Default for MemoryThresholds {
    fn default() -> Self {
        Self {
            low_bytes: MEMORY_LOW_BYTES,
            critical_bytes: MEMORY_CRITICAL_BYTES,
            interval: MEMORY_CHECK_INTERVAL,
        }
    }
}

impl MemoryThresholds {
    /// Reads the `[Memory]` section.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let d = Self::default();
        Ok(Self {
            low_bytes: cfg.get_parsed("Memory", "low_bytes", d.low_bytes)?,
            critical_bytes: cfg.get_parsed("Memory", "critical_bytes", d.critical_bytes)?,
            interval: Duration::from_millis(cfg.get_parsed(
                "Memory",
                "check_interval_ms",
                d.interval.as_millis() as u64,
            )?),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryVerdict {
    /// Interval has not elapsed yet.
    NotDue,
    Healthy(u32),
    Low(u32),
    /// Fatal: the caller publishes best effort and restarts.
    Critical(u32),
}

/// Samples the probe once per interval.
pub struct MemoryMonitor {
    probe: Box<dyn MemoryProbe>,
    thresholds: MemoryThresholds,
    last_check_ms: u64,
}

impl MemoryMonitor {
    pub fn new(probe: Box<dyn MemoryProbe>, thresholds: MemoryThresholds, now_ms: u64) -> Self {
        Self {
            probe,
            thresholds,
            last_check_ms: now_ms,
        }
    }

    pub fn free_bytes(&self) -> u32 {
        self.probe.free_bytes()
    }

    pub fn sample(&mut self, now_ms: u64) -> MemoryVerdict {
        if now_ms.saturating_sub(self.last_check_ms) < self.thresholds.interval.as_millis() as u64 {
            return MemoryVerdict::NotDue;
        }
        self.last_check_ms = now_ms;

        let free = self.probe.free_bytes();
        if free < self.thresholds.critical_bytes {
            MemoryVerdict::Critical(free)
        } else if free < self.thresholds.low_bytes {
            MemoryVerdict::Low(free)
        } else {
            MemoryVerdict::Healthy(free)
        }
    }
}
