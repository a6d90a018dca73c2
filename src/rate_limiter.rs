use std::{sync::Arc, time::Duration};

use crate::{clock::Clock, config::{Config, ConfigError}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_per_window: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_window: 5,
            window: Duration::from_millis(60_000),
        }
    }
}

impl RateLimitConfig {
    /// Reads `max_per_window` and `window_ms` from `section`.
    pub fn from_config(cfg: &Config, section: &str) -> Result<Self, ConfigError> {
        let d = Self::default();
        Ok(Self {
            max_per_window: cfg.get_parsed(section, "max_per_window", d.max_per_window)?,
            window: Duration::from_millis(cfg.get_parsed(
                section,
                "window_ms",
                d.window.as_millis() as u64,
            )?),
        })
    }
}

/// Fixed-window request throttle.
///
/// A rejected call does not count against the window.
pub struct RateLimiter {
    window_start: u64,
    count: u32,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            window_start: clock.now_ms(),
            count: 0,
            config,
            clock,
        }
    }

    pub fn allow(&mut self) -> bool {
        let now = self.clock.now_ms();
        if now.saturating_sub(self.window_start) >= self.config.window.as_millis() as u64 {
            self.window_start = now;
            self.count = 0;
        }
        if self.count < self.config.max_per_window {
            self.count += 1;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self) -> u32 {
        self.config.max_per_window.saturating_sub(self.count)
    }
}
