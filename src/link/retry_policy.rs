use std::time::Duration;

use super::constants::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};

/// Attempt budget with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay after failed attempt `attempt` (0-based): `base * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_saturates() {
        let p = RetryPolicy::new(3, Duration::from_millis(2_000));
        assert_eq!(p.delay_for(0), Duration::from_millis(2_000));
        assert_eq!(p.delay_for(1), Duration::from_millis(4_000));
        assert_eq!(p.delay_for(2), Duration::from_millis(8_000));
        assert_eq!(p.delay_for(40), Duration::from_millis(2_000).saturating_mul(u32::MAX));
    }

    #[test]
    fn at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
