use super::constants::{DEFAULT_REMOTE_DURATION_MS, MAX_REMOTE_DURATION_MS};
use crate::config::{Config, ConfigError};

/// Remote unlock policy, changeable at runtime through `update_config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteUnlockConfig {
    pub enabled: bool,
    pub default_duration_ms: u64,
    pub max_duration_ms: u64,
    /// Emit an audit record before each remote actuation.
    pub audit_log: bool,
}

impl Default for RemoteUnlockConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_duration_ms: DEFAULT_REMOTE_DURATION_MS,
            max_duration_ms: MAX_REMOTE_DURATION_MS,
            audit_log: true,
        }
    }
}

impl RemoteUnlockConfig {
    /// Reads the `[RemoteUnlock]` section.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let d = Self::default();
        Ok(Self {
            enabled: cfg.get_parsed("RemoteUnlock", "enabled", d.enabled)?,
            default_duration_ms: cfg.get_parsed("RemoteUnlock", "default_duration_ms", d.default_duration_ms)?,
            max_duration_ms: cfg.get_parsed("RemoteUnlock", "max_duration_ms", d.max_duration_ms)?,
            audit_log: cfg.get_parsed("RemoteUnlock", "audit_log", d.audit_log)?,
        })
    }

    /// Requested duration clamped to `[0, max]`; `None` uses the default.
    pub fn effective_duration(&self, requested: Option<i64>) -> u64 {
        match requested {
            None => self.default_duration_ms.min(self.max_duration_ms),
            Some(ms) if ms <= 0 => 0,
            Some(ms) => (ms as u64).min(self.max_duration_ms),
        }
    }
}
