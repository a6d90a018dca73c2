use std::time::Duration;

use super::{
    constants::{
        CODE_LENGTH, DEFAULT_GATE_ID, DEFAULT_KEYPAD_ID, DEFAULT_KEYPAD_SALT, ENTRY_TIMEOUT,
        FAILURE_LOCKOUT, KEYPAD_REPLY_TIMEOUT, MAX_RETRIES, SCAN_DEBOUNCE,
    },
    memory_monitor::MemoryThresholds,
};
use crate::{
    actuator::{RemoteUnlockConfig, constants::OPEN_HOLD},
    config::{Config, ConfigError},
    envelope::{DigestLen, SigningKey},
    link::{RetryPolicy, constants::DEFAULT_REPLY_TIMEOUT},
    rate_limiter::RateLimitConfig,
};

fn millis(cfg: &Config, section: &str, key: &str, default: Duration) -> Result<Duration, ConfigError> {
    cfg.get_parsed(section, key, default.as_millis() as u64)
        .map(Duration::from_millis)
}

/// Settings of the radio gate reader (`[Gate]`, `[RemoteUnlock]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub device_id: String,
    pub retry: RetryPolicy,
    pub reply_timeout: Duration,
    pub debounce: Duration,
    pub open_hold: Duration,
    pub remote: RemoteUnlockConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            device_id: DEFAULT_GATE_ID.to_string(),
            retry: RetryPolicy::default(),
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            debounce: SCAN_DEBOUNCE,
            open_hold: OPEN_HOLD,
            remote: RemoteUnlockConfig::default(),
        }
    }
}

impl GateConfig {
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let d = Self::default();
        let retry = RetryPolicy::new(
            cfg.get_parsed("Gate", "max_attempts", d.retry.max_attempts)?,
            millis(cfg, "Gate", "base_delay_ms", d.retry.base_delay)?,
        );
        Ok(Self {
            device_id: cfg.get_or_default("Gate", "device_id", DEFAULT_GATE_ID).to_string(),
            retry,
            reply_timeout: millis(cfg, "Gate", "reply_timeout_ms", d.reply_timeout)?,
            debounce: millis(cfg, "Gate", "debounce_ms", d.debounce)?,
            open_hold: millis(cfg, "Gate", "open_hold_ms", d.open_hold)?,
            remote: RemoteUnlockConfig::from_config(cfg)?,
        })
    }
}

/// Settings of the keypad lock (`[Keypad]`, `[RateLimit]`, `[RemoteUnlock]`,
/// `[Memory]`).
///
/// `hmac_key` has no default: a keypad without the gateway's key cannot do
/// anything useful.
#[derive(Debug, Clone)]
pub struct KeypadConfig {
    pub device_id: String,
    pub key: SigningKey,
    pub salt: String,
    pub digest_len: DigestLen,
    pub code_length: usize,
    pub entry_timeout: Duration,
    pub reply_timeout: Duration,
    pub max_retries: u32,
    pub lockout: Duration,
    pub open_hold: Duration,
    pub rate_limit: RateLimitConfig,
    pub remote: RemoteUnlockConfig,
    pub memory: MemoryThresholds,
}

impl KeypadConfig {
    /// Compiled-in defaults around `key`.
    pub fn with_key(key: SigningKey) -> Self {
        Self {
            device_id: DEFAULT_KEYPAD_ID.to_string(),
            key,
            salt: DEFAULT_KEYPAD_SALT.to_string(),
            digest_len: DigestLen::Full,
            code_length: CODE_LENGTH,
            entry_timeout: ENTRY_TIMEOUT,
            reply_timeout: KEYPAD_REPLY_TIMEOUT,
            max_retries: MAX_RETRIES,
            lockout: FAILURE_LOCKOUT,
            open_hold: OPEN_HOLD,
            rate_limit: RateLimitConfig::default(),
            remote: RemoteUnlockConfig::default(),
            memory: MemoryThresholds::default(),
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let raw_key = cfg.require("Keypad", "hmac_key")?;
        let key = SigningKey::from_hex(raw_key).map_err(|_| ConfigError::Invalid {
            section: "Keypad".into(),
            key: "hmac_key".into(),
            value: "<redacted>".into(),
        })?;
        let d = Self::with_key(key);

        let digest_hex: usize = cfg.get_parsed("Keypad", "digest_len", d.digest_len.hex_len())?;
        let digest_len = DigestLen::from_hex_len(digest_hex).ok_or_else(|| ConfigError::Invalid {
            section: "Keypad".into(),
            key: "digest_len".into(),
            value: digest_hex.to_string(),
        })?;

        let code_length: usize = cfg.get_parsed("Keypad", "code_length", d.code_length)?;
        if code_length == 0 {
            return Err(ConfigError::Invalid {
                section: "Keypad".into(),
                key: "code_length".into(),
                value: "0".into(),
            });
        }

        Ok(Self {
            device_id: cfg
                .get_or_default("Keypad", "device_id", DEFAULT_KEYPAD_ID)
                .to_string(),
            salt: cfg
                .get_or_default("Keypad", "salt", DEFAULT_KEYPAD_SALT)
                .to_string(),
            digest_len,
            code_length,
            entry_timeout: millis(cfg, "Keypad", "entry_timeout_ms", d.entry_timeout)?,
            reply_timeout: millis(cfg, "Keypad", "reply_timeout_ms", d.reply_timeout)?,
            max_retries: cfg.get_parsed("Keypad", "max_retries", d.max_retries)?,
            lockout: millis(cfg, "Keypad", "lockout_ms", d.lockout)?,
            open_hold: millis(cfg, "Keypad", "open_hold_ms", d.open_hold)?,
            rate_limit: RateLimitConfig::from_config(cfg, "RateLimit")?,
            remote: RemoteUnlockConfig::from_config(cfg)?,
            memory: MemoryThresholds::from_config(cfg)?,
            key: d.key,
        })
    }

    /// Denials tolerated before the entry lockout starts.
    pub fn failure_threshold(&self) -> u32 {
        self.max_retries.saturating_mul(2)
    }
}
