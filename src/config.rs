use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::str::FromStr;

use crate::fault::FaultClass;

/// Errors raised while turning a [`Config`] into typed endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Missing {
        section: String,
        key: String,
    },
    Invalid {
        section: String,
        key: String,
        value: String,
    },
    /// The file asked for something the endpoint refuses to do, such as
    /// skipping certificate verification.
    Refused(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ConfigError::*;
        match self {
            Io(e) => write!(f, "config I/O error: {e}"),
            Missing { section, key } => write!(f, "missing required key [{section}] {key}"),
            Invalid {
                section,
                key,
                value,
            } => write!(f, "invalid value for [{section}] {key}: {value:?}"),
            Refused(why) => write!(f, "refused configuration: {why}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    pub fn fault_class(&self) -> FaultClass {
        FaultClass::Malformed
    }
}

/// Flat INI-style configuration: `key = value` lines, `#` comments and
/// `[Section]` headers. Keys before the first header are globals.
#[derive(Debug, Default)]
pub struct Config {
    pub globals: HashMap<String, String>,
    pub sections: HashMap<String, HashMap<String, String>>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("reading {path}: {e}")))?;
        Ok(Self::parse(&content))
    }

    /// Parses configuration text. Lines that are neither headers, comments
    /// nor `key = value` pairs are skipped.
    pub fn parse(content: &str) -> Self {
        let mut globals = HashMap::new();
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current_section: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current_section = Some(name.trim().to_string());
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_string();
                let value = value.trim().trim_matches('"').to_string();

                match &current_section {
                    None => {
                        globals.insert(key, value);
                    }
                    Some(sec) => {
                        sections.entry(sec.clone()).or_default().insert(key, value);
                    }
                }
            }
        }
        Config { globals, sections }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sec| sec.get(key))
            .map(|s| s.as_str())
    }

    #[must_use]
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn get_global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(|s| s.as_str())
    }

    /// Section value, then global value, then `default`.
    #[must_use]
    pub fn get_or_default<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get_non_empty(section, key)
            .or_else(|| self.get_global(key).filter(|s| !s.is_empty()))
            .unwrap_or(default)
    }

    /// Parses `[section] key` into `T`, falling back to `default` when the key
    /// is absent. A present but unparsable value is an error, never silently
    /// replaced.
    pub fn get_parsed<T: FromStr>(
        &self,
        section: &str,
        key: &str,
        default: T,
    ) -> Result<T, ConfigError> {
        match self.get_non_empty(section, key) {
            None => Ok(default),
            Some(raw) => raw.parse::<T>().map_err(|_| ConfigError::Invalid {
                section: section.to_string(),
                key: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    pub fn require(&self, section: &str, key: &str) -> Result<&str, ConfigError> {
        self.get_non_empty(section, key)
            .ok_or_else(|| ConfigError::Missing {
                section: section.to_string(),
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    const SAMPLE: &str = r#"
# endpoint settings
device_id = "gate_01"

[Radio]
channel = 23
max_attempts = 3

[Keypad]
hmac_key =
code_length = six
"#;

    #[test]
    fn parses_globals_and_sections() {
        let cfg = Config::parse(SAMPLE);
        assert_eq!(cfg.get_global("device_id"), Some("gate_01"));
        assert_eq!(cfg.get("Radio", "channel"), Some("23"));
        assert_eq!(cfg.get_or_default("Radio", "device_id", "x"), "gate_01");
        assert_eq!(cfg.get_or_default("Radio", "missing", "x"), "x");
    }

    #[test]
    fn typed_lookup_uses_default_only_when_absent() {
        let cfg = Config::parse(SAMPLE);
        assert_eq!(cfg.get_parsed::<u8>("Radio", "channel", 0).unwrap(), 23);
        assert_eq!(cfg.get_parsed::<u32>("Radio", "base_delay_ms", 2000).unwrap(), 2000);

        let err = cfg.get_parsed::<usize>("Keypad", "code_length", 6).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn empty_required_value_counts_as_missing() {
        let cfg = Config::parse(SAMPLE);
        let err = cfg.require("Keypad", "hmac_key").unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing {
                section: "Keypad".into(),
                key: "hmac_key".into()
            }
        );
    }
}
