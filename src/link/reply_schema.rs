use super::constants::{REMOTE_LOCK_PREFIX, REMOTE_UNLOCK_PREFIX};
use crate::frame::ReplyStatus;

/// Which reply statuses a waiting request is prepared to accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplySchema {
    decisions: bool,
    app_prefixes: Vec<&'static str>,
}

impl ReplySchema {
    /// `GRANT` or `DENY5` only.
    pub fn access_decision() -> Self {
        Self {
            decisions: true,
            app_prefixes: Vec::new(),
        }
    }

    /// Remote unlock and lock commands pushed by the gateway.
    pub fn remote_command() -> Self {
        Self {
            decisions: false,
            app_prefixes: vec![REMOTE_UNLOCK_PREFIX, REMOTE_LOCK_PREFIX],
        }
    }

    pub fn with_app_prefix(mut self, prefix: &'static str) -> Self {
        self.app_prefixes.push(prefix);
        self
    }

    pub fn accepts(&self, status: &ReplyStatus) -> bool {
        match status {
            ReplyStatus::Grant | ReplyStatus::Deny => self.decisions,
            ReplyStatus::App(text) => self.app_prefixes.iter().any(|p| text.starts_with(p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_schema_ignores_app_strings() {
        let s = ReplySchema::access_decision();
        assert!(s.accepts(&ReplyStatus::Grant));
        assert!(s.accepts(&ReplyStatus::Deny));
        assert!(!s.accepts(&ReplyStatus::App("ACK:1:1:ok".into())));
    }

    #[test]
    fn remote_schema_matches_prefixes() {
        let s = ReplySchema::remote_command();
        assert!(s.accepts(&ReplyStatus::App("REMOTE_LOCK:7:alice".into())));
        assert!(!s.accepts(&ReplyStatus::Grant));
        assert!(!s.accepts(&ReplyStatus::App("REMOTE_OPEN".into())));
    }
}
