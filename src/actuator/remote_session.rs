/// Audit record of a remote unlock, kept until its window plus the
/// actuation margin has passed or a remote lock supersedes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSession {
    pub active: bool,
    pub command_id: String,
    pub initiated_by: String,
    pub reason: String,
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl RemoteSession {
    pub fn start(
        command_id: impl Into<String>,
        initiated_by: impl Into<String>,
        reason: impl Into<String>,
        start_ms: u64,
        duration_ms: u64,
    ) -> Self {
        Self {
            active: true,
            command_id: command_id.into(),
            initiated_by: initiated_by.into(),
            reason: reason.into(),
            start_ms,
            duration_ms,
        }
    }

    pub fn is_expired(&self, now_ms: u64, margin_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms.saturating_add(margin_ms)
    }

    pub fn clear(&mut self) {
        self.active = false;
    }
}
