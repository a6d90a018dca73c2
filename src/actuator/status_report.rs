use serde::Serialize;

/// Resulting state carried by a status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorStatus {
    Unlocked,
    Locked,
    Error,
    Online,
    LowMemory,
}

/// What caused the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Grant,
    Denied,
    AutoLock,
    RemoteUnlock,
    RemoteLock,
    Timeout,
    TransportError,
    Startup,
    MemoryMonitor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub device_id: String,
    pub state: DoorStatus,
    #[serde(rename = "method")]
    pub trigger: Trigger,
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub remote_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_heap: Option<u32>,
}

impl StatusReport {
    pub fn new(device_id: impl Into<String>, state: DoorStatus, trigger: Trigger, timestamp: u64) -> Self {
        Self {
            device_id: device_id.into(),
            state,
            trigger,
            timestamp,
            reason: None,
            remote_active: false,
            remote_user: None,
            free_heap: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_free_heap(mut self, bytes: u32) -> Self {
        self.free_heap = Some(bytes);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandAck {
    pub device_id: String,
    pub command_id: String,
    pub success: bool,
    pub status: String,
    pub timestamp: u64,
}

/// Written before a remote actuation takes effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteAuditRecord {
    pub device_id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub action: &'static str,
    pub command_id: String,
    pub initiated_by: String,
    pub reason: String,
    pub duration_ms: u64,
    pub timestamp: u64,
}
