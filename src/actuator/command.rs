use serde::Deserialize;
use serde_json::Value;

use super::command_error::CommandError;

/// Command delivered to an endpoint by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "cmd")]
pub enum Command {
    /// Access decision: granted.
    #[serde(rename = "OPEN")]
    Open {
        #[serde(default)]
        reason: Option<String>,
    },
    /// Access decision: denied.
    #[serde(rename = "LOCK")]
    Lock {
        #[serde(default)]
        reason: Option<String>,
    },
    #[serde(rename = "remote_unlock")]
    RemoteUnlock(RemoteUnlock),
    #[serde(rename = "remote_lock")]
    RemoteLock(RemoteLock),
    #[serde(rename = "update_config")]
    UpdateConfig(ConfigUpdate),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteUnlock {
    #[serde(default)]
    pub command_id: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    /// Signed so a negative request can be clamped instead of wrapping.
    #[serde(default)]
    pub duration_ms: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteLock {
    #[serde(default)]
    pub command_id: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub command_id: Option<String>,
    #[serde(default)]
    pub remote_enabled: Option<bool>,
    #[serde(default)]
    pub default_duration_ms: Option<u64>,
    #[serde(default)]
    pub max_duration_ms: Option<u64>,
}

impl Command {
    pub const NAMES: [&'static str; 5] = ["OPEN", "LOCK", "remote_unlock", "remote_lock", "update_config"];

    /// Parses a command-topic payload.
    pub fn parse(payload: &[u8]) -> Result<Self, CommandError> {
        let value: Value =
            serde_json::from_slice(payload).map_err(|e| CommandError::Json(e.to_string()))?;
        let name = match value.get("cmd") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => return Err(CommandError::UnknownCmd(other.to_string())),
            None => return Err(CommandError::MissingCmd),
        };
        if !Self::NAMES.contains(&name.as_str()) {
            return Err(CommandError::UnknownCmd(name));
        }
        serde_json::from_value(value).map_err(|e| CommandError::Json(e.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Open { .. } => "OPEN",
            Command::Lock { .. } => "LOCK",
            Command::RemoteUnlock(_) => "remote_unlock",
            Command::RemoteLock(_) => "remote_lock",
            Command::UpdateConfig(_) => "update_config",
        }
    }
}
