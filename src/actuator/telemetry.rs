use std::fmt;

use super::status_report::{CommandAck, RemoteAuditRecord, StatusReport};
use crate::fault::FaultClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    Disconnected,
    Encode(String),
    Publish(String),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Disconnected => write!(f, "telemetry channel not connected"),
            TelemetryError::Encode(e) => write!(f, "cannot encode telemetry: {e}"),
            TelemetryError::Publish(e) => write!(f, "publish failed: {e}"),
        }
    }
}

impl std::error::Error for TelemetryError {}

impl TelemetryError {
    pub fn fault_class(&self) -> FaultClass {
        match self {
            TelemetryError::Encode(_) => FaultClass::Malformed,
            TelemetryError::Disconnected | TelemetryError::Publish(_) => FaultClass::TransportFailure,
        }
    }
}

/// Where status, acknowledgements and audit records go.
///
/// Delivery is best effort: callers log a failure and carry on, never retry
/// and never hold an actuation back for it.
pub trait Telemetry {
    fn report(&mut self, report: &StatusReport) -> Result<(), TelemetryError>;
    fn acknowledge(&mut self, ack: &CommandAck) -> Result<(), TelemetryError>;
    fn audit(&mut self, record: &RemoteAuditRecord) -> Result<(), TelemetryError>;
}
