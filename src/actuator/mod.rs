//! Door/gate actuation: local grant and deny, remote sessions, status.

pub mod actuator;
pub mod actuator_controller;
pub mod command;
pub mod command_error;
pub mod constants;
pub mod door_state;
pub mod remote_config;
pub mod remote_session;
pub mod status_report;
pub mod telemetry;

pub use actuator::{Actuator, Indication, Position};
pub use actuator_controller::{ActuationOutcome, ActuatorController};
pub use command::{Command, ConfigUpdate, RemoteLock, RemoteUnlock};
pub use command_error::CommandError;
pub use door_state::DoorState;
pub use remote_config::RemoteUnlockConfig;
pub use remote_session::RemoteSession;
pub use status_report::{CommandAck, DoorStatus, RemoteAuditRecord, StatusReport, Trigger};
pub use telemetry::{Telemetry, TelemetryError};
