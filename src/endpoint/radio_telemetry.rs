use std::sync::Arc;

use super::{
    constants::{
        CODE_AUTO_CLOSED, CODE_CLOSED, CODE_ERROR, CODE_ONLINE, CODE_OPEN, CODE_REMOTE_CLOSED,
        CODE_REMOTE_OPEN, MAX_STATUS_LEN, RADIO_ACK_ADDRESS,
    },
    radio_command::format_ack,
};
use crate::{
    actuator::{
        CommandAck, DoorStatus, RemoteAuditRecord, StatusReport, Telemetry, TelemetryError, Trigger,
    },
    frame::{GatewayReply, MsgType, ReplyStatus},
    link::{ByteChannel, LinkTransport, OutboundFrame},
    log::LogSink,
    sink_info,
};

/// Short status code a report travels as, or `None` when the radio
/// protocol has no code for it.
pub fn status_code(report: &StatusReport) -> Option<&'static str> {
    match (report.state, report.trigger) {
        (DoorStatus::Online, _) => Some(CODE_ONLINE),
        (DoorStatus::Unlocked, Trigger::RemoteUnlock) => Some(CODE_REMOTE_OPEN),
        (DoorStatus::Unlocked, _) => Some(CODE_OPEN),
        (DoorStatus::Locked, Trigger::RemoteLock) => Some(CODE_REMOTE_CLOSED),
        (DoorStatus::Locked, Trigger::AutoLock) if report.remote_active => Some(CODE_AUTO_CLOSED),
        (DoorStatus::Locked, Trigger::AutoLock) => Some(CODE_CLOSED),
        (DoorStatus::Locked, _) => None,
        (DoorStatus::Error, _) => Some(CODE_ERROR),
        (DoorStatus::LowMemory, _) => None,
    }
}

/// Telemetry over the radio link: status reports become gate-status frames,
/// acknowledgements become reply-layout `ACK:` packets and audit records go
/// to the log.
pub struct RadioTelemetry<'a, C: ByteChannel> {
    link: &'a mut LinkTransport<C>,
    logger: &'a Arc<dyn LogSink>,
}

impl<'a, C: ByteChannel> RadioTelemetry<'a, C> {
    pub fn new(link: &'a mut LinkTransport<C>, logger: &'a Arc<dyn LogSink>) -> Self {
        Self { link, logger }
    }
}

impl<C: ByteChannel> Telemetry for RadioTelemetry<'_, C> {
    fn report(&mut self, report: &StatusReport) -> Result<(), TelemetryError> {
        let Some(code) = status_code(report) else {
            return Ok(());
        };
        let bytes = &code.as_bytes()[..code.len().min(MAX_STATUS_LEN)];
        self.link
            .send_once(&OutboundFrame::new(MsgType::GateStatus, bytes))
            .map(|_| ())
            .map_err(|e| TelemetryError::Publish(e.to_string()))
    }

    fn acknowledge(&mut self, ack: &CommandAck) -> Result<(), TelemetryError> {
        let reply = GatewayReply::new(RADIO_ACK_ADDRESS, ReplyStatus::App(format_ack(ack)));
        self.link
            .send_reply(&reply)
            .map_err(|e| TelemetryError::Publish(e.to_string()))
    }

    fn audit(&mut self, record: &RemoteAuditRecord) -> Result<(), TelemetryError> {
        sink_info!(
            self.logger,
            "[AUDIT] remote {} {} by {} for {} ms ({})",
            record.action,
            record.command_id,
            record.initiated_by,
            record.duration_ms,
            record.reason
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(state: DoorStatus, trigger: Trigger, remote: bool) -> StatusReport {
        let mut r = StatusReport::new("gate_01", state, trigger, 0);
        r.remote_active = remote;
        r
    }

    #[test]
    fn codes_match_gateway_vocabulary() {
        assert_eq!(status_code(&report(DoorStatus::Online, Trigger::Startup, false)), Some("ONLINE"));
        assert_eq!(status_code(&report(DoorStatus::Unlocked, Trigger::Grant, false)), Some("open"));
        assert_eq!(status_code(&report(DoorStatus::Locked, Trigger::AutoLock, false)), Some("clos"));
        assert_eq!(
            status_code(&report(DoorStatus::Unlocked, Trigger::RemoteUnlock, true)),
            Some("REMOTE_OPEN")
        );
        assert_eq!(status_code(&report(DoorStatus::Locked, Trigger::AutoLock, true)), Some("AUTO_CLOS"));
        assert_eq!(status_code(&report(DoorStatus::Locked, Trigger::RemoteLock, false)), Some("REMOTE_CLOS"));
        assert_eq!(status_code(&report(DoorStatus::Error, Trigger::Timeout, false)), Some("erro"));
        assert_eq!(status_code(&report(DoorStatus::Locked, Trigger::Denied, false)), None);
    }
}
