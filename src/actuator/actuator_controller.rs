use std::{sync::Arc, time::Duration};

use super::{
    actuator::{Actuator, Indication, Position},
    command::{Command, ConfigUpdate, RemoteLock, RemoteUnlock},
    constants::{ACTUATION_MARGIN, MANUAL_LOCK_REASON, NO_REASON, OPEN_HOLD, UNKNOWN_USER},
    door_state::DoorState,
    remote_config::RemoteUnlockConfig,
    remote_session::RemoteSession,
    status_report::{CommandAck, DoorStatus, RemoteAuditRecord, StatusReport, Trigger},
    telemetry::Telemetry,
};
use crate::{clock::Clock, log::LogSink, sink_debug, sink_info, sink_warn};

/// Result of a local decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuationOutcome {
    Opened,
    Denied,
    /// A hold is in progress; the request was dropped.
    Ignored,
}

/// Turns decisions and remote commands into bounded actuations.
///
/// Holds are not blocking: [`ActuatorController::tick`] closes the door once
/// the hold has elapsed and retires an expired remote session. Local input
/// arriving during a hold is ignored; a remote lock always wins.
pub struct ActuatorController<A: Actuator> {
    actuator: A,
    device_id: String,
    state: DoorState,
    session: RemoteSession,
    remote: RemoteUnlockConfig,
    open_hold: Duration,
    margin: Duration,
    clock: Arc<dyn Clock>,
    logger: Arc<dyn LogSink>,
}

impl<A: Actuator> ActuatorController<A> {
    pub fn new(
        actuator: A,
        device_id: impl Into<String>,
        remote: RemoteUnlockConfig,
        clock: Arc<dyn Clock>,
        logger: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            actuator,
            device_id: device_id.into(),
            state: DoorState::Locked,
            session: RemoteSession::default(),
            remote,
            open_hold: OPEN_HOLD,
            margin: ACTUATION_MARGIN,
            clock,
            logger,
        }
    }

    pub fn with_open_hold(mut self, hold: Duration) -> Self {
        self.open_hold = hold;
        self
    }

    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn session(&self) -> &RemoteSession {
        &self.session
    }

    pub fn remote_config(&self) -> &RemoteUnlockConfig {
        &self.remote
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    /// True while the door is held open.
    pub fn is_holding(&self) -> bool {
        self.state.is_open()
    }

    /// Drives the actuator to its rest position without reporting.
    pub fn park(&mut self) {
        self.actuator.drive(Position::Closed);
        self.state = DoorState::Locked;
    }

    pub fn grant(&mut self, tel: &mut dyn Telemetry) -> ActuationOutcome {
        if self.is_holding() {
            sink_debug!(&self.logger, "[ACTUATOR] grant during hold ignored");
            return ActuationOutcome::Ignored;
        }
        let now = self.clock.now_ms();
        self.actuator.drive(Position::Open);
        self.actuator.indicate(Indication::Success);
        self.state = DoorState::Unlocked {
            until_ms: now + self.open_hold.as_millis() as u64,
        };
        sink_info!(&self.logger, "[ACTUATOR] open for {} ms", self.open_hold.as_millis());
        self.report(tel, DoorStatus::Unlocked, Trigger::Grant, None);
        ActuationOutcome::Opened
    }

    /// Ensures the door is closed and signals the failure. `status` selects
    /// the reported state (`Locked` for a denial, `Error` for a timeout or
    /// transport failure).
    pub fn deny(
        &mut self,
        tel: &mut dyn Telemetry,
        status: DoorStatus,
        trigger: Trigger,
        reason: Option<&str>,
    ) -> ActuationOutcome {
        if self.is_holding() {
            sink_debug!(&self.logger, "[ACTUATOR] deny during hold ignored");
            return ActuationOutcome::Ignored;
        }
        self.actuator.drive(Position::Closed);
        self.actuator.indicate(Indication::Error);
        self.report(tel, status, trigger, reason);
        ActuationOutcome::Denied
    }

    pub fn remote_unlock(&mut self, tel: &mut dyn Telemetry, req: &RemoteUnlock) -> CommandAck {
        let now = self.clock.now_ms();
        let command_id = req.command_id.clone().unwrap_or_else(|| now.to_string());

        if !self.remote.enabled {
            sink_warn!(&self.logger, "[ACTUATOR] remote unlock {} refused: disabled", command_id);
            return self.ack(tel, command_id, false, "remote_unlock_disabled");
        }

        let user = req.user.clone().unwrap_or_else(|| UNKNOWN_USER.to_string());
        let reason = req.reason.clone().unwrap_or_else(|| NO_REASON.to_string());
        let duration = self.remote.effective_duration(req.duration_ms);

        self.audit(tel, "unlock", &command_id, &user, &reason, duration);
        self.session = RemoteSession::start(command_id.clone(), user.clone(), reason, now, duration);

        self.actuator.drive(Position::Open);
        self.actuator.indicate(Indication::Success);
        self.state = DoorState::RemoteUnlocked {
            until_ms: now + duration,
        };
        sink_info!(&self.logger, "[ACTUATOR] remote unlock by {} for {} ms", user, duration);
        self.report(tel, DoorStatus::Unlocked, Trigger::RemoteUnlock, None);
        self.ack(tel, command_id, true, "unlocked")
    }

    pub fn remote_lock(&mut self, tel: &mut dyn Telemetry, req: &RemoteLock) -> CommandAck {
        let now = self.clock.now_ms();
        let command_id = req.command_id.clone().unwrap_or_else(|| now.to_string());
        let user = req.user.clone().unwrap_or_else(|| UNKNOWN_USER.to_string());

        if self.session.active {
            sink_info!(&self.logger, "[ACTUATOR] remote session {} cancelled", self.session.command_id);
            self.session.clear();
        }
        self.audit(tel, "lock", &command_id, &user, MANUAL_LOCK_REASON, 0);

        self.actuator.drive(Position::Closed);
        self.state = DoorState::Locked;
        sink_info!(&self.logger, "[ACTUATOR] remote lock by {}", user);
        self.report(tel, DoorStatus::Locked, Trigger::RemoteLock, None);
        self.ack(tel, command_id, true, "locked")
    }

    pub fn update_config(&mut self, tel: &mut dyn Telemetry, upd: &ConfigUpdate) -> CommandAck {
        if let Some(enabled) = upd.remote_enabled {
            self.remote.enabled = enabled;
        }
        if let Some(ms) = upd.default_duration_ms {
            self.remote.default_duration_ms = ms;
        }
        if let Some(ms) = upd.max_duration_ms {
            self.remote.max_duration_ms = ms;
        }
        sink_info!(&self.logger, "[ACTUATOR] remote config now {:?}", self.remote);
        let command_id = upd
            .command_id
            .clone()
            .unwrap_or_else(|| self.clock.now_ms().to_string());
        self.ack(tel, command_id, true, "config_updated")
    }

    /// Dispatches a gateway command. Remote commands yield an acknowledgement.
    pub fn handle_command(&mut self, tel: &mut dyn Telemetry, cmd: &Command) -> Option<CommandAck> {
        match cmd {
            Command::Open { .. } => {
                self.grant(tel);
                None
            }
            Command::Lock { reason } => {
                self.deny(tel, DoorStatus::Locked, Trigger::Denied, reason.as_deref());
                None
            }
            Command::RemoteUnlock(req) => Some(self.remote_unlock(tel, req)),
            Command::RemoteLock(req) => Some(self.remote_lock(tel, req)),
            Command::UpdateConfig(upd) => Some(self.update_config(tel, upd)),
        }
    }

    /// Closes an elapsed hold and retires an expired remote session.
    pub fn tick(&mut self, tel: &mut dyn Telemetry) {
        let now = self.clock.now_ms();
        if let Some(until) = self.state.relock_at() {
            if now >= until {
                self.actuator.drive(Position::Closed);
                self.state = DoorState::Locked;
                sink_info!(&self.logger, "[ACTUATOR] auto-lock");
                self.report(tel, DoorStatus::Locked, Trigger::AutoLock, None);
            }
        }
        if self.session.active && self.session.is_expired(now, self.margin.as_millis() as u64) {
            sink_info!(&self.logger, "[ACTUATOR] remote session {} ended", self.session.command_id);
            self.session.clear();
        }
    }

    /// Best-effort status report with the current session attached.
    pub fn report(
        &self,
        tel: &mut dyn Telemetry,
        state: DoorStatus,
        trigger: Trigger,
        reason: Option<&str>,
    ) {
        let mut r = StatusReport::new(self.device_id.clone(), state, trigger, self.clock.unix_secs());
        r.reason = reason.map(str::to_string);
        if self.session.active {
            r.remote_active = true;
            r.remote_user = Some(self.session.initiated_by.clone());
        }
        self.send_report(tel, &r);
    }

    pub fn send_report(&self, tel: &mut dyn Telemetry, r: &StatusReport) {
        if let Err(e) = tel.report(r) {
            sink_debug!(&self.logger, "[ACTUATOR] status report dropped: {}", e);
        }
    }

    fn ack(&self, tel: &mut dyn Telemetry, command_id: String, success: bool, status: &str) -> CommandAck {
        let ack = CommandAck {
            device_id: self.device_id.clone(),
            command_id,
            success,
            status: status.to_string(),
            timestamp: self.clock.unix_secs(),
        };
        if let Err(e) = tel.acknowledge(&ack) {
            sink_debug!(&self.logger, "[ACTUATOR] ack dropped: {}", e);
        }
        ack
    }

    fn audit(
        &self,
        tel: &mut dyn Telemetry,
        action: &'static str,
        command_id: &str,
        user: &str,
        reason: &str,
        duration_ms: u64,
    ) {
        if !self.remote.audit_log {
            return;
        }
        let record = RemoteAuditRecord {
            device_id: self.device_id.clone(),
            kind: "remote_access",
            action,
            command_id: command_id.to_string(),
            initiated_by: user.to_string(),
            reason: reason.to_string(),
            duration_ms,
            timestamp: self.clock.unix_secs(),
        };
        if let Err(e) = tel.audit(&record) {
            sink_debug!(&self.logger, "[ACTUATOR] audit record dropped: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::{
        actuator::TelemetryError,
        clock::ManualClock,
        harness::{ActuatorEvent, RecordingActuator, RecordingTelemetry},
        log::NoopLogSink,
    };

    fn controller() -> (ActuatorController<RecordingActuator>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let c = ActuatorController::new(
            RecordingActuator::default(),
            "passkey_01",
            RemoteUnlockConfig::default(),
            clock.clone(),
            Arc::new(NoopLogSink),
        );
        (c, clock)
    }

    fn unlock(id: &str, duration_ms: Option<i64>) -> RemoteUnlock {
        RemoteUnlock {
            command_id: Some(id.into()),
            user: Some("admin".into()),
            reason: Some("delivery".into()),
            duration_ms,
        }
    }

    #[test]
    fn grant_holds_then_auto_locks() {
        let (mut c, clock) = controller();
        let mut tel = RecordingTelemetry::default();

        assert_eq!(c.grant(&mut tel), ActuationOutcome::Opened);
        assert_eq!(c.state(), DoorState::Unlocked { until_ms: 5_000 });
        assert_eq!(c.grant(&mut tel), ActuationOutcome::Ignored);

        clock.set_now_ms(4_999);
        c.tick(&mut tel);
        assert!(c.is_holding());

        clock.set_now_ms(5_000);
        c.tick(&mut tel);
        assert_eq!(c.state(), DoorState::Locked);
        assert_eq!(
            c.actuator().events(),
            vec![
                ActuatorEvent::Drive(Position::Open),
                ActuatorEvent::Indicate(Indication::Success),
                ActuatorEvent::Drive(Position::Closed),
            ]
        );
        let states: Vec<_> = tel.reports.iter().map(|r| (r.state, r.trigger)).collect();
        assert_eq!(
            states,
            vec![(DoorStatus::Unlocked, Trigger::Grant), (DoorStatus::Locked, Trigger::AutoLock)]
        );
    }

    #[test]
    fn deny_closes_and_indicates_error() {
        let (mut c, _) = controller();
        let mut tel = RecordingTelemetry::default();
        assert_eq!(
            c.deny(&mut tel, DoorStatus::Locked, Trigger::Denied, Some("invalid_password")),
            ActuationOutcome::Denied
        );
        assert_eq!(c.state(), DoorState::Locked);
        assert_eq!(tel.reports[0].reason.as_deref(), Some("invalid_password"));
        assert!(c.actuator().events().contains(&ActuatorEvent::Indicate(Indication::Error)));
    }

    #[test]
    fn remote_unlock_audits_before_actuating_and_clamps() {
        let (mut c, _) = controller();
        let mut tel = RecordingTelemetry::default();
        let ack = c.remote_unlock(&mut tel, &unlock("c1", Some(120_000)));

        assert!(ack.success);
        assert_eq!(ack.status, "unlocked");
        assert_eq!(tel.audits.len(), 1);
        assert_eq!(tel.audits[0].duration_ms, 30_000);
        assert_eq!(tel.order.first().map(String::as_str), Some("audit"));
        assert_eq!(c.state(), DoorState::RemoteUnlocked { until_ms: 30_000 });
        assert!(tel.reports[0].remote_active);
        assert_eq!(tel.reports[0].remote_user.as_deref(), Some("admin"));
    }

    #[test]
    fn remote_session_expires_after_margin() {
        let (mut c, clock) = controller();
        let mut tel = RecordingTelemetry::default();
        c.remote_unlock(&mut tel, &unlock("c2", Some(5_000)));

        clock.set_now_ms(5_000);
        c.tick(&mut tel);
        assert_eq!(c.state(), DoorState::Locked);
        assert!(c.session().active);

        clock.set_now_ms(5_000 + 5_000 - 1);
        c.tick(&mut tel);
        assert!(c.session().active);

        clock.set_now_ms(5_000 + 5_000);
        c.tick(&mut tel);
        assert!(!c.session().active);
    }

    #[test]
    fn remote_lock_preempts_any_hold() {
        let (mut c, clock) = controller();
        let mut tel = RecordingTelemetry::default();
        c.remote_unlock(&mut tel, &unlock("c3", Some(20_000)));
        clock.advance(1_000);

        let ack = c.remote_lock(&mut tel, &RemoteLock { command_id: Some("c4".into()), user: None });
        assert_eq!(ack.status, "locked");
        assert_eq!(c.state(), DoorState::Locked);
        assert!(!c.session().active);
        assert_eq!(tel.audits[1].action, "lock");
        assert_eq!(tel.audits[1].reason, MANUAL_LOCK_REASON);
        assert_eq!(c.actuator().events().last(), Some(&ActuatorEvent::Drive(Position::Closed)));

        // local hold too
        c.grant(&mut tel);
        c.remote_lock(&mut tel, &RemoteLock::default());
        assert_eq!(c.state(), DoorState::Locked);
    }

    #[test]
    fn disabled_remote_unlock_is_refused_and_config_is_updatable() {
        let (mut c, _) = controller();
        let mut tel = RecordingTelemetry::default();

        let ack = c.update_config(
            &mut tel,
            &ConfigUpdate {
                command_id: Some("cfg".into()),
                remote_enabled: Some(false),
                ..ConfigUpdate::default()
            },
        );
        assert_eq!(ack.status, "config_updated");

        let ack = c.remote_unlock(&mut tel, &unlock("c5", None));
        assert!(!ack.success);
        assert_eq!(ack.status, "remote_unlock_disabled");
        assert_eq!(c.state(), DoorState::Locked);
        assert!(c.actuator().events().is_empty());
    }

    #[test]
    fn telemetry_failure_never_blocks_actuation() {
        let (mut c, _) = controller();
        let mut tel = RecordingTelemetry::failing(TelemetryError::Disconnected);
        assert_eq!(c.grant(&mut tel), ActuationOutcome::Opened);
        let ack = c.remote_lock(&mut tel, &RemoteLock::default());
        assert!(ack.success);
        assert_eq!(c.state(), DoorState::Locked);
    }

    #[test]
    fn handle_command_dispatches() {
        let (mut c, _) = controller();
        let mut tel = RecordingTelemetry::default();
        assert!(c.handle_command(&mut tel, &Command::Open { reason: None }).is_none());
        assert!(c.is_holding());
        let ack = c.handle_command(&mut tel, &Command::RemoteLock(RemoteLock::default()));
        assert_eq!(ack.map(|a| a.status), Some("locked".to_string()));
    }
}
