use std::sync::Arc;

use super::{
    constants::MAX_UID_LEN, endpoint_config::GateConfig, endpoint_stats::EndpointStats,
    radio_command::parse_radio_command, radio_telemetry::RadioTelemetry,
};
use crate::{
    actuator::{
        Actuator, ActuatorController, CommandAck, DoorStatus, Indication, Telemetry, Trigger,
    },
    clock::Clock,
    frame::{DeviceType, MsgType, ReplyStatus},
    link::{ByteChannel, LinkError, LinkStats, LinkTransport, OutboundFrame, ReplySchema},
    log::LogSink,
    sink_debug, sink_info, sink_warn,
    supervisor::Liveness,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Granted,
    Denied,
    /// Send failed or no decision arrived in time; treated as a denial.
    NoReply,
    InvalidUid,
    /// Inside the debounce window after the previous scan.
    Debounced,
    /// A hold was in progress; the scan was dropped.
    Busy,
}

/// Card reader on the radio link.
///
/// Each scan is one frame exchange with the gateway: a scan frame carrying
/// the card UID out, a `GRANT`/`DENY5` reply back. Between scans,
/// [`GateReader::tick`] services the open hold and picks up remote commands.
pub struct GateReader<C: ByteChannel, A: Actuator> {
    link: LinkTransport<C>,
    controller: ActuatorController<A>,
    config: GateConfig,
    stats: EndpointStats,
    last_scan_ms: Option<u64>,
    clock: Arc<dyn Clock>,
    liveness: Arc<dyn Liveness>,
    logger: Arc<dyn LogSink>,
}

impl<C: ByteChannel, A: Actuator> GateReader<C, A> {
    pub fn new(
        channel: C,
        actuator: A,
        config: GateConfig,
        clock: Arc<dyn Clock>,
        liveness: Arc<dyn Liveness>,
        logger: Arc<dyn LogSink>,
    ) -> Self {
        let link = LinkTransport::new(
            channel,
            DeviceType::RfidGate,
            clock.clone(),
            liveness.clone(),
            logger.clone(),
        );
        let controller = ActuatorController::new(
            actuator,
            config.device_id.clone(),
            config.remote,
            clock.clone(),
            logger.clone(),
        )
        .with_open_hold(config.open_hold);

        Self {
            link,
            controller,
            config,
            stats: EndpointStats::default(),
            last_scan_ms: None,
            clock,
            liveness,
            logger,
        }
    }

    pub fn stats(&self) -> EndpointStats {
        self.stats
    }

    pub fn link_stats(&self) -> LinkStats {
        self.link.stats()
    }

    pub fn link(&self) -> &LinkTransport<C> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut LinkTransport<C> {
        &mut self.link
    }

    pub fn controller(&self) -> &ActuatorController<A> {
        &self.controller
    }

    /// Closes the gate and announces the reader.
    pub fn start(&mut self) {
        self.controller.park();
        let mut tel = RadioTelemetry::new(&mut self.link, &self.logger);
        self.controller
            .report(&mut tel, DoorStatus::Online, Trigger::Startup, None);
        sink_info!(&self.logger, "[GATE] {} online", self.config.device_id);
    }

    pub fn on_card(&mut self, uid: &[u8]) -> ScanOutcome {
        self.liveness.feed();
        let now = self.clock.now_ms();

        if self.controller.is_holding() {
            self.stats.ignored += 1;
            return ScanOutcome::Busy;
        }
        let debounce_ms = self.config.debounce.as_millis() as u64;
        if self
            .last_scan_ms
            .is_some_and(|last| now.saturating_sub(last) < debounce_ms)
        {
            sink_debug!(&self.logger, "[GATE] scan inside debounce window");
            return ScanOutcome::Debounced;
        }
        self.last_scan_ms = Some(now);

        if uid.is_empty() || uid.len() > MAX_UID_LEN {
            sink_warn!(&self.logger, "[GATE] invalid UID size {}", uid.len());
            self.controller.actuator_mut().indicate(Indication::Error);
            return ScanOutcome::InvalidUid;
        }

        self.stats.requests += 1;
        sink_info!(&self.logger, "[GATE] card {}", hex::encode_upper(uid));
        let result = self.link.exchange(
            &OutboundFrame::new(MsgType::Scan, uid),
            &self.config.retry,
            &ReplySchema::access_decision(),
            self.config.reply_timeout,
        );
        self.link.reset();

        let mut tel = RadioTelemetry::new(&mut self.link, &self.logger);
        match result {
            Ok(reply) if reply.status == ReplyStatus::Grant => {
                self.stats.granted += 1;
                self.controller.grant(&mut tel);
                ScanOutcome::Granted
            }
            Ok(reply) => {
                self.stats.denied += 1;
                self.controller.deny(
                    &mut tel,
                    DoorStatus::Locked,
                    Trigger::Denied,
                    Some(reply.status.as_str()),
                );
                ScanOutcome::Denied
            }
            Err(e) => {
                let trigger = match e {
                    LinkError::Timeout { .. } => {
                        self.stats.timeouts += 1;
                        Trigger::Timeout
                    }
                    _ => {
                        self.stats.transport_errors += 1;
                        Trigger::TransportError
                    }
                };
                sink_warn!(&self.logger, "[GATE] no decision: {}", e);
                self.controller
                    .deny(&mut tel, DoorStatus::Error, trigger, None);
                ScanOutcome::NoReply
            }
        }
    }

    /// One pass of the idle loop: relock after a hold, then handle at most
    /// one remote command. Returns the acknowledgement that was sent.
    pub fn tick(&mut self) -> Option<CommandAck> {
        self.liveness.feed();
        {
            let mut tel = RadioTelemetry::new(&mut self.link, &self.logger);
            self.controller.tick(&mut tel);
        }

        let reply = self.link.poll_inbound(&ReplySchema::remote_command())?;
        self.stats.remote_commands += 1;
        let text = reply.status.as_str().to_string();

        let mut tel = RadioTelemetry::new(&mut self.link, &self.logger);
        match parse_radio_command(&text) {
            Ok(cmd) => {
                sink_info!(&self.logger, "[GATE] remote command {}", cmd.name());
                self.controller.handle_command(&mut tel, &cmd)
            }
            Err(e) => {
                self.stats.dropped_commands += 1;
                sink_warn!(&self.logger, "[GATE] bad remote command: {}", e);
                let ack = CommandAck {
                    device_id: self.config.device_id.clone(),
                    command_id: "error".to_string(),
                    success: false,
                    status: "invalid_format".to_string(),
                    timestamp: self.clock.unix_secs(),
                };
                if let Err(e) = tel.acknowledge(&ack) {
                    sink_debug!(&self.logger, "[GATE] ack dropped: {}", e);
                }
                Some(ack)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::{
        actuator::{DoorState, Position},
        clock::ManualClock,
        frame::{GatewayReply, decode},
        harness::{ActuatorEvent, CountingLiveness, RecordingActuator, ScriptedChannel},
        log::NoopLogSink,
    };

    type Reader = GateReader<ScriptedChannel, RecordingActuator>;

    fn reader() -> (Reader, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let r = GateReader::new(
            ScriptedChannel::default(),
            RecordingActuator::default(),
            GateConfig::default(),
            clock.clone(),
            Arc::new(CountingLiveness::default()),
            Arc::new(NoopLogSink),
        );
        (r, clock)
    }

    fn reply(status: &str) -> Vec<u8> {
        GatewayReply::new(0x0004, ReplyStatus::parse(status))
            .encode()
            .unwrap()
    }

    fn sent_status_codes(r: &Reader) -> Vec<String> {
        r.link()
            .channel()
            .sent()
            .iter()
            .filter_map(|b| decode(b).ok())
            .filter(|f| f.kind() == Some(MsgType::GateStatus))
            .map(|f| String::from_utf8(f.payload).unwrap())
            .collect()
    }

    #[test]
    fn start_announces_online() {
        let (mut r, _) = reader();
        r.start();
        assert_eq!(sent_status_codes(&r), vec!["ONLINE"]);
        assert_eq!(r.controller().actuator().events(), vec![ActuatorEvent::Drive(Position::Closed)]);
    }

    #[test]
    fn granted_scan_opens_then_closes_on_tick() {
        let (mut r, clock) = reader();
        r.link_mut().channel_mut().push_inbound(reply("GRANT"));

        assert_eq!(r.on_card(&[0xDE, 0xAD, 0xBE, 0xEF]), ScanOutcome::Granted);
        assert!(r.controller().is_holding());

        let scan = decode(&r.link().channel().sent()[0]).unwrap();
        assert_eq!(scan.kind(), Some(MsgType::Scan));
        assert_eq!(scan.payload, vec![0xDE, 0xAD, 0xBE, 0xEF]);

        assert_eq!(r.on_card(&[1, 2, 3, 4]), ScanOutcome::Busy);

        clock.advance(5_000);
        assert!(r.tick().is_none());
        assert_eq!(r.controller().state(), DoorState::Locked);
        assert_eq!(sent_status_codes(&r), vec!["open", "clos"]);
    }

    #[test]
    fn denial_and_debounce() {
        let (mut r, clock) = reader();
        r.link_mut().channel_mut().push_inbound(reply("DENY5"));
        assert_eq!(r.on_card(&[1, 2, 3, 4]), ScanOutcome::Denied);
        assert!(r.controller().actuator().events().contains(&ActuatorEvent::Indicate(Indication::Error)));

        clock.advance(1_000);
        assert_eq!(r.on_card(&[1, 2, 3, 4]), ScanOutcome::Debounced);
        assert_eq!(r.stats().denied, 1);
        assert_eq!(r.stats().requests, 1);
    }

    #[test]
    fn silence_is_a_denial_with_error_status() {
        let (mut r, _) = reader();
        assert_eq!(r.on_card(&[9; 7]), ScanOutcome::NoReply);
        assert_eq!(r.stats().timeouts, 1);
        assert_eq!(sent_status_codes(&r), vec!["erro"]);
        assert_eq!(r.controller().state(), DoorState::Locked);
    }

    #[test]
    fn uid_length_is_checked_before_sending() {
        let (mut r, _) = reader();
        assert_eq!(r.on_card(&[0; 11]), ScanOutcome::InvalidUid);
        assert!(r.link().channel().sent().is_empty());
    }
}
