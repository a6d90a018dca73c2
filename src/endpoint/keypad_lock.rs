use std::sync::Arc;

use super::{
    endpoint_config::KeypadConfig,
    endpoint_stats::EndpointStats,
    memory_monitor::{MemoryMonitor, MemoryProbe, MemoryVerdict},
    pubsub::{PubSub, Topics},
    pubsub_telemetry::PubSubTelemetry,
};
use crate::{
    actuator::{
        Actuator, ActuatorController, Command, CommandAck, DoorStatus, Indication, StatusReport,
        Trigger,
    },
    clock::Clock,
    envelope::{EnvelopeSigner, constants::UNLOCK_REQUEST},
    fault::FaultClass,
    log::LogSink,
    rate_limiter::RateLimiter,
    sink_debug, sink_error, sink_info, sink_warn,
    supervisor::{Liveness, NoopLiveness, ProcessRestart, RestartHandle, RestartReason},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Code still incomplete; carries the number of keys entered.
    Buffered(usize),
    /// Signed request published, waiting for `OPEN`/`LOCK`.
    Submitted,
    /// A request or hold was in flight; the code was discarded.
    Busy,
    LockedOut,
    RateLimited,
    NotConnected,
    Failed(FaultClass),
}

/// Keypad lock on the publish/subscribe channel.
///
/// A complete code becomes one signed `unlock_request`; the gateway answers
/// on the command topic. Everything else (entry and reply deadlines, the
/// failure lockout, remote sessions, memory checks) happens in
/// [`KeypadLock::tick`], so the control loop never blocks.
pub struct KeypadLock<P: PubSub, A: Actuator> {
    pubsub: P,
    controller: ActuatorController<A>,
    signer: EnvelopeSigner,
    limiter: RateLimiter,
    memory: Option<MemoryMonitor>,
    topics: Topics,
    config: KeypadConfig,
    entry: String,
    last_key_ms: u64,
    waiting_for_reply: bool,
    consecutive_failures: u32,
    lockout_until: Option<u64>,
    stats: EndpointStats,
    restart: Arc<dyn RestartHandle>,
    clock: Arc<dyn Clock>,
    liveness: Arc<dyn Liveness>,
    logger: Arc<dyn LogSink>,
}

impl<P: PubSub, A: Actuator> KeypadLock<P, A> {
    pub fn new(
        pubsub: P,
        actuator: A,
        config: KeypadConfig,
        clock: Arc<dyn Clock>,
        logger: Arc<dyn LogSink>,
    ) -> Self {
        let signer = EnvelopeSigner::new(
            config.key.clone(),
            config.salt.clone(),
            config.device_id.clone(),
            clock.clone(),
        )
        .with_digest_len(config.digest_len);
        let controller = ActuatorController::new(
            actuator,
            config.device_id.clone(),
            config.remote,
            clock.clone(),
            logger.clone(),
        )
        .with_open_hold(config.open_hold);

        Self {
            pubsub,
            controller,
            signer,
            limiter: RateLimiter::new(config.rate_limit, clock.clone()),
            memory: None,
            topics: Topics::for_device(&config.device_id),
            config,
            entry: String::new(),
            last_key_ms: 0,
            waiting_for_reply: false,
            consecutive_failures: 0,
            lockout_until: None,
            stats: EndpointStats::default(),
            restart: Arc::new(ProcessRestart::new(logger.clone())),
            clock,
            liveness: Arc::new(NoopLiveness),
            logger,
        }
    }

    pub fn with_liveness(mut self, liveness: Arc<dyn Liveness>) -> Self {
        self.liveness = liveness;
        self
    }

    pub fn with_restart(mut self, restart: Arc<dyn RestartHandle>) -> Self {
        self.restart = restart;
        self
    }

    pub fn with_memory_probe(mut self, probe: Box<dyn MemoryProbe>) -> Self {
        self.memory = Some(MemoryMonitor::new(
            probe,
            self.config.memory,
            self.clock.now_ms(),
        ));
        self
    }

    /// Replaces the request signer, e.g. with one on a seeded nonce source.
    pub fn with_signer(mut self, signer: EnvelopeSigner) -> Self {
        self.signer = signer;
        self
    }

    pub fn stats(&self) -> EndpointStats {
        self.stats
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    pub fn pubsub(&self) -> &P {
        &self.pubsub
    }

    pub fn pubsub_mut(&mut self) -> &mut P {
        &mut self.pubsub
    }

    pub fn controller(&self) -> &ActuatorController<A> {
        &self.controller
    }

    pub fn is_waiting_for_reply(&self) -> bool {
        self.waiting_for_reply
    }

    pub fn entered(&self) -> usize {
        self.entry.len()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn is_locked_out(&self) -> bool {
        self.lockout_until
            .is_some_and(|until| self.clock.now_ms() < until)
    }

    /// Locks the door and publishes the retained `online` status.
    pub fn start(&mut self) {
        self.controller.park();
        let mut report = StatusReport::new(
            self.config.device_id.clone(),
            DoorStatus::Online,
            Trigger::Startup,
            self.clock.unix_secs(),
        );
        if let Some(m) = &self.memory {
            report = report.with_free_heap(m.free_bytes());
        }
        let mut tel = PubSubTelemetry::new(&mut self.pubsub, &self.topics);
        self.controller.send_report(&mut tel, &report);
        sink_info!(&self.logger, "[KEYPAD] {} online", self.config.device_id);
    }

    pub fn on_key(&mut self, key: char) -> KeyOutcome {
        self.liveness.feed();
        if self.is_locked_out() {
            self.stats.ignored += 1;
            return KeyOutcome::LockedOut;
        }

        self.entry.push(key);
        self.last_key_ms = self.clock.now_ms();
        if self.entry.len() < self.config.code_length {
            return KeyOutcome::Buffered(self.entry.len());
        }
        let secret = std::mem::take(&mut self.entry);

        if self.waiting_for_reply || self.controller.is_holding() {
            self.stats.ignored += 1;
            sink_debug!(&self.logger, "[KEYPAD] code dropped, request in flight");
            return KeyOutcome::Busy;
        }
        if !self.pubsub.is_connected() {
            sink_warn!(&self.logger, "[KEYPAD] not connected, code dropped");
            self.signal_error();
            return KeyOutcome::NotConnected;
        }
        if !self.limiter.allow() {
            self.stats.rate_limited += 1;
            sink_warn!(&self.logger, "[KEYPAD] rate limit reached");
            self.signal_error();
            return KeyOutcome::RateLimited;
        }

        let payload = match self.signer.build_request(UNLOCK_REQUEST, &secret) {
            Ok(p) => p,
            Err(e) => {
                sink_error!(&self.logger, "[KEYPAD] cannot sign request: {}", e);
                self.signal_error();
                return KeyOutcome::Failed(e.fault_class());
            }
        };
        match self.pubsub.publish(&self.topics.request, &payload, false) {
            Ok(()) => {
                self.waiting_for_reply = true;
                self.stats.requests += 1;
                sink_info!(&self.logger, "[KEYPAD] unlock request sent");
                KeyOutcome::Submitted
            }
            Err(e) => {
                self.stats.transport_errors += 1;
                sink_warn!(&self.logger, "[KEYPAD] request not published: {}", e);
                self.signal_error();
                KeyOutcome::Failed(e.fault_class())
            }
        }
    }

    /// One pass of the control loop. Returns the acknowledgements sent for
    /// remote commands handled in this pass.
    pub fn tick(&mut self) -> Vec<CommandAck> {
        self.liveness.feed();
        let mut acks = Vec::new();

        while let Some(msg) = self.pubsub.poll() {
            if msg.topic != self.topics.command {
                sink_debug!(&self.logger, "[KEYPAD] ignoring message on {}", msg.topic);
                continue;
            }
            if let Some(ack) = self.handle_command(&msg.payload) {
                acks.push(ack);
            }
        }

        let now = self.clock.now_ms();
        self.check_deadlines(now);
        self.check_lockout(now);
        {
            let mut tel = PubSubTelemetry::new(&mut self.pubsub, &self.topics);
            self.controller.tick(&mut tel);
        }
        self.check_memory(now);
        acks
    }

    fn handle_command(&mut self, payload: &[u8]) -> Option<CommandAck> {
        let cmd = match Command::parse(payload) {
            Ok(c) => c,
            Err(e) => {
                self.stats.dropped_commands += 1;
                sink_warn!(&self.logger, "[KEYPAD] dropped command: {}", e);
                return None;
            }
        };

        let mut tel = PubSubTelemetry::new(&mut self.pubsub, &self.topics);
        match &cmd {
            Command::Open { .. } => {
                self.waiting_for_reply = false;
                self.consecutive_failures = 0;
                self.stats.granted += 1;
                self.controller.grant(&mut tel);
                None
            }
            Command::Lock { reason } => {
                self.waiting_for_reply = false;
                self.consecutive_failures += 1;
                self.stats.denied += 1;
                sink_info!(
                    &self.logger,
                    "[KEYPAD] denied ({})",
                    reason.as_deref().unwrap_or("no reason")
                );
                self.controller
                    .deny(&mut tel, DoorStatus::Locked, Trigger::Denied, reason.as_deref());
                None
            }
            other => {
                self.stats.remote_commands += 1;
                sink_info!(&self.logger, "[KEYPAD] remote command {}", other.name());
                self.controller.handle_command(&mut tel, other)
            }
        }
    }

    fn check_deadlines(&mut self, now: u64) {
        let since_key = now.saturating_sub(self.last_key_ms);

        if !self.entry.is_empty() && since_key > self.config.entry_timeout.as_millis() as u64 {
            sink_info!(&self.logger, "[KEYPAD] entry timed out, clearing");
            self.entry.clear();
            self.signal_error();
        }

        if self.waiting_for_reply && since_key > self.config.reply_timeout.as_millis() as u64 {
            self.waiting_for_reply = false;
            self.stats.timeouts += 1;
            sink_warn!(&self.logger, "[KEYPAD] no response from gateway");
            let mut tel = PubSubTelemetry::new(&mut self.pubsub, &self.topics);
            self.controller
                .deny(&mut tel, DoorStatus::Error, Trigger::Timeout, Some("no_response"));
        }
    }

    fn check_lockout(&mut self, now: u64) {
        if let Some(until) = self.lockout_until {
            if now >= until {
                self.lockout_until = None;
                sink_info!(&self.logger, "[KEYPAD] lockout over");
            }
        }
        if self.consecutive_failures > self.config.failure_threshold() {
            self.lockout_until = Some(now + self.config.lockout.as_millis() as u64);
            self.consecutive_failures = 0;
            self.entry.clear();
            sink_warn!(
                &self.logger,
                "[KEYPAD] too many failures, entry locked for {} ms",
                self.config.lockout.as_millis()
            );
        }
    }

    fn check_memory(&mut self, now: u64) {
        let Some(monitor) = self.memory.as_mut() else {
            return;
        };
        let free = match monitor.sample(now) {
            MemoryVerdict::NotDue | MemoryVerdict::Healthy(_) => return,
            MemoryVerdict::Low(free) => {
                sink_warn!(&self.logger, "[KEYPAD] low memory: {} bytes free", free);
                free
            }
            MemoryVerdict::Critical(free) => {
                sink_error!(&self.logger, "[KEYPAD] memory critical: {} bytes free", free);
                free
            }
        };

        let report = StatusReport::new(
            self.config.device_id.clone(),
            DoorStatus::LowMemory,
            Trigger::MemoryMonitor,
            self.clock.unix_secs(),
        )
        .with_free_heap(free);
        let mut tel = PubSubTelemetry::new(&mut self.pubsub, &self.topics);
        self.controller.send_report(&mut tel, &report);

        if free < self.config.memory.critical_bytes {
            self.restart.restart(RestartReason::ResourceExhaustion);
        }
    }

    fn signal_error(&mut self) {
        self.controller.actuator_mut().indicate(Indication::Error);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::{
        clock::ManualClock,
        envelope::{EnvelopeVerifier, SigningKey, hash_secret, DigestLen},
        harness::{FixedMemoryProbe, RecordingActuator, RecordingPubSub, RecordingRestart},
        log::NoopLogSink,
    };

    type Keypad = KeypadLock<RecordingPubSub, RecordingActuator>;

    fn key() -> SigningKey {
        SigningKey::from_bytes([0x5A; 32])
    }

    fn keypad() -> (Keypad, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let k = KeypadLock::new(
            RecordingPubSub::default(),
            RecordingActuator::default(),
            KeypadConfig::with_key(key()),
            clock.clone(),
            Arc::new(NoopLogSink),
        );
        (k, clock)
    }

    fn enter(k: &mut Keypad, code: &str) -> KeyOutcome {
        let mut last = KeyOutcome::Buffered(0);
        for c in code.chars() {
            last = k.on_key(c);
        }
        last
    }

    #[test]
    fn complete_code_publishes_a_verifiable_request() {
        let (mut k, clock) = keypad();
        assert_eq!(k.on_key('1'), KeyOutcome::Buffered(1));
        assert_eq!(enter(&mut k, "23456"), KeyOutcome::Submitted);
        assert!(k.is_waiting_for_reply());
        assert_eq!(k.entered(), 0);

        let sent = k.pubsub().published();
        assert_eq!(sent[0].topic, "home/devices/passkey_01/request");
        assert!(!sent[0].retained);

        let mut verifier = EnvelopeVerifier::new(key(), clock.clone(), Arc::new(NoopLogSink));
        let body = verifier.verify_and_unwrap(&sent[0].payload).unwrap();
        assert_eq!(body.cmd, "unlock_request");
        assert_eq!(body.client_id, "passkey_01");
        assert_eq!(body.pw, hash_secret("123456", "passkey_01_salt_2025", DigestLen::Full));
    }

    #[test]
    fn second_code_while_waiting_is_dropped() {
        let (mut k, _) = keypad();
        enter(&mut k, "123456");
        assert_eq!(enter(&mut k, "654321"), KeyOutcome::Busy);
        assert_eq!(k.pubsub().published().len(), 1);
        assert_eq!(k.stats().ignored, 1);
    }

    #[test]
    fn open_command_grants_and_resets_failures() {
        let (mut k, _) = keypad();
        enter(&mut k, "123456");
        let cmd_topic = k.topics().command.clone();
        k.pubsub_mut().deliver(&cmd_topic, br#"{"cmd":"LOCK","reason":"invalid_password"}"#);
        k.tick();
        assert_eq!(k.consecutive_failures(), 1);
        assert!(!k.is_waiting_for_reply());

        enter(&mut k, "123457");
        k.pubsub_mut().deliver(&cmd_topic, br#"{"cmd":"OPEN"}"#);
        k.tick();
        assert_eq!(k.consecutive_failures(), 0);
        assert!(k.controller().is_holding());
    }

    #[test]
    fn incomplete_entry_is_cleared_after_inactivity() {
        let (mut k, clock) = keypad();
        enter(&mut k, "123");
        clock.advance(10_000);
        k.tick();
        assert_eq!(k.entered(), 3);
        clock.advance(1);
        k.tick();
        assert_eq!(k.entered(), 0);
    }

    #[test]
    fn unanswered_request_times_out() {
        let (mut k, clock) = keypad();
        enter(&mut k, "123456");
        clock.advance(15_001);
        k.tick();
        assert!(!k.is_waiting_for_reply());
        assert_eq!(k.stats().timeouts, 1);
        let last = k.pubsub().published().last().cloned().unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&last.payload).unwrap();
        assert_eq!(doc["state"], "error");
        assert_eq!(doc["method"], "timeout");
    }

    #[test]
    fn critical_memory_reports_then_restarts() {
        let (k, clock) = keypad();
        let probe = FixedMemoryProbe::new(3_500);
        let restart = Arc::new(RecordingRestart::default());
        let mut k = k
            .with_memory_probe(Box::new(probe))
            .with_restart(restart.clone());

        clock.advance(30_000);
        k.tick();
        let last = k.pubsub().published().last().cloned().unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&last.payload).unwrap();
        assert_eq!(doc["state"], "low_memory");
        assert_eq!(doc["free_heap"], 3_500);
        assert_eq!(restart.reasons(), vec![RestartReason::ResourceExhaustion]);
    }
}
