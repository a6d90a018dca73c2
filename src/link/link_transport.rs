use std::{sync::Arc, time::Duration};

use super::{
    byte_channel::ByteChannel,
    constants::{BACKOFF_STEP, REPLY_POLL_INTERVAL},
    link_error::LinkError,
    link_state::LinkState,
    link_stats::LinkStats,
    outbound_frame::OutboundFrame,
    reply_schema::ReplySchema,
    retry_policy::RetryPolicy,
};
use crate::{
    clock::Clock,
    frame::{DeviceType, Frame, GatewayReply},
    log::LogSink,
    sink_debug, sink_info, sink_trace, sink_warn,
    supervisor::Liveness,
};

/// Sends frames over a [`ByteChannel`] and waits for correlated replies.
///
/// Owns the sender's sequence counter. Every wait is a polling loop on the
/// injected clock that feeds the liveness supervisor each iteration.
pub struct LinkTransport<C: ByteChannel> {
    channel: C,
    device_type: DeviceType,
    sequence: u16,
    state: LinkState,
    stats: LinkStats,
    clock: Arc<dyn Clock>,
    liveness: Arc<dyn Liveness>,
    logger: Arc<dyn LogSink>,
}

impl<C: ByteChannel> LinkTransport<C> {
    pub fn new(
        channel: C,
        device_type: DeviceType,
        clock: Arc<dyn Clock>,
        liveness: Arc<dyn Liveness>,
        logger: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            channel,
            device_type,
            sequence: 0,
            state: LinkState::Idle,
            stats: LinkStats::default(),
            clock,
            liveness,
            logger,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Sequence number the next frame will carry.
    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Encodes and transmits `out`, retrying transmit failures with
    /// exponential backoff. Returns the sequence number that went out.
    ///
    /// An encoding failure is final and is not retried.
    pub fn send_with_retry(
        &mut self,
        out: &OutboundFrame,
        policy: &RetryPolicy,
    ) -> Result<u16, LinkError> {
        self.state = LinkState::Sending;
        let mut last_error = String::new();

        for attempt in 0..policy.max_attempts {
            self.liveness.feed();
            let frame = match Frame::new(
                out.msg_type,
                self.device_type,
                out.flags,
                self.sequence,
                self.clock.uptime_secs(),
                out.payload.as_slice(),
            )
            .and_then(|f| f.encode())
            {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.state = LinkState::Failed;
                    return Err(e.into());
                }
            };

            match self.channel.transmit(&frame) {
                Ok(()) => {
                    let sent = self.sequence;
                    self.sequence = self.sequence.wrapping_add(1);
                    self.stats.frames_sent += 1;
                    sink_trace!(
                        &self.logger,
                        "[LINK] TX {} seq={} ({} bytes)",
                        out.msg_type,
                        sent,
                        frame.len()
                    );
                    return Ok(sent);
                }
                Err(e) => {
                    self.stats.send_failures += 1;
                    last_error = e.to_string();
                    sink_debug!(
                        &self.logger,
                        "[LINK] transmit attempt {}/{} failed: {}",
                        attempt + 1,
                        policy.max_attempts,
                        e
                    );
                    if attempt + 1 < policy.max_attempts {
                        self.pause(policy.delay_for(attempt));
                    }
                }
            }
        }

        self.state = LinkState::Failed;
        sink_warn!(
            &self.logger,
            "[LINK] giving up after {} attempts: {}",
            policy.max_attempts,
            last_error
        );
        Err(LinkError::TransmitFailed {
            attempts: policy.max_attempts,
            last_error,
        })
    }

    /// Polls for a reply the schema accepts until `timeout` elapses.
    ///
    /// Malformed packets and replies outside the schema are dropped and the
    /// wait goes on.
    pub fn await_reply(
        &mut self,
        schema: &ReplySchema,
        timeout: Duration,
    ) -> Result<GatewayReply, LinkError> {
        self.state = LinkState::AwaitingReply;
        let start = self.clock.now_ms();
        let timeout_ms = timeout.as_millis() as u64;

        loop {
            self.liveness.feed();
            if let Some(reply) = self.receive_matching(schema) {
                self.state = LinkState::Success;
                self.stats.replies_accepted += 1;
                return Ok(reply);
            }

            let waited = self.clock.now_ms().saturating_sub(start);
            if waited >= timeout_ms {
                self.state = LinkState::Failed;
                self.stats.timeouts += 1;
                sink_info!(&self.logger, "[LINK] no reply within {} ms", waited);
                return Err(LinkError::Timeout { waited_ms: waited });
            }
            self.clock.sleep(REPLY_POLL_INTERVAL);
        }
    }

    /// `send_with_retry` followed by `await_reply`.
    pub fn exchange(
        &mut self,
        out: &OutboundFrame,
        policy: &RetryPolicy,
        schema: &ReplySchema,
        timeout: Duration,
    ) -> Result<GatewayReply, LinkError> {
        self.send_with_retry(out, policy)?;
        self.await_reply(schema, timeout)
    }

    /// One attempt, no retry. Used for best-effort status frames.
    pub fn send_once(&mut self, out: &OutboundFrame) -> Result<u16, LinkError> {
        self.send_with_retry(out, &RetryPolicy::new(1, Duration::ZERO))
    }

    /// Transmits a reply-layout packet once, e.g. a command acknowledgement.
    pub fn send_reply(&mut self, reply: &GatewayReply) -> Result<(), LinkError> {
        let bytes = reply.encode()?;
        self.channel.transmit(&bytes).map_err(|e| {
            self.stats.send_failures += 1;
            LinkError::TransmitFailed {
                attempts: 1,
                last_error: e.to_string(),
            }
        })?;
        self.stats.frames_sent += 1;
        Ok(())
    }

    /// Non-blocking check for one unsolicited packet the schema accepts.
    pub fn poll_inbound(&mut self, schema: &ReplySchema) -> Option<GatewayReply> {
        self.liveness.feed();
        let reply = self.receive_matching(schema)?;
        self.stats.replies_accepted += 1;
        Some(reply)
    }

    /// Clears a terminal state so the slot is free for the next request.
    pub fn reset(&mut self) {
        self.state = LinkState::Idle;
    }

    fn receive_matching(&mut self, schema: &ReplySchema) -> Option<GatewayReply> {
        let packet = match self.channel.receive() {
            Ok(Some(p)) => p,
            Ok(None) => return None,
            Err(e) => {
                sink_debug!(&self.logger, "[LINK] receive error: {}", e);
                return None;
            }
        };

        match GatewayReply::decode(&packet) {
            Ok(reply) if schema.accepts(&reply.status) => {
                sink_trace!(&self.logger, "[LINK] RX {}", reply.status);
                Some(reply)
            }
            Ok(reply) => {
                self.stats.replies_discarded += 1;
                sink_debug!(&self.logger, "[LINK] unexpected status {:?} dropped", reply.status.as_str());
                None
            }
            Err(e) => {
                self.stats.replies_discarded += 1;
                sink_debug!(&self.logger, "[LINK] malformed reply dropped: {}", e);
                None
            }
        }
    }

    fn pause(&self, total: Duration) {
        let mut left = total;
        while !left.is_zero() {
            self.liveness.feed();
            let step = left.min(BACKOFF_STEP);
            self.clock.sleep(step);
            left -= step;
        }
    }
}
