use super::pubsub::{PubSub, Topics};
use crate::actuator::{CommandAck, RemoteAuditRecord, StatusReport, Telemetry, TelemetryError};

/// Telemetry over the publish/subscribe session as JSON documents.
///
/// Status reports are retained so a dashboard sees the last state on
/// subscribe; acknowledgements and audit records are not.
pub struct PubSubTelemetry<'a, P: PubSub> {
    pubsub: &'a mut P,
    topics: &'a Topics,
}

impl<'a, P: PubSub> PubSubTelemetry<'a, P> {
    pub fn new(pubsub: &'a mut P, topics: &'a Topics) -> Self {
        Self { pubsub, topics }
    }

    fn send<T: serde::Serialize>(&mut self, topic: &str, doc: &T, retained: bool) -> Result<(), TelemetryError> {
        if !self.pubsub.is_connected() {
            return Err(TelemetryError::Disconnected);
        }
        let payload = serde_json::to_vec(doc).map_err(|e| TelemetryError::Encode(e.to_string()))?;
        self.pubsub
            .publish(topic, &payload, retained)
            .map_err(|e| TelemetryError::Publish(e.to_string()))
    }
}

impl<P: PubSub> Telemetry for PubSubTelemetry<'_, P> {
    fn report(&mut self, report: &StatusReport) -> Result<(), TelemetryError> {
        let topics = self.topics;
        self.send(&topics.status, report, true)
    }

    fn acknowledge(&mut self, ack: &CommandAck) -> Result<(), TelemetryError> {
        let topics = self.topics;
        self.send(&topics.status, ack, false)
    }

    fn audit(&mut self, record: &RemoteAuditRecord) -> Result<(), TelemetryError> {
        let topics = self.topics;
        self.send(&topics.remote_audit, record, false)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::{
        actuator::{DoorStatus, Trigger},
        harness::RecordingPubSub,
    };

    #[test]
    fn routes_documents_to_their_topics() {
        let topics = Topics::for_device("passkey_01");
        let mut bus = RecordingPubSub::default();
        let mut tel = PubSubTelemetry::new(&mut bus, &topics);

        tel.report(&StatusReport::new("passkey_01", DoorStatus::Locked, Trigger::AutoLock, 7))
            .unwrap();
        tel.acknowledge(&CommandAck {
            device_id: "passkey_01".into(),
            command_id: "c1".into(),
            success: true,
            status: "locked".into(),
            timestamp: 7,
        })
        .unwrap();

        let sent = bus.published();
        assert_eq!(sent[0].topic, topics.status);
        assert!(sent[0].retained);
        assert!(!sent[1].retained);
        let ack: serde_json::Value = serde_json::from_slice(&sent[1].payload).unwrap();
        assert_eq!(ack["status"], "locked");
    }

    #[test]
    fn disconnected_session_reports_failure() {
        let topics = Topics::for_device("passkey_01");
        let mut bus = RecordingPubSub::default();
        bus.set_connected(false);
        let mut tel = PubSubTelemetry::new(&mut bus, &topics);
        let err = tel
            .report(&StatusReport::new("passkey_01", DoorStatus::Online, Trigger::Startup, 0))
            .unwrap_err();
        assert_eq!(err, TelemetryError::Disconnected);
    }
}
