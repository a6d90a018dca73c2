use std::fmt;

use super::constants::TOPIC_ROOT;
use crate::fault::FaultClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    NotConnected,
    Rejected(String),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::NotConnected => write!(f, "broker not connected"),
            PublishError::Rejected(e) => write!(f, "publish rejected: {e}"),
        }
    }
}

impl std::error::Error for PublishError {}

impl PublishError {
    pub fn fault_class(&self) -> FaultClass {
        FaultClass::TransportFailure
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Reliable, encrypted publish/subscribe session, already connected and
/// subscribed to the device's command topic.
pub trait PubSub {
    fn publish(&mut self, topic: &str, payload: &[u8], retained: bool) -> Result<(), PublishError>;

    /// Next delivered message, if any. Never blocks.
    fn poll(&mut self) -> Option<InboundMessage>;

    fn is_connected(&self) -> bool;
}

impl<T: PubSub + ?Sized> PubSub for Box<T> {
    fn publish(&mut self, topic: &str, payload: &[u8], retained: bool) -> Result<(), PublishError> {
        (**self).publish(topic, payload, retained)
    }

    fn poll(&mut self) -> Option<InboundMessage> {
        (**self).poll()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

/// Per-device topic names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    pub request: String,
    pub command: String,
    pub status: String,
    pub remote_audit: String,
}

impl Topics {
    pub fn for_device(device_id: &str) -> Self {
        let base = format!("{TOPIC_ROOT}/{device_id}");
        Self {
            request: format!("{base}/request"),
            command: format!("{base}/command"),
            status: format!("{base}/status"),
            remote_audit: format!("{base}/status/remote"),
        }
    }
}
