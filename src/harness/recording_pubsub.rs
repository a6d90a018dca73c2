use std::collections::VecDeque;

use crate::endpoint::{InboundMessage, PubSub, PublishError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub topic: String,
    pub payload: Vec<u8>,
    pub retained: bool,
}

/// In-memory broker session. Starts connected.
#[derive(Debug)]
pub struct RecordingPubSub {
    published: Vec<Published>,
    inbound: VecDeque<InboundMessage>,
    connected: bool,
}

impl Default for RecordingPubSub {
    fn default() -> Self {
        Self {
            published: Vec::new(),
            inbound: VecDeque::new(),
            connected: true,
        }
    }
}

impl RecordingPubSub {
    pub fn published(&self) -> &[Published] {
        &self.published
    }

    pub fn published_on<'a>(&'a self, topic: &'a str) -> impl Iterator<Item = &'a Published> + 'a {
        self.published.iter().filter(move |p| p.topic == topic)
    }

    /// Queues a message as if the broker had delivered it.
    pub fn deliver(&mut self, topic: &str, payload: &[u8]) {
        self.inbound.push_back(InboundMessage {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        });
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

impl PubSub for RecordingPubSub {
    fn publish(&mut self, topic: &str, payload: &[u8], retained: bool) -> Result<(), PublishError> {
        if !self.connected {
            return Err(PublishError::NotConnected);
        }
        self.published.push(Published {
            topic: topic.to_string(),
            payload: payload.to_vec(),
            retained,
        });
        Ok(())
    }

    fn poll(&mut self) -> Option<InboundMessage> {
        self.inbound.pop_front()
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
