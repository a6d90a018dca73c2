use crate::frame::MsgType;

/// What a caller wants sent. The transport adds device type, sequence and
/// timestamp when it builds the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundFrame {
    pub msg_type: MsgType,
    pub flags: u8,
    pub payload: Vec<u8>,
}

impl OutboundFrame {
    pub fn new(msg_type: MsgType, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            msg_type,
            flags: 0,
            payload: payload.into(),
        }
    }
}
