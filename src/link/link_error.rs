use std::fmt;

use crate::{
    fault::FaultClass,
    frame::{FrameError, ReplyError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The frame could not be built; nothing was sent.
    Encode(FrameError),
    /// The reply could not be built; nothing was sent.
    EncodeReply(ReplyError),
    /// Every attempt to hand the packet to the modem failed.
    TransmitFailed { attempts: u32, last_error: String },
    /// No acceptable reply before the deadline.
    Timeout { waited_ms: u64 },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use LinkError::*;
        match self {
            Encode(e) => write!(f, "cannot encode frame: {e}"),
            EncodeReply(e) => write!(f, "cannot encode reply: {e}"),
            TransmitFailed {
                attempts,
                last_error,
            } => write!(f, "transmit failed after {attempts} attempts: {last_error}"),
            Timeout { waited_ms } => write!(f, "no reply within {waited_ms} ms"),
        }
    }
}

impl std::error::Error for LinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinkError::Encode(e) => Some(e),
            LinkError::EncodeReply(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FrameError> for LinkError {
    fn from(e: FrameError) -> Self {
        LinkError::Encode(e)
    }
}

impl From<ReplyError> for LinkError {
    fn from(e: ReplyError) -> Self {
        LinkError::EncodeReply(e)
    }
}

impl LinkError {
    pub fn fault_class(&self) -> FaultClass {
        match self {
            LinkError::Encode(_) | LinkError::EncodeReply(_) => FaultClass::Malformed,
            LinkError::TransmitFailed { .. } => FaultClass::TransportFailure,
            LinkError::Timeout { .. } => FaultClass::Timeout,
        }
    }
}
