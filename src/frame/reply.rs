use std::fmt;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::constants::{
    RADIO_CHANNEL, REPLY_HEADER, REPLY_HEADER_LEN, STATUS_DENY, STATUS_GRANT,
};
use crate::fault::FaultClass;

/// Status text carried by a gateway reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyStatus {
    Grant,
    Deny,
    /// Anything else, e.g. a remote command or an acknowledgement.
    App(String),
}

impl ReplyStatus {
    pub fn parse(text: &str) -> Self {
        match text {
            STATUS_GRANT => ReplyStatus::Grant,
            STATUS_DENY => ReplyStatus::Deny,
            other => ReplyStatus::App(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReplyStatus::Grant => STATUS_GRANT,
            ReplyStatus::Deny => STATUS_DENY,
            ReplyStatus::App(s) => s,
        }
    }
}

impl fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyError {
    TooShort(usize),
    BadHeader,
    WrongChannel(u8),
    LengthMismatch { declared: usize, actual: usize },
    NotUtf8,
    StatusTooLong(usize),
}

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ReplyError::*;
        match self {
            TooShort(n) => write!(f, "reply too short: {n} bytes"),
            BadHeader => write!(f, "bad reply header"),
            WrongChannel(c) => write!(f, "reply on channel 0x{c:02X}"),
            LengthMismatch { declared, actual } => {
                write!(f, "declared status length {declared}, {actual} bytes present")
            }
            NotUtf8 => write!(f, "reply status is not UTF-8"),
            StatusTooLong(n) => write!(f, "status of {n} bytes does not fit a reply"),
        }
    }
}

impl std::error::Error for ReplyError {}

impl ReplyError {
    pub fn fault_class(&self) -> FaultClass {
        FaultClass::Malformed
    }
}

/// Gateway to endpoint packet: `[C0 00 00][addr:2][channel][len][status]`.
///
/// The address word is big-endian, as the gateway writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayReply {
    pub address: u16,
    pub channel: u8,
    pub status: ReplyStatus,
}

impl GatewayReply {
    pub fn new(address: u16, status: ReplyStatus) -> Self {
        Self {
            address,
            channel: RADIO_CHANNEL,
            status,
        }
    }

    pub fn decode(buf: &[u8]) -> Result<Self, ReplyError> {
        if buf.len() < REPLY_HEADER_LEN {
            return Err(ReplyError::TooShort(buf.len()));
        }
        if buf[..3] != REPLY_HEADER {
            return Err(ReplyError::BadHeader);
        }
        let channel = buf[5];
        if channel != RADIO_CHANNEL {
            return Err(ReplyError::WrongChannel(channel));
        }
        let declared = buf[6] as usize;
        let actual = buf.len() - REPLY_HEADER_LEN;
        if declared != actual {
            return Err(ReplyError::LengthMismatch { declared, actual });
        }
        let text = std::str::from_utf8(&buf[REPLY_HEADER_LEN..]).map_err(|_| ReplyError::NotUtf8)?;

        Ok(Self {
            address: BigEndian::read_u16(&buf[3..5]),
            channel,
            status: ReplyStatus::parse(text),
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, ReplyError> {
        let status = self.status.as_str().as_bytes();
        if status.len() > u8::MAX as usize {
            return Err(ReplyError::StatusTooLong(status.len()));
        }
        let mut out = Vec::with_capacity(REPLY_HEADER_LEN + status.len());
        out.extend_from_slice(&REPLY_HEADER);
        let _ = out.write_u16::<BigEndian>(self.address);
        out.push(self.channel);
        out.push(status.len() as u8);
        out.extend_from_slice(status);
        Ok(out)
    }
}
