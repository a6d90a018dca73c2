use std::fmt;

use crate::fault::FaultClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Wrapper is not `{"body", "hmac"}` or a field has the wrong shape.
    InvalidFormat(String),
    InvalidSignature,
    /// Signature matched but the body is not a valid request.
    InvalidJson(String),
    StaleTimestamp { ts: u64, now: u64 },
    Replay { client_id: String, nonce: u32 },
    BadKey(String),
    Serialize(String),
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EnvelopeError::*;
        match self {
            InvalidFormat(why) => write!(f, "malformed envelope: {why}"),
            InvalidSignature => write!(f, "envelope signature mismatch"),
            InvalidJson(why) => write!(f, "envelope body unreadable: {why}"),
            StaleTimestamp { ts, now } => {
                write!(f, "envelope timestamp {ts} outside window (now {now})")
            }
            Replay { client_id, nonce } => {
                write!(f, "nonce {nonce} from {client_id} already used")
            }
            BadKey(why) => write!(f, "invalid signing key: {why}"),
            Serialize(why) => write!(f, "cannot serialize envelope: {why}"),
        }
    }
}

impl std::error::Error for EnvelopeError {}

impl EnvelopeError {
    pub fn fault_class(&self) -> FaultClass {
        use EnvelopeError::*;
        match self {
            InvalidSignature | StaleTimestamp { .. } | Replay { .. } => FaultClass::Unauthenticated,
            InvalidFormat(_) | InvalidJson(_) | BadKey(_) | Serialize(_) => FaultClass::Malformed,
        }
    }

    /// Short reason code the gateway puts into its `LOCK` reply.
    pub fn reason(&self) -> &'static str {
        use EnvelopeError::*;
        match self {
            InvalidFormat(_) => "invalid_format",
            InvalidSignature => "invalid_signature",
            InvalidJson(_) => "invalid_json",
            StaleTimestamp { .. } => "invalid_timestamp",
            Replay { .. } => "replay_attack",
            BadKey(_) | Serialize(_) => "internal_error",
        }
    }
}

impl From<serde_json::Error> for EnvelopeError {
    fn from(e: serde_json::Error) -> Self {
        EnvelopeError::Serialize(e.to_string())
    }
}
