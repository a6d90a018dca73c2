use serde::{Deserialize, Serialize};

/// Signed request body. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeBody {
    pub cmd: String,
    pub client_id: String,
    /// Salted digest of the user's secret, hex.
    pub pw: String,
    /// Wall-clock seconds.
    pub ts: u64,
    pub nonce: u32,
}

/// What crosses the wire: the body as a JSON string plus its HMAC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeWrapper {
    pub body: String,
    pub hmac: String,
}
