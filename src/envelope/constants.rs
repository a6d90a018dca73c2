pub const KEY_LEN: usize = 32;
/// Hex length of a full SHA-256 / HMAC-SHA256 digest.
pub const FULL_DIGEST_HEX_LEN: usize = 64;
/// Truncated password digest accepted by older gateways.
pub const SHORT_DIGEST_HEX_LEN: usize = 12;
/// Nonces are drawn from `0..NONCE_BOUND` (31 bits).
pub const NONCE_BOUND: u32 = 0x7FFF_FFFF;
/// Accepted clock skew between endpoint and verifier, either direction.
pub const DEFAULT_DRIFT_SECS: u64 = 300;
pub const DEFAULT_NONCE_CACHE: usize = 4_096;

pub const UNLOCK_REQUEST: &str = "unlock_request";
