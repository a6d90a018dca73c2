use sha2::{Digest, Sha256};

use super::constants::{FULL_DIGEST_HEX_LEN, SHORT_DIGEST_HEX_LEN};

/// Length of the password digest carried in `pw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestLen {
    #[default]
    Full,
    /// First 12 hex characters, for gateways that store short digests.
    Short,
}

impl DigestLen {
    pub fn hex_len(self) -> usize {
        match self {
            DigestLen::Full => FULL_DIGEST_HEX_LEN,
            DigestLen::Short => SHORT_DIGEST_HEX_LEN,
        }
    }

    pub fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            FULL_DIGEST_HEX_LEN => Some(DigestLen::Full),
            SHORT_DIGEST_HEX_LEN => Some(DigestLen::Short),
            _ => None,
        }
    }
}

/// Lowercase hex of `SHA-256(salt || secret)`, truncated to `len`.
pub fn hash_secret(secret: &str, salt: &str, len: DigestLen) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(secret.as_bytes());
    let mut hex = hex::encode(hasher.finalize());
    hex.truncate(len.hex_len());
    hex
}
