use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{constants::KEY_LEN, envelope_error::EnvelopeError};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 tag as lowercase hex.
const TAG_HEX_LEN: usize = 64;

/// Pre-shared 256-bit HMAC key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey([u8; KEY_LEN]);

impl SigningKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(text: &str) -> Result<Self, EnvelopeError> {
        let raw = hex::decode(text.trim()).map_err(|e| EnvelopeError::BadKey(e.to_string()))?;
        let bytes: [u8; KEY_LEN] = raw
            .try_into()
            .map_err(|v: Vec<u8>| EnvelopeError::BadKey(format!("{} bytes, need {KEY_LEN}", v.len())))?;
        Ok(Self(bytes))
    }

    /// Lowercase hex HMAC-SHA256 of `data`.
    pub fn sign_hex(&self, data: &[u8]) -> Result<String, EnvelopeError> {
        Ok(hex::encode(self.mac(data)?.finalize().into_bytes()))
    }

    /// Constant-time check of a hex tag against `data`.
    ///
    /// Only the exact form `sign_hex` produces is accepted: 64 lowercase hex
    /// characters. A case-flipped tag decodes to the same bytes but is a
    /// different signature string.
    pub fn verify_hex(&self, data: &[u8], tag_hex: &str) -> bool {
        if tag_hex.len() != TAG_HEX_LEN
            || !tag_hex
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return false;
        }
        let Ok(tag) = hex::decode(tag_hex) else {
            return false;
        };
        match self.mac(data) {
            Ok(mac) => mac.verify_slice(&tag).is_ok(),
            Err(_) => false,
        }
    }

    fn mac(&self, data: &[u8]) -> Result<HmacSha256, EnvelopeError> {
        let mut mac = HmacSha256::new_from_slice(&self.0)
            .map_err(|_| EnvelopeError::BadKey("rejected by HMAC".into()))?;
        mac.update(data);
        Ok(mac)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}
