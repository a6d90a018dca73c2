use std::sync::Arc;

use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

use super::{
    constants::NONCE_BOUND,
    envelope_body::{EnvelopeBody, EnvelopeWrapper},
    envelope_error::EnvelopeError,
    secret_hash::{DigestLen, hash_secret},
    signing_key::SigningKey,
};
use crate::clock::Clock;

/// Builds signed request envelopes for one client.
pub struct EnvelopeSigner {
    key: SigningKey,
    salt: String,
    client_id: String,
    digest_len: DigestLen,
    clock: Arc<dyn Clock>,
    rng: Box<dyn RngCore + Send>,
}

impl EnvelopeSigner {
    pub fn new(
        key: SigningKey,
        salt: impl Into<String>,
        client_id: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            key,
            salt: salt.into(),
            client_id: client_id.into(),
            digest_len: DigestLen::Full,
            clock,
            rng: Box::new(StdRng::from_entropy()),
        }
    }

    pub fn with_digest_len(mut self, len: DigestLen) -> Self {
        self.digest_len = len;
        self
    }

    /// Replaces the nonce source, e.g. with a seeded generator.
    pub fn with_rng(mut self, rng: Box<dyn RngCore + Send>) -> Self {
        self.rng = rng;
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Hashes `secret`, stamps a fresh nonce and the current wall-clock
    /// time, signs the serialized body and returns the wrapper bytes.
    pub fn build_request(&mut self, command: &str, secret: &str) -> Result<Vec<u8>, EnvelopeError> {
        let body = EnvelopeBody {
            cmd: command.to_string(),
            client_id: self.client_id.clone(),
            pw: hash_secret(secret, &self.salt, self.digest_len),
            ts: self.clock.unix_secs(),
            nonce: self.rng.gen_range(0..NONCE_BOUND),
        };
        let wrapper = sign_body(&body, &self.key)?;
        Ok(serde_json::to_vec(&wrapper)?)
    }
}

/// Serializes `body` and attaches its HMAC.
pub fn sign_body(body: &EnvelopeBody, key: &SigningKey) -> Result<EnvelopeWrapper, EnvelopeError> {
    let body = serde_json::to_string(body)?;
    let hmac = key.sign_hex(body.as_bytes())?;
    Ok(EnvelopeWrapper { body, hmac })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::clock::ManualClock;

    fn signer() -> EnvelopeSigner {
        EnvelopeSigner::new(
            SigningKey::from_bytes([0x5A; 32]),
            "passkey_01_salt_2025",
            "passkey_01",
            Arc::new(ManualClock::new(1_700_000_000)),
        )
        .with_rng(Box::new(StdRng::seed_from_u64(9)))
    }

    #[test]
    fn wrapper_carries_body_and_matching_hmac() {
        let mut s = signer();
        let bytes = s.build_request("unlock_request", "123456").unwrap();
        let wrapper: EnvelopeWrapper = serde_json::from_slice(&bytes).unwrap();
        let body: EnvelopeBody = serde_json::from_str(&wrapper.body).unwrap();

        assert_eq!(body.cmd, "unlock_request");
        assert_eq!(body.client_id, "passkey_01");
        assert_eq!(body.ts, 1_700_000_000);
        assert!(body.nonce < NONCE_BOUND);
        assert_eq!(body.pw, hash_secret("123456", "passkey_01_salt_2025", DigestLen::Full));
        assert_ne!(body.pw, "123456");
        assert_eq!(wrapper.hmac.len(), 64);
        assert!(SigningKey::from_bytes([0x5A; 32]).verify_hex(wrapper.body.as_bytes(), &wrapper.hmac));
    }

    #[test]
    fn successive_requests_differ() {
        let mut s = signer();
        let a = s.build_request("unlock_request", "123456").unwrap();
        let b = s.build_request("unlock_request", "123456").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn short_digest_option() {
        let mut s = signer().with_digest_len(DigestLen::Short);
        let bytes = s.build_request("unlock_request", "123456").unwrap();
        let wrapper: EnvelopeWrapper = serde_json::from_slice(&bytes).unwrap();
        let body: EnvelopeBody = serde_json::from_str(&wrapper.body).unwrap();
        assert_eq!(body.pw.len(), 12);
    }
}
