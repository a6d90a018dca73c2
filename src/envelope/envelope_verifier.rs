use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use super::{
    constants::{DEFAULT_DRIFT_SECS, DEFAULT_NONCE_CACHE, NONCE_BOUND},
    envelope_body::{EnvelopeBody, EnvelopeWrapper},
    envelope_error::EnvelopeError,
    secret_hash::DigestLen,
    signing_key::SigningKey,
};
use crate::{clock::Clock, log::LogSink, sink_warn};

/// Receiving side of the envelope: signature, freshness and replay checks.
///
/// Checks run in the order the gateway applies them: wrapper shape, HMAC
/// over the exact received body string, body shape, timestamp window, then
/// the `(client_id, nonce)` cache. A pair is only remembered once the
/// envelope has passed every other check.
pub struct EnvelopeVerifier {
    key: SigningKey,
    drift_secs: u64,
    capacity: usize,
    seen: HashMap<(String, u32), u64>,
    order: VecDeque<(String, u32)>,
    clock: Arc<dyn Clock>,
    logger: Arc<dyn LogSink>,
}

impl EnvelopeVerifier {
    pub fn new(key: SigningKey, clock: Arc<dyn Clock>, logger: Arc<dyn LogSink>) -> Self {
        Self {
            key,
            drift_secs: DEFAULT_DRIFT_SECS,
            capacity: DEFAULT_NONCE_CACHE,
            seen: HashMap::new(),
            order: VecDeque::new(),
            clock,
            logger,
        }
    }

    pub fn with_drift_secs(mut self, secs: u64) -> Self {
        self.drift_secs = secs;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn cached_nonces(&self) -> usize {
        self.seen.len()
    }

    pub fn verify_and_unwrap(&mut self, wrapper: &[u8]) -> Result<EnvelopeBody, EnvelopeError> {
        let result = self.check(wrapper);
        if let Err(e) = &result {
            if e.fault_class().is_security_event() {
                sink_warn!(&self.logger, "[ENVELOPE] rejected: {}", e);
            }
        }
        result
    }

    fn check(&mut self, wrapper: &[u8]) -> Result<EnvelopeBody, EnvelopeError> {
        let wrapper: EnvelopeWrapper = serde_json::from_slice(wrapper)
            .map_err(|e| EnvelopeError::InvalidFormat(e.to_string()))?;

        if !self.key.verify_hex(wrapper.body.as_bytes(), &wrapper.hmac) {
            return Err(EnvelopeError::InvalidSignature);
        }

        let body: EnvelopeBody = serde_json::from_str(&wrapper.body)
            .map_err(|e| EnvelopeError::InvalidJson(e.to_string()))?;
        if DigestLen::from_hex_len(body.pw.len()).is_none()
            || !body.pw.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(EnvelopeError::InvalidFormat(format!(
                "pw must be 12 or 64 hex characters, got {}",
                body.pw.len()
            )));
        }
        if body.nonce >= NONCE_BOUND {
            return Err(EnvelopeError::InvalidFormat(format!(
                "nonce {} outside 0..{NONCE_BOUND}",
                body.nonce
            )));
        }

        let now = self.clock.unix_secs();
        if now.abs_diff(body.ts) > self.drift_secs {
            return Err(EnvelopeError::StaleTimestamp { ts: body.ts, now });
        }

        self.prune(now);
        let id = (body.client_id.clone(), body.nonce);
        if self.seen.contains_key(&id) {
            return Err(EnvelopeError::Replay {
                client_id: body.client_id,
                nonce: body.nonce,
            });
        }
        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.seen.insert(id.clone(), body.ts);
        self.order.push_back(id);

        Ok(body)
    }

    /// Forgets pairs whose timestamp is already outside the window; a
    /// replay of those fails the freshness check anyway.
    fn prune(&mut self, now: u64) {
        while let Some(front) = self.order.front() {
            let expired = self
                .seen
                .get(front)
                .is_none_or(|ts| now.saturating_sub(*ts) > self.drift_secs);
            if !expired {
                break;
            }
            if let Some(old) = self.order.pop_front() {
                self.seen.remove(&old);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::{
        clock::ManualClock,
        envelope::{EnvelopeSigner, sign_body},
        harness::CapturingLogSink,
        log::LogLevel,
    };

    const KEY: [u8; 32] = [0x11; 32];

    fn setup() -> (EnvelopeSigner, EnvelopeVerifier, Arc<ManualClock>, Arc<CapturingLogSink>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let logs = Arc::new(CapturingLogSink::default());
        let signer = EnvelopeSigner::new(SigningKey::from_bytes(KEY), "salt", "passkey_01", clock.clone());
        let verifier = EnvelopeVerifier::new(SigningKey::from_bytes(KEY), clock.clone(), logs.clone());
        (signer, verifier, clock, logs)
    }

    #[test]
    fn accepts_fresh_envelope_once() {
        let (mut signer, mut verifier, _, logs) = setup();
        let bytes = signer.build_request("unlock_request", "123456").unwrap();

        let body = verifier.verify_and_unwrap(&bytes).unwrap();
        assert_eq!(body.client_id, "passkey_01");

        let err = verifier.verify_and_unwrap(&bytes).unwrap_err();
        assert!(matches!(err, EnvelopeError::Replay { .. }));
        assert_eq!(err.reason(), "replay_attack");
        assert!(logs.contains(LogLevel::Warn, "already used"));
    }

    #[test]
    fn any_body_or_signature_byte_change_is_rejected() {
        let (mut signer, _, clock, _) = setup();
        let bytes = signer.build_request("unlock_request", "123456").unwrap();
        let wrapper: EnvelopeWrapper = serde_json::from_slice(&bytes).unwrap();

        for i in 0..wrapper.body.len() {
            let mut body = wrapper.body.clone().into_bytes();
            body[i] ^= 0x01;
            let Ok(body) = String::from_utf8(body) else { continue };
            let forged = serde_json::to_vec(&EnvelopeWrapper { body, hmac: wrapper.hmac.clone() }).unwrap();
            let mut v = EnvelopeVerifier::new(SigningKey::from_bytes(KEY), clock.clone(), Arc::new(CapturingLogSink::default()));
            assert!(v.verify_and_unwrap(&forged).is_err(), "body byte {i} accepted");
        }

        for i in 0..wrapper.hmac.len() {
            let original = wrapper.hmac.as_bytes()[i];
            let swapped = if original == b'0' { b'1' } else { b'0' };
            let mut replacements = vec![swapped];
            if original.is_ascii_lowercase() {
                replacements.push(original.to_ascii_uppercase());
            }
            for replacement in replacements {
                let mut hmac = wrapper.hmac.clone().into_bytes();
                hmac[i] = replacement;
                let forged = serde_json::to_vec(&EnvelopeWrapper {
                    body: wrapper.body.clone(),
                    hmac: String::from_utf8(hmac).unwrap(),
                })
                .unwrap();
                let mut v = EnvelopeVerifier::new(SigningKey::from_bytes(KEY), clock.clone(), Arc::new(CapturingLogSink::default()));
                assert_eq!(
                    v.verify_and_unwrap(&forged),
                    Err(EnvelopeError::InvalidSignature),
                    "hmac byte {i} -> {:?} accepted",
                    replacement as char
                );
            }
        }
    }

    #[test]
    fn wrong_key_is_a_signature_failure() {
        let (mut signer, _, clock, _) = setup();
        let bytes = signer.build_request("unlock_request", "123456").unwrap();
        let mut v = EnvelopeVerifier::new(SigningKey::from_bytes([0x22; 32]), clock, Arc::new(CapturingLogSink::default()));
        let err = v.verify_and_unwrap(&bytes).unwrap_err();
        assert_eq!(err, EnvelopeError::InvalidSignature);
        assert_eq!(err.fault_class(), crate::fault::FaultClass::Unauthenticated);
    }

    #[test]
    fn drift_window_is_inclusive() {
        let (mut signer, mut verifier, clock, _) = setup();
        let bytes = signer.build_request("unlock_request", "123456").unwrap();

        clock.set_unix_base(1_700_000_300);
        let late = signer.build_request("unlock_request", "123456").unwrap();
        assert!(verifier.verify_and_unwrap(&bytes).is_ok());

        clock.set_unix_base(1_700_000_301);
        assert!(matches!(
            verifier.verify_and_unwrap(&signer_body_at(1_700_000_000)),
            Err(EnvelopeError::StaleTimestamp { .. })
        ));
        assert!(verifier.verify_and_unwrap(&late).is_ok());
    }

    fn signer_body_at(ts: u64) -> Vec<u8> {
        let body = EnvelopeBody {
            cmd: "unlock_request".into(),
            client_id: "passkey_01".into(),
            pw: "a".repeat(64),
            ts,
            nonce: 1,
        };
        serde_json::to_vec(&sign_body(&body, &SigningKey::from_bytes(KEY)).unwrap()).unwrap()
    }

    #[test]
    fn signed_garbage_and_bad_digest_are_format_errors() {
        let (_, mut verifier, _, _) = setup();
        let key = SigningKey::from_bytes(KEY);

        let hmac = key.sign_hex(b"not json").unwrap();
        let forged = serde_json::to_vec(&EnvelopeWrapper { body: "not json".into(), hmac }).unwrap();
        assert!(matches!(verifier.verify_and_unwrap(&forged), Err(EnvelopeError::InvalidJson(_))));

        assert!(matches!(verifier.verify_and_unwrap(b"{}"), Err(EnvelopeError::InvalidFormat(_))));

        let body = EnvelopeBody {
            cmd: "unlock_request".into(),
            client_id: "passkey_01".into(),
            pw: "123456".into(),
            ts: 1_700_000_000,
            nonce: 5,
        };
        let raw = serde_json::to_vec(&sign_body(&body, &key).unwrap()).unwrap();
        assert!(matches!(verifier.verify_and_unwrap(&raw), Err(EnvelopeError::InvalidFormat(_))));
    }

    #[test]
    fn nonce_outside_31_bits_is_a_format_error() {
        let (_, mut verifier, _, _) = setup();
        let key = SigningKey::from_bytes(KEY);
        let body = |nonce| EnvelopeBody {
            cmd: "unlock_request".into(),
            client_id: "passkey_01".into(),
            pw: "a".repeat(64),
            ts: 1_700_000_000,
            nonce,
        };

        for nonce in [NONCE_BOUND, u32::MAX] {
            let raw = serde_json::to_vec(&sign_body(&body(nonce), &key).unwrap()).unwrap();
            assert!(matches!(verifier.verify_and_unwrap(&raw), Err(EnvelopeError::InvalidFormat(_))));
        }
        assert_eq!(verifier.cached_nonces(), 0);

        let raw = serde_json::to_vec(&sign_body(&body(NONCE_BOUND - 1), &key).unwrap()).unwrap();
        assert_eq!(verifier.verify_and_unwrap(&raw).unwrap().nonce, NONCE_BOUND - 1);
    }

    #[test]
    fn cache_is_bounded_and_pruned_by_age() {
        let (mut signer, verifier, clock, _) = setup();
        let mut verifier = verifier.with_capacity(3);
        for _ in 0..5 {
            let bytes = signer.build_request("unlock_request", "123456").unwrap();
            verifier.verify_and_unwrap(&bytes).unwrap();
        }
        assert_eq!(verifier.cached_nonces(), 3);

        clock.set_unix_base(1_700_001_000);
        let bytes = signer.build_request("unlock_request", "123456").unwrap();
        verifier.verify_and_unwrap(&bytes).unwrap();
        assert_eq!(verifier.cached_nonces(), 1);
    }
}
