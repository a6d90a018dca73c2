#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{collections::HashSet, sync::Arc};

use gatelink::{
    clock::ManualClock,
    envelope::{EnvelopeBody, EnvelopeError, EnvelopeSigner, EnvelopeVerifier, EnvelopeWrapper, SigningKey},
    harness::CapturingLogSink,
    log::LogLevel,
};

const KEY: [u8; 32] = [
    0x5A, 0x5A, 0x2B, 0x3F, 0x87, 0xDA, 0x01, 0xF9, 0xDE, 0xE1, 0x83, 0xAD, 0x84, 0x54, 0xB5, 0x34,
    0x77, 0x68, 0x47, 0x8C, 0xE8, 0xFD, 0x73, 0x1F, 0xBD, 0xE1, 0x3C, 0x42, 0x79, 0xB8, 0xFE, 0xA4,
];

fn signer(clock: &Arc<ManualClock>) -> EnvelopeSigner {
    EnvelopeSigner::new(
        SigningKey::from_bytes(KEY),
        "passkey_01_salt_2025",
        "passkey_01",
        clock.clone(),
    )
}

fn reencode(w: &EnvelopeWrapper) -> Vec<u8> {
    serde_json::to_vec(w).unwrap()
}

#[test]
fn every_single_byte_mutation_is_rejected() {
    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let logs = Arc::new(CapturingLogSink::default());
    let mut verifier = EnvelopeVerifier::new(SigningKey::from_bytes(KEY), clock.clone(), logs.clone());

    let wire = signer(&clock).build_request("unlock_request", "123456").unwrap();
    let wrapper: EnvelopeWrapper = serde_json::from_slice(&wire).unwrap();

    for i in 0..wrapper.body.len() {
        let mut bytes = wrapper.body.clone().into_bytes();
        bytes[i] = if bytes[i] == b'x' { b'y' } else { b'x' };
        let tampered = EnvelopeWrapper {
            body: String::from_utf8(bytes).unwrap(),
            hmac: wrapper.hmac.clone(),
        };
        assert!(
            verifier.verify_and_unwrap(&reencode(&tampered)).is_err(),
            "body byte {i} mutation accepted"
        );
    }

    for i in 0..wrapper.hmac.len() {
        let original = wrapper.hmac.as_bytes()[i];
        let mut replacements = vec![if original == b'0' { b'1' } else { b'0' }];
        if original.is_ascii_lowercase() {
            replacements.push(original.to_ascii_uppercase());
        }
        for replacement in replacements {
            let mut hmac = wrapper.hmac.clone().into_bytes();
            hmac[i] = replacement;
            let tampered = EnvelopeWrapper {
                body: wrapper.body.clone(),
                hmac: String::from_utf8(hmac).unwrap(),
            };
            assert_eq!(
                verifier.verify_and_unwrap(&reencode(&tampered)),
                Err(EnvelopeError::InvalidSignature),
                "hmac byte {i} -> {:?} accepted",
                replacement as char
            );
        }
    }

    let shouting = EnvelopeWrapper {
        body: wrapper.body.clone(),
        hmac: wrapper.hmac.to_ascii_uppercase(),
    };
    assert_eq!(
        verifier.verify_and_unwrap(&reencode(&shouting)),
        Err(EnvelopeError::InvalidSignature)
    );
    assert!(logs.contains(LogLevel::Warn, "[ENVELOPE] rejected"));

    let body = verifier.verify_and_unwrap(&wire).unwrap();
    assert_eq!(body.client_id, "passkey_01");
    assert_eq!(verifier.verify_and_unwrap(&wire).unwrap_err().reason(), "replay_attack");
}

#[test]
fn nonces_do_not_repeat_across_ten_thousand_requests() {
    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let mut s = signer(&clock);

    let mut seen = HashSet::new();
    let mut repeats = 0;
    for _ in 0..10_000 {
        let wire = s.build_request("unlock_request", "123456").unwrap();
        let wrapper: EnvelopeWrapper = serde_json::from_slice(&wire).unwrap();
        let body: EnvelopeBody = serde_json::from_str(&wrapper.body).unwrap();
        assert!(body.nonce < 0x7FFF_FFFF);
        if !seen.insert((body.client_id, body.nonce)) {
            repeats += 1;
        }
    }
    // Expected collisions for 10k draws from 2^31 values is about 0.02.
    assert!(repeats <= 3, "{repeats} repeated nonces");
}

#[test]
fn stale_requests_are_rejected_after_drift_window() {
    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let wire = signer(&clock).build_request("unlock_request", "123456").unwrap();

    clock.advance(301_000);
    let mut verifier =
        EnvelopeVerifier::new(SigningKey::from_bytes(KEY), clock.clone(), Arc::new(CapturingLogSink::default()));
    let err = verifier.verify_and_unwrap(&wire).unwrap_err();
    assert_eq!(err.reason(), "invalid_timestamp");
}
