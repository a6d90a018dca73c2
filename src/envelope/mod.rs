//! Signed request envelope for the publish/subscribe channel.
//!
//! The endpoint side builds `{"body": "<json>", "hmac": "<hex>"}` with
//! [`EnvelopeSigner`]; [`EnvelopeVerifier`] is the receiving side's check
//! (signature, freshness, replay).

pub mod constants;
pub mod envelope_body;
pub mod envelope_error;
pub mod envelope_signer;
pub mod envelope_verifier;
pub mod secret_hash;
pub mod signing_key;

pub use envelope_body::{EnvelopeBody, EnvelopeWrapper};
pub use envelope_error::EnvelopeError;
pub use envelope_signer::{EnvelopeSigner, sign_body};
pub use envelope_verifier::EnvelopeVerifier;
pub use secret_hash::{DigestLen, hash_secret};
pub use signing_key::SigningKey;
