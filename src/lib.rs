//! Gatelink is the protocol core of a family of access-control endpoints: a
//! card reader on a long-range radio link and a keypad lock on a
//! publish/subscribe broker, both talking to a trusted gateway.
//!
//! The crate covers the compact CRC-checked radio frame, a retrying link
//! transport on top of it, HMAC-signed request envelopes with replay
//! protection, a request rate limiter, the door actuator state machine and
//! a liveness supervisor. Radio, broker and hardware are consumed through
//! small traits so every component runs against a manual clock in tests.

/// Door/gate actuation, remote sessions, commands and status documents.
pub mod actuator;
/// Injected monotonic and wall clocks.
pub mod clock;
/// INI-style configuration loading.
pub mod config;
/// The gate reader and keypad lock endpoints.
pub mod endpoint;
/// Signed request envelopes: signer and verifier.
pub mod envelope;
/// Error classification shared by every error type.
pub mod fault;
/// Radio frame and gateway reply codecs.
pub mod frame;
/// Test doubles for every seam.
pub mod harness;
/// Retrying frame transport over a byte channel.
pub mod link;
/// Logging utilities.
pub mod log;
/// Fixed-window request throttle.
pub mod rate_limiter;
/// Liveness supervisor and restart handling.
pub mod supervisor;
/// Trust anchors and the verifying TLS client config.
pub mod tls_utils;
