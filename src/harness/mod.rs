//! Deterministic doubles for the seams of the crate: byte channel, actuator,
//! telemetry, pub/sub session, restart, liveness, log sink and memory probe.
//!
//! Used by the unit tests and by `tests/`; paired with
//! [`ManualClock`](crate::clock::ManualClock) no real time passes.

pub mod capturing_log_sink;
pub mod counting_liveness;
pub mod fixed_memory_probe;
pub mod recording_actuator;
pub mod recording_pubsub;
pub mod recording_restart;
pub mod recording_telemetry;
pub mod scripted_channel;

pub use capturing_log_sink::CapturingLogSink;
pub use counting_liveness::CountingLiveness;
pub use fixed_memory_probe::FixedMemoryProbe;
pub use recording_actuator::{ActuatorEvent, RecordingActuator};
pub use recording_pubsub::{Published, RecordingPubSub};
pub use recording_restart::RecordingRestart;
pub use recording_telemetry::RecordingTelemetry;
pub use scripted_channel::ScriptedChannel;
