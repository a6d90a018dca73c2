//! The two endpoints: a card reader on the radio link and a keypad lock on
//! the publish/subscribe channel.

pub mod constants;
pub mod endpoint_config;
pub mod endpoint_stats;
pub mod gate_reader;
pub mod keypad_lock;
pub mod memory_monitor;
pub mod pubsub;
pub mod pubsub_telemetry;
pub mod radio_command;
pub mod radio_telemetry;

pub use endpoint_config::{GateConfig, KeypadConfig};
pub use endpoint_stats::EndpointStats;
pub use gate_reader::{GateReader, ScanOutcome};
pub use keypad_lock::{KeyOutcome, KeypadLock};
pub use memory_monitor::{MemoryMonitor, MemoryProbe, MemoryThresholds, MemoryVerdict};
pub use pubsub::{InboundMessage, PubSub, PublishError, Topics};
pub use pubsub_telemetry::PubSubTelemetry;
pub use radio_command::{format_ack, parse_radio_command};
pub use radio_telemetry::{RadioTelemetry, status_code};
