use std::time::Duration;

/// How long a local grant keeps the door open.
pub const OPEN_HOLD: Duration = Duration::from_millis(5_000);
/// Extra time a remote session stays on record after its unlock window.
pub const ACTUATION_MARGIN: Duration = Duration::from_millis(5_000);

pub const DEFAULT_REMOTE_DURATION_MS: u64 = 5_000;
pub const MAX_REMOTE_DURATION_MS: u64 = 30_000;

pub const UNKNOWN_USER: &str = "unknown";
pub const NO_REASON: &str = "no_reason_provided";
pub const MANUAL_LOCK_REASON: &str = "manual_lock";
