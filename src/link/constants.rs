use std::time::Duration;

/// Sleep between receive polls while waiting for a reply.
pub const REPLY_POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Sleep step while backing off between send attempts.
pub const BACKOFF_STEP: Duration = Duration::from_millis(100);

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(2_000);
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_millis(12_000);

pub const REMOTE_UNLOCK_PREFIX: &str = "REMOTE_UNLOCK:";
pub const REMOTE_LOCK_PREFIX: &str = "REMOTE_LOCK:";
