use std::time::Duration;

// Gate reader
pub const SCAN_DEBOUNCE: Duration = Duration::from_millis(3_000);
pub const MAX_UID_LEN: usize = 10;
pub const MAX_STATUS_LEN: usize = 16;
/// Address word the gate puts on reply-layout acknowledgements.
pub const RADIO_ACK_ADDRESS: u16 = 0x0000;
pub const DEFAULT_GATE_ID: &str = "gate_01";

pub const CODE_ONLINE: &str = "ONLINE";
pub const CODE_OPEN: &str = "open";
pub const CODE_CLOSED: &str = "clos";
pub const CODE_ERROR: &str = "erro";
pub const CODE_REMOTE_OPEN: &str = "REMOTE_OPEN";
pub const CODE_REMOTE_CLOSED: &str = "REMOTE_CLOS";
pub const CODE_AUTO_CLOSED: &str = "AUTO_CLOS";

// Keypad lock
pub const DEFAULT_KEYPAD_ID: &str = "passkey_01";
pub const DEFAULT_KEYPAD_SALT: &str = "passkey_01_salt_2025";
pub const CODE_LENGTH: usize = 6;
pub const ENTRY_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const KEYPAD_REPLY_TIMEOUT: Duration = Duration::from_millis(15_000);
pub const MAX_RETRIES: u32 = 3;
pub const FAILURE_LOCKOUT: Duration = Duration::from_millis(30_000);

// Memory monitor
pub const MEMORY_LOW_BYTES: u32 = 8_000;
pub const MEMORY_CRITICAL_BYTES: u32 = 4_000;
pub const MEMORY_CHECK_INTERVAL: Duration = Duration::from_millis(30_000);

pub const TOPIC_ROOT: &str = "home/devices";
