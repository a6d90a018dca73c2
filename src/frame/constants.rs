/// Address/channel marker that starts every sensor frame.
pub const FRAME_PREFIX: [u8; 3] = [0x00, 0x02, 0x17];
/// Logical radio channel shared by all endpoints.
pub const RADIO_CHANNEL: u8 = 0x17;
pub const PROTOCOL_VERSION: u8 = 1;

/// Largest radio packet the modem carries.
pub const MAX_PACKET: usize = 64;
/// prefix(3) + type/version(1) + flags/device(1) + seq(2) + ts(4) + len(1)
pub const FRAME_HEADER_LEN: usize = 12;
pub const CRC_LEN: usize = 4;
/// Payload budget the firmware reserves (64 - 14).
pub const MAX_PAYLOAD: usize = 50;
/// Below this nothing can be a frame.
pub const MIN_FRAME_LEN: usize = 12;
/// The checksum starts right after the prefix.
pub const CRC_START: usize = 3;

/// Gateway reply header.
pub const REPLY_HEADER: [u8; 3] = [0xC0, 0x00, 0x00];
/// header(3) + addr(2) + channel(1) + len(1)
pub const REPLY_HEADER_LEN: usize = 7;

pub const STATUS_GRANT: &str = "GRANT";
pub const STATUS_DENY: &str = "DENY5";
