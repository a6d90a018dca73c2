const POLY: u32 = 0x04C1_1DB7;

/// CRC-32 with polynomial `0x04C11DB7`, init and final XOR `0xFFFFFFFF`,
/// processed most-significant-bit first without reflection.
///
/// This is not the zlib/`crc32fast` variant; the radio firmware computes it
/// bit by bit and so does this.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= u32::from(byte) << 24;
        for _ in 0..8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
        }
    }
    crc ^ 0xFFFF_FFFF
}
