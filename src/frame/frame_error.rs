use std::fmt;

use crate::fault::FaultClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    TooShort(usize),
    BadPrefix([u8; 3]),
    LengthMismatch { declared: usize, actual: usize },
    ChecksumMismatch { received: u32, computed: u32 },
    PayloadTooLarge(usize),
    /// A header field does not fit its nibble.
    Unencodable(&'static str),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FrameError::*;
        match self {
            TooShort(n) => write!(f, "frame too short: {n} bytes"),
            BadPrefix(p) => write!(f, "bad frame prefix: {p:02X?}"),
            LengthMismatch { declared, actual } => {
                write!(f, "declared payload length {declared}, {actual} bytes present")
            }
            ChecksumMismatch { received, computed } => {
                write!(f, "checksum mismatch: received {received:08X}, computed {computed:08X}")
            }
            PayloadTooLarge(n) => write!(f, "payload of {n} bytes exceeds frame capacity"),
            Unencodable(field) => write!(f, "{field} does not fit the frame header"),
        }
    }
}

impl std::error::Error for FrameError {}

impl FrameError {
    pub fn fault_class(&self) -> FaultClass {
        FaultClass::Malformed
    }
}
