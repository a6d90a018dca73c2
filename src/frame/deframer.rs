use bytes::{Buf, BytesMut};

use super::{
    constants::{CRC_LEN, FRAME_HEADER_LEN, FRAME_PREFIX, MAX_PAYLOAD},
    frame::Frame,
    frame_error::FrameError,
};

/// Resynchronising frame parser over a raw serial byte stream.
///
/// Bytes before a prefix are discarded. A complete candidate is removed from
/// the buffer whether or not it decodes, so one corrupted frame never stalls
/// the stream.
#[derive(Debug, Default)]
pub struct Deframer {
    buf: BytesMut,
    frames: u64,
    rejected: u64,
    discarded_bytes: u64,
}

impl Deframer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Next complete candidate, decoded. `None` means more bytes are needed.
    pub fn next_frame(&mut self) -> Option<Result<Frame, FrameError>> {
        loop {
            let Some(start) = find_prefix(&self.buf) else {
                // Keep a possible partial prefix at the tail.
                let keep = self.buf.len().min(FRAME_PREFIX.len() - 1);
                let stale = self.buf.len() - keep;
                self.discard(stale);
                return None;
            };
            self.discard(start);

            if self.buf.len() < FRAME_HEADER_LEN {
                return None;
            }
            let declared = self.buf[FRAME_HEADER_LEN - 1] as usize;
            if declared > MAX_PAYLOAD {
                // Not a real header; look for the next prefix.
                self.discard(1);
                self.rejected += 1;
                continue;
            }
            let total = FRAME_HEADER_LEN + declared + CRC_LEN;
            if self.buf.len() < total {
                return None;
            }

            let candidate = self.buf.split_to(total);
            let decoded = Frame::decode(&candidate);
            match decoded {
                Ok(_) => self.frames += 1,
                Err(_) => self.rejected += 1,
            }
            return Some(decoded);
        }
    }

    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn discarded_bytes(&self) -> u64 {
        self.discarded_bytes
    }

    fn discard(&mut self, n: usize) {
        if n > 0 {
            self.buf.advance(n);
            self.discarded_bytes += n as u64;
        }
    }
}

fn find_prefix(buf: &[u8]) -> Option<usize> {
    buf.windows(FRAME_PREFIX.len())
        .position(|w| w == FRAME_PREFIX)
}
