use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use super::{
    constants::{
        CRC_LEN, CRC_START, FRAME_HEADER_LEN, FRAME_PREFIX, MAX_PAYLOAD, MIN_FRAME_LEN,
        PROTOCOL_VERSION,
    },
    crc32::crc32,
    device_type::DeviceType,
    frame_error::FrameError,
    msg_type::MsgType,
};

/// One decoded radio frame.
///
/// Header nibbles are kept raw so a frame from a newer device still decodes;
/// [`Frame::kind`] and [`Frame::device`] map them when they are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub msg_type: u8,
    pub version: u8,
    pub flags: u8,
    pub device_type: u8,
    pub sequence: u16,
    /// Seconds since the sender booted.
    pub timestamp: u32,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(
        msg_type: MsgType,
        device_type: DeviceType,
        flags: u8,
        sequence: u16,
        timestamp: u32,
        payload: impl Into<Vec<u8>>,
    ) -> Result<Self, FrameError> {
        let msg_type = msg_type
            .nibble()
            .ok_or(FrameError::Unencodable("message type"))?;
        if flags > 0x0F {
            return Err(FrameError::Unencodable("flags"));
        }
        let payload = payload.into();
        if payload.len() > MAX_PAYLOAD {
            return Err(FrameError::PayloadTooLarge(payload.len()));
        }
        Ok(Self {
            msg_type,
            version: PROTOCOL_VERSION,
            flags,
            device_type: device_type.as_u8(),
            sequence,
            timestamp,
            payload,
        })
    }

    pub fn kind(&self) -> Option<MsgType> {
        MsgType::from_u8(self.msg_type)
    }

    pub fn device(&self) -> Option<DeviceType> {
        DeviceType::from_u8(self.device_type)
    }

    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_LEN + self.payload.len() + CRC_LEN
    }

    pub fn encode(&self) -> Result<Vec<u8>, FrameError> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Appends the wire form to `out`. On error nothing is written.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), FrameError> {
        if self.msg_type > 0x0F || self.version > 0x0F {
            return Err(FrameError::Unencodable("message type"));
        }
        if self.flags > 0x0F || self.device_type > 0x0F {
            return Err(FrameError::Unencodable("flags"));
        }
        if self.payload.len() > MAX_PAYLOAD {
            return Err(FrameError::PayloadTooLarge(self.payload.len()));
        }

        let start = out.len();
        out.extend_from_slice(&FRAME_PREFIX);
        out.push(self.msg_type << 4 | self.version);
        out.push(self.flags << 4 | self.device_type);
        // Writes into a Vec cannot fail.
        let _ = out.write_u16::<LittleEndian>(self.sequence);
        let _ = out.write_u32::<LittleEndian>(self.timestamp);
        out.push(self.payload.len() as u8);
        out.extend_from_slice(&self.payload);

        let crc = crc32(&out[start + CRC_START..]);
        let _ = out.write_u32::<LittleEndian>(crc);
        Ok(())
    }

    /// Decodes exactly one frame occupying all of `buf`.
    ///
    /// Any structural or checksum failure rejects the whole buffer.
    pub fn decode(buf: &[u8]) -> Result<Self, FrameError> {
        if buf.len() < MIN_FRAME_LEN {
            return Err(FrameError::TooShort(buf.len()));
        }
        if buf[..3] != FRAME_PREFIX {
            return Err(FrameError::BadPrefix([buf[0], buf[1], buf[2]]));
        }

        let declared = buf[11] as usize;
        let actual = buf.len().saturating_sub(FRAME_HEADER_LEN + CRC_LEN);
        if buf.len() < FRAME_HEADER_LEN + CRC_LEN || declared != actual {
            return Err(FrameError::LengthMismatch { declared, actual });
        }

        let body_end = FRAME_HEADER_LEN + declared;
        let received = LittleEndian::read_u32(&buf[body_end..body_end + CRC_LEN]);
        let computed = crc32(&buf[CRC_START..body_end]);
        if received != computed {
            return Err(FrameError::ChecksumMismatch { received, computed });
        }

        Ok(Self {
            msg_type: buf[3] >> 4,
            version: buf[3] & 0x0F,
            flags: buf[4] >> 4,
            device_type: buf[4] & 0x0F,
            sequence: LittleEndian::read_u16(&buf[5..7]),
            timestamp: LittleEndian::read_u32(&buf[7..11]),
            payload: buf[FRAME_HEADER_LEN..body_end].to_vec(),
        })
    }
}

/// Builds and encodes a frame in one step.
pub fn encode(
    msg_type: MsgType,
    device_type: DeviceType,
    flags: u8,
    sequence: u16,
    timestamp: u32,
    payload: &[u8],
) -> Result<Vec<u8>, FrameError> {
    Frame::new(msg_type, device_type, flags, sequence, timestamp, payload)?.encode()
}

pub fn decode(buf: &[u8]) -> Result<Frame, FrameError> {
    Frame::decode(buf)
}
