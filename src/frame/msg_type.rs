use std::fmt;

/// Message kinds carried in the high nibble of the fifth frame byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgType {
    Scan,
    TempUpdate,
    Motion,
    RelayControl,
    Passkey,
    GateStatus,
    SystemStatus,
    DoorStatus,
    Ack,
    Error,
}

impl MsgType {
    pub const fn as_u8(self) -> u8 {
        match self {
            MsgType::Scan => 0x01,
            MsgType::TempUpdate => 0x02,
            MsgType::Motion => 0x03,
            MsgType::RelayControl => 0x04,
            MsgType::Passkey => 0x05,
            MsgType::GateStatus => 0x06,
            MsgType::SystemStatus => 0x07,
            MsgType::DoorStatus => 0x08,
            MsgType::Ack => 0x80,
            MsgType::Error => 0xFF,
        }
    }

    pub const fn from_u8(code: u8) -> Option<Self> {
        Some(match code {
            0x01 => MsgType::Scan,
            0x02 => MsgType::TempUpdate,
            0x03 => MsgType::Motion,
            0x04 => MsgType::RelayControl,
            0x05 => MsgType::Passkey,
            0x06 => MsgType::GateStatus,
            0x07 => MsgType::SystemStatus,
            0x08 => MsgType::DoorStatus,
            0x80 => MsgType::Ack,
            0xFF => MsgType::Error,
            _ => return None,
        })
    }

    /// The 4-bit header value, or `None` for codes that do not fit
    /// (`Ack` and `Error` only exist on the gateway side).
    pub const fn nibble(self) -> Option<u8> {
        let code = self.as_u8();
        if code <= 0x0F { Some(code) } else { None }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}(0x{:02X})", self.as_u8())
    }
}
