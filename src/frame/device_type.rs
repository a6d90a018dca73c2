use std::fmt;

/// Sender device class, low nibble of the flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    RfidGate,
    RelayFan,
    TempSensor,
    Gateway,
    Passkey,
}

impl DeviceType {
    pub const fn as_u8(self) -> u8 {
        match self {
            DeviceType::RfidGate => 0x01,
            DeviceType::RelayFan => 0x02,
            DeviceType::TempSensor => 0x03,
            DeviceType::Gateway => 0x04,
            DeviceType::Passkey => 0x05,
        }
    }

    pub const fn from_u8(code: u8) -> Option<Self> {
        Some(match code {
            0x01 => DeviceType::RfidGate,
            0x02 => DeviceType::RelayFan,
            0x03 => DeviceType::TempSensor,
            0x04 => DeviceType::Gateway,
            0x05 => DeviceType::Passkey,
            _ => return None,
        })
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeviceType::RfidGate => "rfid-gate",
            DeviceType::RelayFan => "relay-fan",
            DeviceType::TempSensor => "temp-sensor",
            DeviceType::Gateway => "gateway",
            DeviceType::Passkey => "passkey",
        };
        f.write_str(s)
    }
}
