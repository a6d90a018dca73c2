/// Physical state as far as the controller is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoorState {
    #[default]
    Locked,
    /// Opened by a local grant; relocks at `until_ms`.
    Unlocked { until_ms: u64 },
    /// Opened by a remote command; relocks at `until_ms`.
    RemoteUnlocked { until_ms: u64 },
}

impl DoorState {
    pub fn is_open(self) -> bool {
        !matches!(self, DoorState::Locked)
    }

    pub fn relock_at(self) -> Option<u64> {
        match self {
            DoorState::Locked => None,
            DoorState::Unlocked { until_ms } | DoorState::RemoteUnlocked { until_ms } => Some(until_ms),
        }
    }
}
