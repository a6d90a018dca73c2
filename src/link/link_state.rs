/// Progress of the request currently owned by a [`LinkTransport`](super::LinkTransport).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Idle,
    Sending,
    AwaitingReply,
    Success,
    Failed,
}

impl LinkState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LinkState::Success | LinkState::Failed)
    }

    /// True while a request occupies the single request slot.
    pub fn in_flight(self) -> bool {
        matches!(self, LinkState::Sending | LinkState::AwaitingReply)
    }
}
