#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub frames_sent: u64,
    pub send_failures: u64,
    pub replies_accepted: u64,
    /// Malformed packets and well-formed replies outside the expected schema.
    pub replies_discarded: u64,
    pub timeouts: u64,
}
