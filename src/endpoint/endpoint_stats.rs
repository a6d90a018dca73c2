/// Per-endpoint counters, read by diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndpointStats {
    /// Card scans or complete codes submitted to the gateway.
    pub requests: u64,
    pub granted: u64,
    pub denied: u64,
    pub timeouts: u64,
    pub transport_errors: u64,
    pub rate_limited: u64,
    /// Triggers dropped because a request or hold was in flight.
    pub ignored: u64,
    /// Inbound commands dropped as malformed.
    pub dropped_commands: u64,
    pub remote_commands: u64,
}
