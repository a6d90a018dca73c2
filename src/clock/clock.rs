use std::time::Duration;

/// Time source injected into every component that waits or stamps.
///
/// `now_ms` is a monotonic tick counter (milliseconds since the endpoint
/// booted) and is the only value deadlines are computed from. `unix_secs` is
/// wall-clock time and is only ever copied into messages.
pub trait Clock: Send + Sync {
    /// Milliseconds since boot. Never goes backwards.
    fn now_ms(&self) -> u64;

    /// Wall-clock seconds since the UNIX epoch.
    fn unix_secs(&self) -> u64;

    /// Suspends the caller for `d`.
    fn sleep(&self, d: Duration);

    /// Seconds since boot, truncated the way radio frames carry it.
    fn uptime_secs(&self) -> u32 {
        (self.now_ms() / 1_000) as u32
    }
}
