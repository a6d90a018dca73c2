use std::fmt;

/// Failure classes every protocol error maps onto.
///
/// Only `ResourceExhaustion` is fatal; everything else is consumed by the
/// calling loop iteration (dropped, retried, or turned into a denial).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultClass {
    /// Structural or integrity check failed. Dropped silently.
    Malformed,
    /// Signature, hash or freshness check failed. Dropped and logged as a
    /// security event.
    Unauthenticated,
    /// No valid reply before the deadline. Treated as a denial.
    Timeout,
    /// The send primitive itself failed after all retries.
    TransportFailure,
    /// Memory below the critical threshold. Forces a restart.
    ResourceExhaustion,
}

impl FaultClass {
    pub fn is_fatal(self) -> bool {
        matches!(self, FaultClass::ResourceExhaustion)
    }

    /// True for classes that must be written to the log as security events.
    pub fn is_security_event(self) -> bool {
        matches!(self, FaultClass::Unauthenticated)
    }
}

impl fmt::Display for FaultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FaultClass::Malformed => "malformed",
            FaultClass::Unauthenticated => "unauthenticated",
            FaultClass::Timeout => "timeout",
            FaultClass::TransportFailure => "transport failure",
            FaultClass::ResourceExhaustion => "resource exhaustion",
        };
        f.write_str(s)
    }
}
