//! Dead-man's switch for the control loop.

pub mod liveness;
pub mod liveness_supervisor;
pub mod restart;
pub mod watchdog;

pub use liveness::{Liveness, NoopLiveness};
pub use liveness_supervisor::{LivenessSupervisor, Verdict};
pub use restart::{ProcessRestart, RestartHandle, RestartReason};
pub use watchdog::Watchdog;
