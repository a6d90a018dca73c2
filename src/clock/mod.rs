pub mod clock;
pub mod manual_clock;
pub mod system_clock;

pub use clock::Clock;
pub use manual_clock::ManualClock;
pub use system_clock::{SystemClock, unix_millis};
