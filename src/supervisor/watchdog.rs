use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use super::liveness_supervisor::LivenessSupervisor;

/// Granularity at which the watchdog notices a stop request.
const STOP_POLL: Duration = Duration::from_millis(50);

/// Periodic timer that runs [`LivenessSupervisor::check`] on its own thread.
///
/// Dropping the watchdog stops and joins the thread.
pub struct Watchdog {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Watchdog {
    pub fn spawn(supervisor: Arc<LivenessSupervisor>, period: Duration) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = thread::Builder::new()
            .name("liveness-watchdog".into())
            .spawn(move || {
                let mut next = Instant::now() + period;
                while !stop_flag.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now >= next {
                        supervisor.check();
                        next = now + period;
                    }
                    thread::sleep(STOP_POLL.min(next.saturating_duration_since(now)));
                }
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.stop();
    }
}
