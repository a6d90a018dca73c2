use std::sync::Mutex;

use crate::supervisor::{RestartHandle, RestartReason};

/// Records restart requests instead of ending the process.
#[derive(Debug, Default)]
pub struct RecordingRestart {
    reasons: Mutex<Vec<RestartReason>>,
}

impl RecordingRestart {
    pub fn reasons(&self) -> Vec<RestartReason> {
        self.reasons
            .lock()
            .map(|r| r.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl RestartHandle for RecordingRestart {
    fn restart(&self, reason: RestartReason) {
        match self.reasons.lock() {
            Ok(mut r) => r.push(reason),
            Err(poisoned) => poisoned.into_inner().push(reason),
        }
    }
}
