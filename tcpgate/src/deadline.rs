//! One-shot deadline timer driving the [`CancellationSignal`].

use crate::signal::CancellationSignal;
use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

const ARMED: u8 = 0;
const FIRED: u8 = 1;
const DISARMED: u8 = 2;

/// Sets a [`CancellationSignal`] once after a fixed duration unless disarmed first.
///
/// Firing and disarming race on a single compare-and-swap of the timer state,
/// so exactly one of them wins and the loser observes the winner's result.
#[derive(Debug)]
pub struct DeadlineTimer {
    duration: Duration,
    state: Arc<AtomicU8>,
    handle: JoinHandle<()>,
}

impl DeadlineTimer {
    /// Arm a timer that sets `signal` after `duration`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(duration: Duration, signal: CancellationSignal) -> Self {
        let state = Arc::new(AtomicU8::new(ARMED));

        let handle = {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                if fire(&state, &signal) {
                    debug!(duration_ms = duration.as_millis() as u64, "Deadline elapsed");
                }
            })
        };

        Self {
            duration,
            state,
            handle,
        }
    }

    /// Try to stop the pending fire.
    ///
    /// Returns true if the timer had not fired yet and now never will. Returns
    /// false if it already fired (or was already disarmed).
    pub fn disarm(&self) -> bool {
        let stopped = self
            .state
            .compare_exchange(ARMED, DISARMED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if stopped {
            self.handle.abort();
        }
        stopped
    }

    /// Returns true if the timer has fired.
    pub fn has_fired(&self) -> bool {
        self.state.load(Ordering::Acquire) == FIRED
    }

    /// Configured duration
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Fire immediately, as if the duration had elapsed.
    ///
    /// Returns true only if this call performed the firing.
    #[cfg(test)]
    pub(crate) fn fire_now(&self, signal: &CancellationSignal) -> bool {
        fire(&self.state, signal)
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn fire(state: &AtomicU8, signal: &CancellationSignal) -> bool {
    if state
        .compare_exchange(ARMED, FIRED, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return false;
    }
    signal.set();
    true
}
