//! Write-once cancellation signal shared by all probers.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::Notify;

/// Broadcast flag set once when the global deadline elapses.
///
/// Cloning yields another handle to the same flag. Probers read it with
/// [`CancellationSignal::is_set`] after each failed connect attempt.
#[derive(Clone, Debug, Default)]
pub struct CancellationSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    set: AtomicBool,
    notify: Notify,
}

impl CancellationSignal {
    /// Create an unset signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once the signal has been set.
    pub fn is_set(&self) -> bool {
        self.inner.set.load(Ordering::Acquire)
    }

    /// Set the signal and wake all waiters.
    ///
    /// Returns true only for the call that performed the UNSET → SET transition.
    pub fn set(&self) -> bool {
        if self.inner.set.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.inner.notify.notify_waiters();
        true
    }

    /// Wait until the signal is set.
    pub async fn wait(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent `set` cannot be missed.
        notified.as_mut().enable();
        if self.is_set() {
            return;
        }
        notified.await;
    }
}
