//! Cancellable debounce timer.
//!
//! A [`Debouncer`] holds at most one pending callback. Scheduling aborts the
//! pending one and starts the quiet period over, so a burst of events yields a
//! single firing carrying whatever the callback reads at fire time.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub struct Debouncer {
    /// Label for logs ("document-sync", "input-settle", ...).
    name: &'static str,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(name: &'static str, delay: Duration) -> Self {
        Self {
            name,
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `f` after the quiet period, cancelling any pending run.
    ///
    /// Timers are Tokio tasks. Outside a runtime there is nothing to wait on,
    /// so `f` runs immediately rather than being dropped.
    pub fn schedule<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        match Handle::try_current() {
            Ok(runtime) => {
                let delay = self.delay;
                *pending = Some(runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    f();
                }));
            }
            Err(_) => {
                drop(pending);
                tracing::warn!(timer = self.name, "no tokio runtime; firing debounced callback now");
                f();
            }
        }
    }

    /// Abort the pending run, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                if was_pending {
                    tracing::trace!(timer = self.name, "cancelled pending timer");
                }
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("name", &self.name)
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}
