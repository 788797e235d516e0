//! Cancellable scheduled tasks.
//!
//! Every delayed action in the overlay (fade-in, delayed closure, ARIA
//! debounce, counter decay, list focus) is held as an `Option<ScheduledTask>`
//! by the component that created it. Replacing or dropping the handle aborts
//! the pending task, so cancel-and-restart is a plain assignment.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// Owned handle to a task running on the tokio runtime. Aborts on drop.
#[derive(Debug)]
pub struct ScheduledTask {
    label: &'static str,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `future` on the runtime.
    pub fn spawn<F>(label: &'static str, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            label,
            handle: tokio::spawn(future),
        }
    }

    /// Run `callback` once after `delay`.
    pub fn after<F>(label: &'static str, delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::spawn(label, async move {
            tokio::time::sleep(delay).await;
            callback();
        })
    }

    /// Run `callback` every `period`, first after `initial_delay`.
    ///
    /// `period` must be non-zero; the spawned task panics otherwise.
    pub fn every<F>(label: &'static str, initial_delay: Duration, period: Duration, callback: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        Self::spawn(label, async move {
            let start = tokio::time::Instant::now() + initial_delay;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                callback();
            }
        })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Whether the task ran to completion (or was aborted).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Abort the task. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            trace!(label = self.label, "Cancelling scheduled task");
            self.handle.abort();
        }
    }
}

/// Whether an optional task slot holds a task that has not fired yet.
pub fn is_pending(slot: &Option<ScheduledTask>) -> bool {
    slot.as_ref().is_some_and(|task| !task.is_finished())
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
