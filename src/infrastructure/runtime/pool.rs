//! Worker pool - races identical search tasks on OS threads
//!
//! Each worker runs the same task with its own id; the first `Some` wins and
//! cancels the others through a shared [`CancellationToken`] that tasks poll
//! between iterations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

/// Cooperative cancellation flag shared by a group of workers
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Run `task` on `workers` threads and return the first success
///
/// `cancel` is triggered once a result arrives, so the remaining workers stop
/// at their next check. Cancelling it from outside stops the whole race.
/// Returns `None` when every worker gave up.
pub fn race_first_success<T, F>(workers: usize, cancel: &CancellationToken, task: F) -> Option<T>
where
    T: Send,
    F: Fn(usize, &CancellationToken) -> Option<T> + Sync,
{
    let (result_tx, result_rx) = mpsc::channel::<T>();

    thread::scope(|scope| {
        for id in 0..workers.max(1) {
            let result_tx = result_tx.clone();
            let task = &task;
            scope.spawn(move || {
                if let Some(found) = task(id, cancel) {
                    let _ = result_tx.send(found);
                }
                tracing::trace!(worker = id, "worker finished");
            });
        }
        // Only worker-held senders remain, so recv ends once all of them exit
        drop(result_tx);

        let first = result_rx.recv().ok();
        cancel.cancel();
        first
    })
}
