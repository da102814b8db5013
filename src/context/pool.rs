//! # Fixed-size worker pool.
//!
//! [`WorkerPool`] runs jobs on tokio's blocking threads, admitting at most
//! `size` of them at once through a [`Semaphore`].
//!
//! ## Architecture
//! ```text
//! dispatch(job) ──► [unbounded queue] ──► driver task
//!                                            │ acquire permit
//!                                            ▼
//!                                  spawn_blocking(job + permit)
//!                                            │
//!                                  panic ──► error!(…), permit released
//! ```
//!
//! ## Rules
//! - At most `size` jobs run concurrently; the rest wait in submission order.
//! - A single driver admits jobs, so start order is dispatch order no matter
//!   which thread (tokio worker or not) dispatched them.
//! - `dispatch()` never blocks and may be called from any thread.
//! - A panicking job is caught and logged; the pool keeps serving.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, warn};

use super::dispatch::{Dispatch, Job, panic_message};
use crate::error::RuntimeError;

/// Bounded pool of worker threads.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    queue: mpsc::UnboundedSender<Job>,
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Creates a pool of `size` workers (min 1) on the given tokio runtime.
    ///
    /// The queue driver is spawned on `handle`; it ends once every clone of
    /// the pool is dropped and the queue is drained.
    pub fn new(handle: Handle, size: usize) -> Self {
        let size = size.max(1);
        let permits = Arc::new(Semaphore::new(size));
        let (queue, rx) = mpsc::unbounded_channel();
        handle.spawn(drive(rx, Arc::clone(&permits)));
        Self {
            queue,
            permits,
            size,
        }
    }

    /// Creates a pool on the tokio runtime the caller is running in.
    pub fn current(size: usize) -> Result<Self, RuntimeError> {
        let handle = Handle::try_current().map_err(|_| RuntimeError::NoAsyncRuntime)?;
        Ok(Self::new(handle, size))
    }

    /// Maximum number of concurrently running jobs.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of idle workers right now.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

async fn drive(mut rx: mpsc::UnboundedReceiver<Job>, permits: Arc<Semaphore>) {
    while let Some(job) = rx.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
                let info = panic_message(payload.as_ref());
                error!(context = "pool", panic = %info, "job panicked");
            }
        });
    }
    debug!(context = "pool", "pool driver stopped");
}

impl Dispatch for WorkerPool {
    fn dispatch(&self, job: Job) {
        if self.queue.send(job).is_err() {
            warn!(context = "pool", "pool closed; job dropped");
        }
    }

    fn name(&self) -> &str {
        "pool"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::timeout;

    fn explode() {
        panic!("boom");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn never_runs_more_than_size_jobs() {
        let pool = WorkerPool::current(2).unwrap();
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();

        for _ in 0..6 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            let tx = tx.clone();
            pool.dispatch(Box::new(move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(30));
                running.fetch_sub(1, Ordering::SeqCst);
                let _ = tx.send(());
            }));
        }
        for _ in 0..6 {
            timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        }
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(pool.size(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn survives_a_panicking_job() {
        let pool = WorkerPool::current(1).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        pool.dispatch(Box::new(explode));
        pool.dispatch(Box::new(move || {
            let _ = tx.send("after");
        }));

        let got = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
        assert_eq!(got, Some("after"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn starts_jobs_in_dispatch_order_from_a_worker() {
        let pool = WorkerPool::current(1).unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));
        let (tx, mut rx) = mpsc::unbounded_channel();

        // Dispatching from a tokio worker must not let the last job jump ahead.
        let (p, o) = (pool.clone(), Arc::clone(&order));
        tokio::spawn(async move {
            for i in 0..5 {
                let o = Arc::clone(&o);
                let tx = tx.clone();
                p.dispatch(Box::new(move || {
                    o.lock().unwrap().push(i);
                    let _ = tx.send(());
                }));
            }
        })
        .await
        .unwrap();

        for _ in 0..5 {
            timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn current_outside_runtime_fails() {
        let err = WorkerPool::current(3).unwrap_err();
        assert!(matches!(err, RuntimeError::NoAsyncRuntime));
    }
}
