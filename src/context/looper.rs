//! # Single-destination job loops.
//!
//! A [`Looper`] drains a queue of [`Job`]s one at a time on whichever thread
//! drives it. [`LoopHandle`] is the cloneable sending side and implements
//! [`Dispatch`]. [`LoopThread`] owns a dedicated, named OS thread driving a
//! looper; it backs the named-worker context and, for headless programs, the
//! main context.
//!
//! ## Architecture
//! ```text
//! LoopHandle ─┐
//! LoopHandle ─┼──► [unbounded queue] ──► Looper::run_blocking() / run().await
//! LoopHandle ─┘                               ├─► job()
//!                                             └─► panic → error!(…), keep looping
//! ```
//!
//! ## Rules
//! - Jobs run sequentially, in queue order.
//! - The loop ends on [`LoopHandle::quit`] (after jobs queued before it) or
//!   once every handle is dropped.
//! - Jobs dispatched after the loop ended are dropped with a warning.
//! - [`Looper::run_blocking`] must not be called from inside an async context.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use super::dispatch::{Dispatch, Job, panic_message};
use crate::error::RuntimeError;

enum Message {
    Run(Job),
    Quit,
}

/// Receiving side of a job loop.
pub struct Looper {
    name: Arc<str>,
    rx: mpsc::UnboundedReceiver<Message>,
}

/// Sending side of a job loop.
#[derive(Clone)]
pub struct LoopHandle {
    name: Arc<str>,
    tx: mpsc::UnboundedSender<Message>,
}

impl Looper {
    /// Creates a loop and its first handle.
    pub fn new(name: impl Into<Arc<str>>) -> (Self, LoopHandle) {
        let name = name.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = LoopHandle {
            name: Arc::clone(&name),
            tx,
        };
        (Self { name, rx }, handle)
    }

    /// Returns the loop name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drives the loop on the calling thread until it is asked to quit.
    pub fn run_blocking(mut self) {
        debug!(context = %self.name, "loop started");
        while let Some(msg) = self.rx.blocking_recv() {
            match msg {
                Message::Run(job) => self.run_job(job),
                Message::Quit => break,
            }
        }
        debug!(context = %self.name, "loop stopped");
    }

    /// Drives the loop from an async task until it is asked to quit.
    ///
    /// Jobs themselves are synchronous and run on the polling thread.
    pub async fn run(mut self) {
        debug!(context = %self.name, "loop started");
        while let Some(msg) = self.rx.recv().await {
            match msg {
                Message::Run(job) => self.run_job(job),
                Message::Quit => break,
            }
        }
        debug!(context = %self.name, "loop stopped");
    }

    fn run_job(&self, job: Job) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
            let info = panic_message(payload.as_ref());
            error!(context = %self.name, panic = %info, "job panicked");
        }
    }
}

impl LoopHandle {
    /// Asks the loop to stop once the jobs queued so far have run.
    pub fn quit(&self) {
        let _ = self.tx.send(Message::Quit);
    }

    /// True once the loop has stopped and no longer accepts jobs.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Dispatch for LoopHandle {
    fn dispatch(&self, job: Job) {
        if self.tx.send(Message::Run(job)).is_err() {
            warn!(context = %self.name, "loop closed; job dropped");
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A [`Looper`] running on its own named thread.
///
/// Dropping it asks the loop to quit without waiting; use [`LoopThread::join`]
/// to wait for the thread.
pub struct LoopThread {
    handle: LoopHandle,
    join: Option<JoinHandle<()>>,
}

impl LoopThread {
    /// Spawns a thread called `name` that drives a new loop.
    pub fn spawn(name: impl Into<String>) -> Result<Self, RuntimeError> {
        let name = name.into();
        let (looper, handle) = Looper::new(name.as_str());
        let join = thread::Builder::new()
            .name(name.clone())
            .spawn(move || looper.run_blocking())
            .map_err(|source| RuntimeError::Spawn { name, source })?;
        Ok(Self {
            handle,
            join: Some(join),
        })
    }

    /// Returns a handle for dispatching onto this thread.
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Quits the loop and waits for the thread to exit.
    ///
    /// Calling it from the loop thread itself only quits.
    pub fn join(mut self) {
        self.handle.quit();
        let Some(join) = self.join.take() else {
            return;
        };
        if join.thread().id() == thread::current().id() {
            return;
        }
        if join.join().is_err() {
            warn!(context = %self.handle.name, "loop thread panicked");
        }
    }
}

impl Drop for LoopThread {
    fn drop(&mut self) {
        self.handle.quit();
    }
}
