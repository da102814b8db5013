//! # Runtime: the collaborators a task talks to.
//!
//! A [`Runtime`] bundles the worker pool and the two delivery contexts behind
//! [`Dispatch`], plus the [`Config`] used to create tasks. It is cheap to
//! clone; every task keeps one.
//!
//! ## Architecture
//! ```text
//!                  ┌───────────── Runtime ─────────────┐
//! Task::execute ──►│ pool   (WorkerPool, N workers)    │
//! emit (Main)   ──►│ main   (main/UI loop)             │
//! emit (Worker) ──►│ worker (named work-loop thread)   │
//!                  └───────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - `ThreadModel::CurrentThread` has no context; delivery runs inline.
//! - Loop threads spawned by [`RuntimeBuilder::build`] are owned by the
//!   runtime and stopped by [`Runtime::shutdown`].

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::builder::RuntimeBuilder;
use crate::config::Config;
use crate::context::{DispatchRef, Inline, LoopThread};
use crate::model::ThreadModel;

pub(crate) struct RuntimeInner {
    pub(crate) cfg: Config,
    pub(crate) pool: DispatchRef,
    pub(crate) main: DispatchRef,
    pub(crate) worker: DispatchRef,
    pub(crate) threads: Mutex<Vec<LoopThread>>,
}

/// Shared bundle of execution contexts.
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

impl Runtime {
    /// Starts building a runtime with the given configuration.
    pub fn builder(cfg: Config) -> RuntimeBuilder {
        RuntimeBuilder::new(cfg)
    }

    /// A runtime where the pool and both loops run jobs on the calling thread.
    ///
    /// `Task::execute` then runs the work body, and every delivery, before it
    /// returns. Meant for tests.
    pub fn inline() -> Self {
        Self::from_inner(RuntimeInner {
            cfg: Config::default(),
            pool: Arc::new(Inline),
            main: Arc::new(Inline),
            worker: Arc::new(Inline),
            threads: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn from_inner(inner: RuntimeInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.inner.cfg
    }

    /// Returns the pool that runs work bodies.
    pub fn pool(&self) -> &DispatchRef {
        &self.inner.pool
    }

    /// Returns the context that delivers for `model`, or `None` for inline delivery.
    pub fn context(&self, model: ThreadModel) -> Option<&DispatchRef> {
        match model {
            ThreadModel::CurrentThread => None,
            ThreadModel::Main => Some(&self.inner.main),
            ThreadModel::Worker => Some(&self.inner.worker),
        }
    }

    /// Stops the loop threads this runtime spawned and waits for them.
    ///
    /// Jobs already queued on those loops still run; later dispatches are
    /// dropped. Supplied dispatchers are left alone.
    pub fn shutdown(&self) {
        let threads = std::mem::take(
            &mut *self
                .inner
                .threads
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        debug!(threads = threads.len(), "runtime shutdown");
        for t in threads {
            t.join();
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("pool", &self.inner.pool.name())
            .field("main", &self.inner.main.name())
            .field("worker", &self.inner.worker.name())
            .finish()
    }
}
