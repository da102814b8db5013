use std::sync::{Arc, Mutex};

use tracing::debug;

use super::runtime::{Runtime, RuntimeInner};
use crate::config::Config;
use crate::context::{DispatchRef, LoopThread, WorkerPool};
use crate::error::RuntimeError;

/// Builder for constructing a [`Runtime`] with optional collaborators.
pub struct RuntimeBuilder {
    cfg: Config,
    pool: Option<DispatchRef>,
    main: Option<DispatchRef>,
    worker: Option<DispatchRef>,
}

impl RuntimeBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            pool: None,
            main: None,
            worker: None,
        }
    }

    /// Sets the pool that runs work bodies.
    ///
    /// Default: [`WorkerPool::current`] with `cfg.pool_size`.
    pub fn with_pool(mut self, pool: DispatchRef) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Sets the main/UI delivery context.
    ///
    /// Usually a [`LoopHandle`](crate::LoopHandle) whose [`Looper`](crate::Looper)
    /// the application drives on its main thread. Default: a loop thread named
    /// `cfg.main_loop_name`.
    pub fn with_main(mut self, main: DispatchRef) -> Self {
        self.main = Some(main);
        self
    }

    /// Sets the named-worker delivery context.
    ///
    /// Default: a loop thread named `cfg.worker_loop_name`.
    pub fn with_worker(mut self, worker: DispatchRef) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Builds the runtime, spawning whatever was not supplied.
    ///
    /// ### Errors
    /// - [`RuntimeError::NoAsyncRuntime`] if the default pool is needed outside
    ///   a tokio runtime;
    /// - [`RuntimeError::Spawn`] if a loop thread cannot be started.
    pub fn build(self) -> Result<Runtime, RuntimeError> {
        let mut threads = Vec::new();

        let pool = match self.pool {
            Some(pool) => pool,
            None => Arc::new(WorkerPool::current(self.cfg.pool_size_clamped())?),
        };
        let main = match self.main {
            Some(main) => main,
            None => spawn_loop(&self.cfg.main_loop_name, &mut threads)?,
        };
        let worker = match self.worker {
            Some(worker) => worker,
            None => spawn_loop(&self.cfg.worker_loop_name, &mut threads)?,
        };

        debug!(
            pool = pool.name(),
            main = main.name(),
            worker = worker.name(),
            "runtime built"
        );
        Ok(Runtime::from_inner(RuntimeInner {
            cfg: self.cfg,
            pool,
            main,
            worker,
            threads: Mutex::new(threads),
        }))
    }
}

fn spawn_loop(name: &str, threads: &mut Vec<LoopThread>) -> Result<DispatchRef, RuntimeError> {
    let thread = LoopThread::spawn(name)?;
    let handle: DispatchRef = Arc::new(thread.handle());
    threads.push(thread);
    Ok(handle)
}
