//! # Example: main_loop
//!
//! Drives the main delivery context on the program's own main thread, the way
//! a UI event loop would, and logs every signal through [`LogObserver`].
//!
//! ## Flow
//! ```text
//! main thread ──► Looper::run_blocking() ◄── LoopHandle (Runtime main context)
//!                                                 ▲
//! pool thread ──► Work::run ──► emit_*(..) ───────┘  (ThreadModel::Main)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example main_loop --features logging
//! ```

use std::sync::Arc;

use taskcast::{
    Config, Emitter, LogObserver, LoopHandle, Looper, Observer, Runtime, Task, ThreadModel,
    WorkFn, WorkerPool,
};
use tracing_subscriber::EnvFilter;

type Out<'a> = Emitter<'a, usize, String, ()>;

/// Stops the main loop once the task reports completion.
struct QuitOnComplete(LoopHandle);

impl Observer<usize, String, ()> for QuitOnComplete {
    fn on_success(&self, _: &usize) {}
    fn on_fail(&self, _: &String) {}
    fn on_complete(&self, _: &()) {
        self.0.quit();
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = Config::default();
    let tokio_rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let (looper, main) = Looper::new(cfg.main_loop_name.clone());

    let rt = Runtime::builder(cfg.clone())
        .with_pool(Arc::new(WorkerPool::new(
            tokio_rt.handle().clone(),
            cfg.pool_size_clamped(),
        )))
        .with_main(Arc::new(main.clone()))
        .build()?;

    let words = "the quick brown fox jumps over the lazy dog";
    let task = Task::new(
        &rt,
        WorkFn::new("word-count", move |emit: &Out<'_>| {
            match words.split_whitespace().count() {
                0 => emit.emit_fail("empty input".to_string()),
                n => emit.emit_success(n),
            }
            emit.emit_complete(());
        }),
    );

    task.register_observer(Arc::new(LogObserver::new("word-count")))?
        .register_observer(Arc::new(QuitOnComplete(main.clone())))?
        .subscribe_on(ThreadModel::Main)
        .execute();

    // Deliveries run here, on the main thread, until the observer quits the loop.
    println!("driving {} on the main thread", looper.name());
    looper.run_blocking();
    println!("main loop closed: {}", main.is_closed());

    rt.shutdown();
    Ok(())
}
