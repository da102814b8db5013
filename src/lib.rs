//! # taskcast
//!
//! **Taskcast** runs a unit of work on a bounded worker pool and hands its
//! typed results to a set of observers, on an execution context the caller
//! picks per task.
//!
//! A task is fire-and-observe: [`Task::execute`] returns at once, the work
//! body reports through emit hooks, and every emit fans out to the registered
//! observers in registration order.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller thread                   pool thread                 delivery context
//!  ──────────────                  ─────────────               ──────────────────
//!  Task::execute() ──dispatch──►  Work::run(&Emitter)
//!     (returns)                     │ emit_success(v)
//!                                   ├─ CurrentThread ──► deliver()  (same pool thread)
//!                                   ├─ Main          ──► main loop  ──► deliver()
//!                                   └─ Worker        ──► work loop  ──► deliver()
//!
//!  deliver(): snapshot observers ─► o1.on_success(&v) ─► o2.on_success(&v) ─► ...
//! ```
//!
//! ### Collaborators
//! ```text
//! ┌──────────────────────────── Runtime ────────────────────────────┐
//! │  pool   : WorkerPool  (tokio blocking pool, N permits)          │
//! │  main   : LoopHandle  ("main-loop" thread, or a caller's loop)  │
//! │  worker : LoopHandle  ("work-loop" thread)                      │
//! └─────────────────────────────────────────────────────────────────┘
//!   every slot is an Arc<dyn Dispatch>; Runtime::inline() uses Inline
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                        |
//! |-------------------|--------------------------------------------------------------|-------------------------------------------|
//! | **Tasks**         | Observable work units, fluent registration and submission.   | [`Task`], [`Work`], [`WorkFn`]            |
//! | **Observers**     | Typed success / fail / complete callbacks, strong or weak.    | [`Observer`], [`ObserverRef`]             |
//! | **Contexts**      | Where work runs and where deliveries land.                   | [`ThreadModel`], [`Dispatch`], [`Looper`] |
//! | **Runtime**       | Bundles the pool and both loops.                             | [`Runtime`], [`RuntimeBuilder`]           |
//! | **Errors**        | Typed registration and runtime errors.                       | [`ObserverError`], [`RuntimeError`]       |
//! | **Configuration** | Pool size, loop names, default delivery context.             | [`Config`]                                |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogObserver`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskcast::{Config, Emitter, Observer, Runtime, Task, ThreadModel, WorkFn};
//!
//! struct Print;
//!
//! impl Observer<u64, String, ()> for Print {
//!     fn on_success(&self, v: &u64) { println!("result: {v}"); }
//!     fn on_fail(&self, e: &String) { println!("failed: {e}"); }
//!     fn on_complete(&self, _: &()) { println!("complete"); }
//! }
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rt = Runtime::builder(Config::default()).build()?;
//!
//!     let task = Task::new(
//!         &rt,
//!         WorkFn::new("fib", |emit: &Emitter<'_, u64, String, ()>| {
//!             let (mut a, mut b) = (0u64, 1u64);
//!             for _ in 0..50 {
//!                 (a, b) = (b, a + b);
//!             }
//!             emit.emit_success(a);
//!             emit.emit_complete(());
//!         }),
//!     );
//!
//!     task.register_observer(Arc::new(Print))?
//!         .subscribe_on(ThreadModel::Worker)
//!         .execute();
//!
//!     tokio::time::sleep(std::time::Duration::from_millis(50)).await;
//!     rt.shutdown();
//!     Ok(())
//! }
//! ```
mod config;
mod context;
mod core;
mod error;
mod model;
mod observers;
mod tasks;

// ---- Public re-exports ----

pub use config::Config;
pub use context::{Dispatch, DispatchRef, Inline, Job, LoopHandle, LoopThread, Looper, WorkerPool};
pub use core::{Runtime, RuntimeBuilder};
pub use error::{ObserverError, RuntimeError};
pub use model::ThreadModel;
pub use observers::{Observer, ObserverRef, WeakObserver};
pub use tasks::{Emitter, Task, Work, WorkFn, WorkRef};

// Optional: expose a simple built-in logging observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogObserver;
