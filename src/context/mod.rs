//! # Execution contexts.
//!
//! Everything a task hands work to implements [`Dispatch`]:
//! - [`WorkerPool`] - bounded pool that runs work bodies;
//! - [`LoopHandle`] - sending side of a [`Looper`], used for the main and
//!   named-worker delivery contexts ([`LoopThread`] owns one on its own thread);
//! - [`Inline`] - runs on the calling thread (test stand-in).

mod dispatch;
mod looper;
mod pool;

pub use dispatch::{Dispatch, DispatchRef, Inline, Job};
pub use looper::{LoopHandle, LoopThread, Looper};
pub use pool::WorkerPool;
