//! # Tasks and work bodies.
//!
//! This module provides the task-related types:
//! - [`Task`] - observable handle: observers, delivery context, submission
//! - [`Work`] - trait for the code a task runs
//! - [`WorkFn`] - closure-backed work body
//! - [`Emitter`] - emit hooks passed to [`Work::run`]

mod delivery;
mod emitter;
mod task;
mod work;

pub use emitter::Emitter;
pub use task::Task;
pub use work::{Work, WorkFn, WorkRef};
