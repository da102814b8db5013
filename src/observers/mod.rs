//! # Observers of task results.
//!
//! This module provides the [`Observer`] trait, the per-task registry that
//! stores observers, and (with the `logging` feature) a reference [`LogObserver`].
//!
//! ## Architecture
//! ```text
//! Work::run ── emit_*(value) ──► Delivery ──► context.dispatch()
//!                                                  │
//!                                   ObserverSet::snapshot()
//!                                     ┌────────────┼────────────┐
//!                                     ▼            ▼            ▼
//!                                A.on_*(&v)   B.on_*(&v)   C.on_*(&v)
//! ```

#[cfg(feature = "logging")]
mod log;
mod observer;
mod set;

#[cfg(feature = "logging")]
pub use log::LogObserver;
pub use observer::{Observer, ObserverRef, WeakObserver};
pub(crate) use set::{ObserverKey, ObserverSet};
