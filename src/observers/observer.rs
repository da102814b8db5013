//! # Observer trait.
//!
//! Provides [`Observer`], the three-callback capability a task notifies.
//!
//! ## Rules
//! - Callbacks run on the task's delivery context at the time of the emit
//!   (see [`ThreadModel`](crate::ThreadModel)).
//! - Every observer receives a borrow of the same value; no `Clone` needed.
//! - A panicking callback is not isolated: later observers of the same emit
//!   are skipped and the panic belongs to the running context.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskcast::{Observer, ObserverRef};
//!
//! struct Printer;
//!
//! impl Observer<u32, String, ()> for Printer {
//!     fn on_success(&self, data: &u32) { println!("got {data}"); }
//!     fn on_fail(&self, err: &String) { eprintln!("failed: {err}"); }
//!     fn on_complete(&self, _: &()) { println!("done"); }
//! }
//!
//! let observer: ObserverRef<u32, String, ()> = Arc::new(Printer);
//! # let _ = observer;
//! ```

use std::sync::{Arc, Weak};

/// Receives the results of a task.
///
/// Type parameters:
/// - `S`: success payload
/// - `F`: failure payload
/// - `C`: completion payload
pub trait Observer<S, F, C>: Send + Sync + 'static {
    /// Called for every [`Emitter::emit_success`](crate::Emitter::emit_success).
    fn on_success(&self, data: &S);

    /// Called for every [`Emitter::emit_fail`](crate::Emitter::emit_fail).
    fn on_fail(&self, data: &F);

    /// Called for every [`Emitter::emit_complete`](crate::Emitter::emit_complete).
    fn on_complete(&self, data: &C);
}

/// Shared observer handle; identity is the allocation.
pub type ObserverRef<S, F, C> = Arc<dyn Observer<S, F, C>>;

/// Non-owning observer handle.
pub type WeakObserver<S, F, C> = Weak<dyn Observer<S, F, C>>;
