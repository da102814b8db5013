//! # Dispatch capability shared by every execution context.
//!
//! A [`Dispatch`] accepts a unit of work ([`Job`]) and guarantees it eventually
//! runs on the context it stands for. The worker pool, the main loop and the
//! named-worker loop all implement it, so a [`Runtime`](crate::Runtime) can be
//! wired with real threads in production and with [`Inline`] in tests.

use std::any::Any;
use std::sync::Arc;

/// A unit of work handed to a context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Shared handle to a context.
pub type DispatchRef = Arc<dyn Dispatch>;

/// An execution context that runs [`Job`]s.
///
/// ### Implementation requirements
/// - `dispatch` must not wait for the job to finish (except [`Inline`]).
/// - Jobs from a single submitter should run in submission order.
/// - What happens when a job panics is the context's own policy.
pub trait Dispatch: Send + Sync + 'static {
    /// Hands `job` to the context.
    fn dispatch(&self, job: Job);

    /// Returns the context name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Runs every job immediately on the calling thread.
///
/// Panics unwind straight into the caller of [`Dispatch::dispatch`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Inline;

impl Dispatch for Inline {
    fn dispatch(&self, job: Job) {
        job();
    }

    fn name(&self) -> &str {
        "inline"
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
