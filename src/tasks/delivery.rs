//! # Delivery packets.
//!
//! One [`Delivery`] is built per emit. It carries the value and its kind,
//! travels to the delivery context, and fans out there exactly once.
//!
//! ## Rules
//! - The observer set is snapshotted when the packet runs, not when it is built.
//! - Observers are called in registration order with a borrow of the value.
//! - A panicking observer aborts the rest of the fan-out (not caught here).

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::observers::ObserverSet;

/// Which callback a signal maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignalKind {
    Success,
    Fail,
    Complete,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignalKind::Success => "success",
            SignalKind::Fail => "fail",
            SignalKind::Complete => "complete",
        })
    }
}

/// A typed value emitted by a work body.
pub(crate) enum Signal<S, F, C> {
    Success(S),
    Fail(F),
    Complete(C),
}

impl<S, F, C> Signal<S, F, C> {
    pub(crate) fn kind(&self) -> SignalKind {
        match self {
            Signal::Success(_) => SignalKind::Success,
            Signal::Fail(_) => SignalKind::Fail,
            Signal::Complete(_) => SignalKind::Complete,
        }
    }
}

/// Ephemeral packet handed to a delivery context.
pub(crate) struct Delivery<S, F, C> {
    pub(crate) task: Arc<str>,
    pub(crate) execution: u64,
    pub(crate) signal: Signal<S, F, C>,
    pub(crate) observers: Arc<ObserverSet<S, F, C>>,
}

impl<S: 'static, F: 'static, C: 'static> Delivery<S, F, C> {
    /// Fans the signal out to the observers present now; returns how many were called.
    pub(crate) fn deliver(self) -> usize {
        let observers = self.observers.snapshot();
        let kind = self.signal.kind();
        debug!(
            task = %self.task,
            execution = self.execution,
            %kind,
            observers = observers.len(),
            "delivering"
        );

        for (idx, observer) in observers.iter().enumerate() {
            trace!(task = %self.task, %kind, observer = idx, "notify");
            match &self.signal {
                Signal::Success(v) => observer.on_success(v),
                Signal::Fail(v) => observer.on_fail(v),
                Signal::Complete(v) => observer.on_complete(v),
            }
        }
        observers.len()
    }
}
