//! Error types used by tasks and the runtime.
//!
//! This module defines two enums:
//!
//! - [`ObserverError`]: misuse of a task's observer registration surface.
//! - [`RuntimeError`]: failures while wiring the delivery contexts.
//!
//! Both provide `as_label` / `as_message` helpers for logs.

use thiserror::Error;

/// # Errors returned by observer registration.
///
/// All of them signal programmer misuse and are reported synchronously at the
/// call site. Nothing retries them.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObserverError {
    /// The observer handle does not point at a live observer.
    #[error("invalid observer: {reason}")]
    InvalidArgument {
        /// Why the handle was rejected.
        reason: &'static str,
    },

    /// The same observer instance is already registered with the task.
    #[error("observer is already registered with task {task:?}")]
    AlreadyRegistered {
        /// Name of the task.
        task: String,
    },

    /// The observer instance is not registered with the task.
    #[error("observer is not registered with task {task:?}")]
    NotRegistered {
        /// Name of the task.
        task: String,
    },
}

impl ObserverError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use taskcast::ObserverError;
    ///
    /// let err = ObserverError::NotRegistered { task: "fetch".into() };
    /// assert_eq!(err.as_label(), "observer_not_registered");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ObserverError::InvalidArgument { .. } => "observer_invalid_argument",
            ObserverError::AlreadyRegistered { .. } => "observer_already_registered",
            ObserverError::NotRegistered { .. } => "observer_not_registered",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ObserverError::InvalidArgument { reason } => format!("invalid argument: {reason}"),
            ObserverError::AlreadyRegistered { task } => format!("already registered: task={task}"),
            ObserverError::NotRegistered { task } => format!("not registered: task={task}"),
        }
    }
}

/// # Errors produced while building a [`Runtime`](crate::Runtime).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A default worker pool was requested outside of a tokio runtime.
    #[error("no tokio runtime available for the default worker pool")]
    NoAsyncRuntime,

    /// A loop thread could not be spawned.
    #[error("failed to spawn loop thread {name:?}: {source}")]
    Spawn {
        /// Requested thread name.
        name: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use taskcast::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::NoAsyncRuntime.as_label(), "runtime_no_async_runtime");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::NoAsyncRuntime => "runtime_no_async_runtime",
            RuntimeError::Spawn { .. } => "runtime_spawn_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::NoAsyncRuntime => "no tokio runtime".to_string(),
            RuntimeError::Spawn { name, source } => format!("spawn {name}: {source}"),
        }
    }
}
