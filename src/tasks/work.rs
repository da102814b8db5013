//! # Work bodies.
//!
//! This module defines the [`Work`] trait, the code a [`Task`](crate::Task)
//! runs on the pool, and a closure-backed implementation [`WorkFn`].
//!
//! A work body receives an [`Emitter`] and reports its results through it;
//! the emit hooks exist nowhere else.

use std::borrow::Cow;
use std::sync::Arc;

use super::emitter::Emitter;

/// # Unit of work executed by a task.
///
/// # Example
/// ```
/// use taskcast::{Emitter, Runtime, Task, Work};
///
/// struct Add(i32, i32);
///
/// impl Work<i32, String, &'static str> for Add {
///     fn name(&self) -> &str { "add" }
///
///     fn run(&self, emit: &Emitter<'_, i32, String, &'static str>) {
///         match self.0.checked_add(self.1) {
///             Some(sum) => emit.emit_success(sum),
///             None => emit.emit_fail("overflow".into()),
///         }
///         emit.emit_complete("done");
///     }
/// }
///
/// let task = Task::new(&Runtime::inline(), Add(2, 2));
/// task.execute();
/// ```
pub trait Work<S, F, C>: Send + Sync + 'static {
    /// Returns a stable, human-readable name used in logs and errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Runs once per [`Task::execute`](crate::Task::execute), on a pool worker.
    ///
    /// A panic here is not caught by the task; it belongs to the pool.
    fn run(&self, emit: &Emitter<'_, S, F, C>);
}

/// Shared handle to a work body.
pub type WorkRef<S, F, C> = Arc<dyn Work<S, F, C>>;

/// Function-backed work body.
///
/// ## Example
/// ```rust
/// use taskcast::{Emitter, Runtime, Task, WorkFn};
///
/// let work = WorkFn::new("answer", |emit: &Emitter<'_, u8, (), ()>| {
///     emit.emit_success(42);
/// });
/// let task = Task::new(&Runtime::inline(), work);
/// assert_eq!(task.name(), "answer");
/// ```
#[derive(Debug)]
pub struct WorkFn<Fun> {
    name: Cow<'static, str>,
    f: Fun,
}

impl<Fun> WorkFn<Fun> {
    /// Wraps `f` as a work body called `name`.
    pub fn new<S, F, C>(name: impl Into<Cow<'static, str>>, f: Fun) -> Self
    where
        Fun: Fn(&Emitter<'_, S, F, C>) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Same as [`WorkFn::new`], returned as a shared handle.
    pub fn arc<S, F, C>(name: impl Into<Cow<'static, str>>, f: Fun) -> Arc<Self>
    where
        Fun: Fn(&Emitter<'_, S, F, C>) + Send + Sync + 'static,
    {
        Arc::new(Self::new(name, f))
    }
}

impl<S, F, C, Fun> Work<S, F, C> for WorkFn<Fun>
where
    Fun: Fn(&Emitter<'_, S, F, C>) + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, emit: &Emitter<'_, S, F, C>) {
        (self.f)(emit)
    }
}
