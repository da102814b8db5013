use super::delivery::Signal;
use super::task::TaskInner;

/// Emit hooks handed to [`Work::run`](crate::Work::run).
///
/// Each call builds one delivery packet and routes it through the task's
/// delivery context as configured *at the time of the call*. With
/// [`ThreadModel::CurrentThread`](crate::ThreadModel::CurrentThread) the
/// observers have run by the time the call returns; otherwise they run later
/// on their context.
pub struct Emitter<'a, S, F, C> {
    pub(crate) task: &'a TaskInner<S, F, C>,
    pub(crate) execution: u64,
}

impl<S, F, C> Emitter<'_, S, F, C>
where
    S: Send + 'static,
    F: Send + 'static,
    C: Send + 'static,
{
    /// Delivers `data` to every observer's `on_success`.
    pub fn emit_success(&self, data: S) {
        self.task.notify(self.execution, Signal::Success(data));
    }

    /// Delivers `data` to every observer's `on_fail`.
    pub fn emit_fail(&self, data: F) {
        self.task.notify(self.execution, Signal::Fail(data));
    }

    /// Delivers `data` to every observer's `on_complete`.
    pub fn emit_complete(&self, data: C) {
        self.task.notify(self.execution, Signal::Complete(data));
    }
}

impl<S, F, C> Emitter<'_, S, F, C> {
    /// Name of the task this run belongs to.
    pub fn task_name(&self) -> &str {
        &self.task.name
    }

    /// 1-based number of the `execute()` call that started this run.
    pub fn execution(&self) -> u64 {
        self.execution
    }
}
