//! # Task: observable unit of work.
//!
//! A [`Task`] owns a work body, an ordered set of observers and a delivery
//! context selector. [`Task::execute`] hands the body to the runtime's pool;
//! every emit from the body is wrapped into a delivery packet and routed to
//! the context selected at that moment.
//!
//! ## Lifecycle
//! ```text
//! Task::new ─► register_observer / subscribe_on ─► execute()
//!                                                    │ pool.dispatch
//!                                                    ▼
//!                                          Work::run(&Emitter)   (pool thread)
//!                                            ├─► emit_success(v) ─┐
//!                                            ├─► emit_fail(v)     ├─► Delivery
//!                                            └─► emit_complete(v) ┘      │
//!                          CurrentThread: deliver() inline ◄─────────────┤
//!                          Main / Worker: context.dispatch(deliver) ◄────┘
//! ```
//!
//! ## Rules
//! - Observer identity is the allocation; the same instance cannot be present twice.
//! - Registration calls may come from any thread, also from inside callbacks.
//! - The delivery context is read at each emit; changing it never affects
//!   packets already handed out.
//! - `unregister_all()` silences future deliveries; the body keeps running.
//! - Every `execute()` call is an independent run. Calling it twice runs the
//!   body twice and observers hear from both runs.
//! - Panics in the body or in observers are not caught here.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::{debug, trace};

use super::delivery::{Delivery, Signal};
use super::emitter::Emitter;
use super::work::{Work, WorkRef};
use crate::core::Runtime;
use crate::error::ObserverError;
use crate::model::ThreadModel;
use crate::observers::{Observer, ObserverKey, ObserverRef, ObserverSet, WeakObserver};

pub(crate) struct TaskInner<S, F, C> {
    pub(crate) name: Arc<str>,
    work: WorkRef<S, F, C>,
    observers: Arc<ObserverSet<S, F, C>>,
    model: Mutex<ThreadModel>,
    runtime: Runtime,
    submissions: AtomicU64,
}

impl<S, F, C> TaskInner<S, F, C>
where
    S: Send + 'static,
    F: Send + 'static,
    C: Send + 'static,
{
    fn run(&self, execution: u64) {
        debug!(task = %self.name, execution, "task started");
        let emitter = Emitter {
            task: self,
            execution,
        };
        self.work.run(&emitter);
        debug!(task = %self.name, execution, "task finished");
    }

    pub(crate) fn notify(&self, execution: u64, signal: Signal<S, F, C>) {
        let model = self.thread_model();
        let kind = signal.kind();
        let delivery = Delivery {
            task: Arc::clone(&self.name),
            execution,
            signal,
            observers: Arc::clone(&self.observers),
        };

        match self.runtime.context(model) {
            None => {
                delivery.deliver();
            }
            Some(context) => {
                trace!(task = %self.name, %kind, context = context.name(), "posting delivery");
                context.dispatch(Box::new(move || {
                    delivery.deliver();
                }));
            }
        }
    }
}

impl<S, F, C> TaskInner<S, F, C> {
    fn thread_model(&self) -> ThreadModel {
        *self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Observable task handle.
///
/// Cloning is cheap; clones share observers, delivery context and work body.
///
/// # Example
/// ```
/// use std::sync::{Arc, Mutex};
/// use taskcast::{Emitter, Observer, Runtime, Task, ThreadModel, WorkFn};
///
/// #[derive(Default)]
/// struct Seen(Mutex<Vec<String>>);
///
/// impl Observer<i32, String, &'static str> for Seen {
///     fn on_success(&self, v: &i32) { self.0.lock().unwrap().push(v.to_string()); }
///     fn on_fail(&self, e: &String) { self.0.lock().unwrap().push(e.clone()); }
///     fn on_complete(&self, c: &&'static str) { self.0.lock().unwrap().push(c.to_string()); }
/// }
///
/// let task = Task::new(
///     &Runtime::inline(),
///     WorkFn::new("sum", |emit: &Emitter<'_, i32, String, &'static str>| {
///         emit.emit_success(2 + 2);
///         emit.emit_complete("done");
///     }),
/// );
///
/// let seen = Arc::new(Seen::default());
/// task.register_observer(seen.clone())?
///     .subscribe_on(ThreadModel::CurrentThread)
///     .execute();
///
/// assert_eq!(*seen.0.lock().unwrap(), vec!["4", "done"]);
/// # Ok::<(), taskcast::ObserverError>(())
/// ```
pub struct Task<S, F, C> {
    inner: Arc<TaskInner<S, F, C>>,
}

impl<S, F, C> Task<S, F, C>
where
    S: Send + 'static,
    F: Send + 'static,
    C: Send + 'static,
{
    /// Creates a task running `work` on `runtime`.
    ///
    /// The delivery context starts as `runtime.config().default_model`.
    pub fn new(runtime: &Runtime, work: impl Work<S, F, C>) -> Self {
        Self::from_arc(runtime, Arc::new(work))
    }

    /// Creates a task from a shared work body.
    pub fn from_arc(runtime: &Runtime, work: WorkRef<S, F, C>) -> Self {
        let name: Arc<str> = Arc::from(work.name());
        Self {
            inner: Arc::new(TaskInner {
                name,
                work,
                observers: Arc::new(ObserverSet::new()),
                model: Mutex::new(runtime.config().default_model),
                runtime: runtime.clone(),
                submissions: AtomicU64::new(0),
            }),
        }
    }

    /// Registers `observer` at the end of the notification order.
    ///
    /// ### Errors
    /// - [`ObserverError::AlreadyRegistered`] if this instance is already present.
    pub fn register_observer(&self, observer: ObserverRef<S, F, C>) -> Result<&Self, ObserverError> {
        if !self.inner.observers.insert(observer) {
            return Err(self.already_registered());
        }
        trace!(task = %self.inner.name, "observer registered");
        Ok(self)
    }

    /// Registers an observer without keeping it alive.
    ///
    /// Once the observer is dropped it silently stops receiving deliveries.
    ///
    /// ### Errors
    /// - [`ObserverError::InvalidArgument`] if the observer is already gone;
    /// - [`ObserverError::AlreadyRegistered`] if this instance is already present.
    pub fn register_weak_observer(
        &self,
        observer: WeakObserver<S, F, C>,
    ) -> Result<&Self, ObserverError> {
        if observer.strong_count() == 0 {
            return Err(dropped_observer());
        }
        if !self.inner.observers.insert_weak(observer) {
            return Err(self.already_registered());
        }
        trace!(task = %self.inner.name, "weak observer registered");
        Ok(self)
    }

    /// Removes `observer`, however it was registered.
    ///
    /// ### Errors
    /// - [`ObserverError::NotRegistered`] if this instance is not present.
    pub fn unregister_observer<O>(&self, observer: &Arc<O>) -> Result<&Self, ObserverError>
    where
        O: Observer<S, F, C> + ?Sized,
    {
        self.remove(ObserverKey::of(observer))
    }

    /// Removes the observer behind a weak handle.
    ///
    /// ### Errors
    /// - [`ObserverError::InvalidArgument`] if the observer is already gone;
    /// - [`ObserverError::NotRegistered`] if this instance is not present.
    pub fn unregister_weak_observer<O>(&self, observer: &Weak<O>) -> Result<&Self, ObserverError>
    where
        O: Observer<S, F, C> + ?Sized,
    {
        if observer.strong_count() == 0 {
            return Err(dropped_observer());
        }
        self.remove(ObserverKey::of_weak(observer))
    }

    /// Removes every observer. Work already running is not stopped.
    pub fn unregister_all(&self) -> &Self {
        self.inner.observers.clear();
        trace!(task = %self.inner.name, "observers cleared");
        self
    }

    /// Selects the delivery context for emits made from now on.
    pub fn subscribe_on(&self, model: ThreadModel) -> &Self {
        *self
            .inner
            .model
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = model;
        self
    }

    /// Submits one run of the work body to the pool and returns immediately.
    pub fn execute(&self) -> &Self {
        let execution = self.inner.submissions.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(task = %self.inner.name, execution, "task submitted");

        let inner = Arc::clone(&self.inner);
        self.inner
            .runtime
            .pool()
            .dispatch(Box::new(move || inner.run(execution)));
        self
    }

    fn remove(&self, key: ObserverKey) -> Result<&Self, ObserverError> {
        if !self.inner.observers.remove(key) {
            return Err(ObserverError::NotRegistered {
                task: self.inner.name.to_string(),
            });
        }
        trace!(task = %self.inner.name, "observer unregistered");
        Ok(self)
    }

    fn already_registered(&self) -> ObserverError {
        ObserverError::AlreadyRegistered {
            task: self.inner.name.to_string(),
        }
    }
}

impl<S, F, C> Task<S, F, C> {
    /// Returns the task name (taken from [`Work::name`]).
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the delivery context the next emit would use.
    pub fn thread_model(&self) -> ThreadModel {
        self.inner.thread_model()
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    /// True if at least one live observer is registered.
    pub fn has_observers(&self) -> bool {
        self.observer_count() > 0
    }

    /// Returns the runtime this task submits to.
    pub fn runtime(&self) -> &Runtime {
        &self.inner.runtime
    }
}

impl<S, F, C> Clone for Task<S, F, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, F, C> fmt::Debug for Task<S, F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name())
            .field("thread_model", &self.thread_model())
            .field("observers", &self.observer_count())
            .finish()
    }
}

fn dropped_observer() -> ObserverError {
    ObserverError::InvalidArgument {
        reason: "observer has been dropped",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use crate::tasks::WorkFn;

    type Ev = (&'static str, String);

    /// Records every callback as `(observer, "kind:value")`.
    struct Recorder {
        id: &'static str,
        log: Arc<Mutex<Vec<Ev>>>,
    }

    impl Observer<i32, String, &'static str> for Recorder {
        fn on_success(&self, v: &i32) {
            self.log.lock().unwrap().push((self.id, format!("success:{v}")));
        }
        fn on_fail(&self, v: &String) {
            self.log.lock().unwrap().push((self.id, format!("fail:{v}")));
        }
        fn on_complete(&self, v: &&'static str) {
            self.log.lock().unwrap().push((self.id, format!("complete:{v}")));
        }
    }

    fn recorder(id: &'static str, log: &Arc<Mutex<Vec<Ev>>>) -> Arc<Recorder> {
        Arc::new(Recorder {
            id,
            log: Arc::clone(log),
        })
    }

    fn adder() -> Task<i32, String, &'static str> {
        Task::new(
            &Runtime::inline(),
            WorkFn::new("adder", |emit: &Emitter<'_, i32, String, &'static str>| {
                emit.emit_success(2 + 2);
                emit.emit_complete("done");
            }),
        )
    }

    fn entries(log: &Arc<Mutex<Vec<Ev>>>) -> Vec<Ev> {
        log.lock().unwrap().clone()
    }

    fn ev(id: &'static str, what: &str) -> Ev {
        (id, what.to_string())
    }

    #[test]
    fn success_then_complete_exactly_once() {
        let log = Arc::default();
        let task = adder();
        task.register_observer(recorder("a", &log)).unwrap().execute();

        assert_eq!(
            entries(&log),
            vec![ev("a", "success:4"), ev("a", "complete:done")]
        );
    }

    #[test]
    fn duplicate_register_fails() {
        let log = Arc::default();
        let task = adder();
        let a = recorder("a", &log);

        task.register_observer(a.clone()).unwrap();
        let err = task.register_observer(a.clone()).unwrap_err();
        assert!(matches!(err, ObserverError::AlreadyRegistered { ref task } if task == "adder"));

        let err = task.register_weak_observer(Arc::downgrade(&a) as WeakObserver<_, _, _>);
        assert!(matches!(err, Err(ObserverError::AlreadyRegistered { .. })));
        assert_eq!(task.observer_count(), 1);
    }

    #[test]
    fn dropped_observer_is_invalid() {
        let log = Arc::default();
        let task = adder();
        let gone = Arc::downgrade(&recorder("gone", &log));

        let err = task.register_weak_observer(gone.clone()).unwrap_err();
        assert_eq!(err.as_label(), "observer_invalid_argument");
        let err = task.unregister_weak_observer(&gone).unwrap_err();
        assert_eq!(err.as_label(), "observer_invalid_argument");
    }

    #[test]
    fn unregister_absent_fails() {
        let log = Arc::default();
        let task = adder();
        let err = task.unregister_observer(&recorder("a", &log)).unwrap_err();
        assert!(matches!(err, ObserverError::NotRegistered { .. }));
    }

    #[test]
    fn unregister_removes_only_that_instance() {
        let log = Arc::default();
        let task = adder();
        let (a, b) = (recorder("a", &log), recorder("b", &log));
        task.register_observer(a.clone())
            .unwrap()
            .register_observer(b.clone())
            .unwrap()
            .unregister_observer(&a)
            .unwrap()
            .execute();

        assert!(entries(&log).iter().all(|(id, _)| *id == "b"));
        assert!(task.unregister_observer(&a).is_err());
    }

    #[test]
    fn delivers_in_registration_order() {
        let log = Arc::default();
        let task = adder();
        task.register_observer(recorder("a", &log))
            .unwrap()
            .register_observer(recorder("b", &log))
            .unwrap()
            .execute();

        let ids: Vec<_> = entries(&log).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b", "a", "b"]);
    }

    #[test]
    fn unregister_all_silences_deliveries() {
        let log = Arc::default();
        let task = adder();
        task.register_observer(recorder("a", &log))
            .unwrap()
            .register_observer(recorder("b", &log))
            .unwrap()
            .unregister_all()
            .execute();

        assert!(entries(&log).is_empty());
        assert!(!task.has_observers());
    }

    #[test]
    fn execute_twice_notifies_twice() {
        let log = Arc::default();
        let task = adder();
        task.register_observer(recorder("a", &log)).unwrap();
        task.execute().execute();

        let got = entries(&log);
        assert_eq!(got.len(), 4);
        assert_eq!(got.iter().filter(|(_, e)| e == "success:4").count(), 2);
        assert_eq!(got.iter().filter(|(_, e)| e == "complete:done").count(), 2);
    }

    #[test]
    fn execution_ordinal_increments() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let task: Task<(), (), ()> = Task::new(
            &Runtime::inline(),
            WorkFn::new("count", move |emit: &Emitter<'_, (), (), ()>| {
                s.lock().unwrap().push((emit.task_name().to_string(), emit.execution()));
            }),
        );
        task.execute().execute().execute();

        let got = seen.lock().unwrap().clone();
        assert_eq!(
            got,
            vec![
                ("count".to_string(), 1),
                ("count".to_string(), 2),
                ("count".to_string(), 3)
            ]
        );
    }

    #[test]
    fn weak_observer_is_not_kept_alive() {
        let log = Arc::default();
        let task = adder();
        let a = recorder("a", &log);
        task.register_weak_observer(Arc::downgrade(&a) as WeakObserver<_, _, _>)
            .unwrap();
        assert_eq!(task.observer_count(), 1);

        drop(a);
        assert_eq!(task.observer_count(), 0);
        task.execute();
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn weak_registration_can_be_undone_with_strong_handle() {
        let log = Arc::default();
        let task = adder();
        let a = recorder("a", &log);
        task.register_weak_observer(Arc::downgrade(&a) as WeakObserver<_, _, _>)
            .unwrap()
            .unregister_observer(&a)
            .unwrap();
        assert_eq!(task.observer_count(), 0);
    }

    /// Unregisters itself on first success.
    struct OneShot {
        task: Mutex<Option<Task<i32, String, &'static str>>>,
        me: Mutex<Weak<OneShot>>,
        hits: Mutex<u32>,
    }

    impl Observer<i32, String, &'static str> for OneShot {
        fn on_success(&self, _: &i32) {
            *self.hits.lock().unwrap() += 1;
            let task = self.task.lock().unwrap().take();
            let me = self.me.lock().unwrap().upgrade();
            if let (Some(task), Some(me)) = (task, me) {
                task.unregister_observer(&me).unwrap();
            }
        }
        fn on_fail(&self, _: &String) {}
        fn on_complete(&self, _: &&'static str) {}
    }

    #[test]
    fn observer_may_unregister_itself_during_delivery() {
        let task = adder();
        let once = Arc::new(OneShot {
            task: Mutex::new(Some(task.clone())),
            me: Mutex::new(Weak::new()),
            hits: Mutex::new(0),
        });
        *once.me.lock().unwrap() = Arc::downgrade(&once);

        task.register_observer(once.clone()).unwrap();
        task.execute().execute();

        assert_eq!(*once.hits.lock().unwrap(), 1);
        assert!(!task.has_observers());
    }

    struct Explodes;

    impl Observer<i32, String, &'static str> for Explodes {
        fn on_success(&self, _: &i32) {
            panic!("observer failed");
        }
        fn on_fail(&self, _: &String) {}
        fn on_complete(&self, _: &&'static str) {}
    }

    #[test]
    fn panicking_observer_stops_the_fan_out() {
        let log = Arc::default();
        let task = adder();
        task.register_observer(recorder("a", &log))
            .unwrap()
            .register_observer(Arc::new(Explodes))
            .unwrap()
            .register_observer(recorder("c", &log))
            .unwrap();

        let res = catch_unwind(AssertUnwindSafe(|| {
            task.execute();
        }));
        assert!(res.is_err());
        assert_eq!(entries(&log), vec![ev("a", "success:4")]);
    }

    #[test]
    fn subscribe_on_is_read_per_emit() {
        let task = adder();
        assert_eq!(task.thread_model(), ThreadModel::CurrentThread);
        task.subscribe_on(ThreadModel::Main);
        assert_eq!(task.thread_model(), ThreadModel::Main);
        let copy = task.clone();
        copy.subscribe_on(ThreadModel::Worker);
        assert_eq!(task.thread_model(), ThreadModel::Worker);
    }

    #[test]
    fn debug_shows_state() {
        let task = adder();
        let out = format!("{task:?}");
        assert!(out.contains("adder"));
        assert!(out.contains("CurrentThread"));
    }
}
