//! # ObserverSet: identity-keyed, ordered observer registry
//!
//! [`ObserverSet`] stores the observers of one task, in registration order,
//! keyed by the address of the observer allocation (not by value).
//!
//! ## What it guarantees
//! - No instance is present twice, whether registered strongly or weakly.
//! - `insert`/`remove`/`clear`/`snapshot` are atomic with respect to each other.
//! - Iteration order is registration order.
//!
//! ## Snapshot policy
//! Fan-out never iterates under the lock. [`ObserverSet::snapshot`] clones the
//! live observers while locked and releases the lock before any callback runs,
//! so callbacks may register or unregister (themselves included) freely.
//! A mutation that completes before the snapshot is visible to that delivery;
//! anything later applies to the next one.
//!
//! ## Diagram
//! ```text
//!   deliver()
//!      │  lock ─► upgrade/prune ─► clone Arcs ─► unlock
//!      ▼
//!   [A, B, C] ─► A.on_*() ─► B.on_*() ─► C.on_*()
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::observer::{ObserverRef, WeakObserver};

/// Identity of an observer allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ObserverKey(usize);

impl ObserverKey {
    pub(crate) fn of<T: ?Sized>(observer: &Arc<T>) -> Self {
        Self(Arc::as_ptr(observer) as *const () as usize)
    }

    pub(crate) fn of_weak<T: ?Sized>(observer: &Weak<T>) -> Self {
        Self(Weak::as_ptr(observer) as *const () as usize)
    }
}

enum Slot<S, F, C> {
    Strong(ObserverRef<S, F, C>),
    Weak(WeakObserver<S, F, C>),
}

impl<S, F, C> Slot<S, F, C> {
    fn key(&self) -> ObserverKey {
        match self {
            Slot::Strong(o) => ObserverKey::of(o),
            Slot::Weak(w) => ObserverKey::of_weak(w),
        }
    }

    fn upgrade(&self) -> Option<ObserverRef<S, F, C>> {
        match self {
            Slot::Strong(o) => Some(Arc::clone(o)),
            Slot::Weak(w) => w.upgrade(),
        }
    }

    fn is_alive(&self) -> bool {
        match self {
            Slot::Strong(_) => true,
            Slot::Weak(w) => w.strong_count() > 0,
        }
    }
}

/// Ordered set of observers owned by one task.
pub(crate) struct ObserverSet<S, F, C> {
    slots: Mutex<Vec<Slot<S, F, C>>>,
}

impl<S, F, C> ObserverSet<S, F, C> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Mutex::new(Vec::new()),
        }
    }

    /// Appends a strong observer. Returns `false` if the instance is present.
    pub(crate) fn insert(&self, observer: ObserverRef<S, F, C>) -> bool {
        self.insert_slot(Slot::Strong(observer))
    }

    /// Appends a weak observer. Returns `false` if the instance is present.
    pub(crate) fn insert_weak(&self, observer: WeakObserver<S, F, C>) -> bool {
        self.insert_slot(Slot::Weak(observer))
    }

    /// Removes the instance with `key`. Returns `false` if absent.
    pub(crate) fn remove(&self, key: ObserverKey) -> bool {
        let mut slots = self.lock();
        match slots.iter().position(|s| s.key() == key) {
            Some(idx) => {
                slots.remove(idx);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&self) {
        self.lock().clear();
    }

    /// Clones the live observers in registration order, dropping dead weak entries.
    pub(crate) fn snapshot(&self) -> Vec<ObserverRef<S, F, C>> {
        let mut slots = self.lock();
        slots.retain(Slot::is_alive);
        slots.iter().filter_map(Slot::upgrade).collect()
    }

    /// Number of live observers.
    pub(crate) fn len(&self) -> usize {
        self.lock().iter().filter(|s| s.is_alive()).count()
    }

    fn insert_slot(&self, slot: Slot<S, F, C>) -> bool {
        let key = slot.key();
        let mut slots = self.lock();
        if slots.iter().any(|s| s.key() == key) {
            return false;
        }
        slots.push(slot);
        true
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Slot<S, F, C>>> {
        // Callbacks never run under this lock; a poisoned guard still holds a valid Vec.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
