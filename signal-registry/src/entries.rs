//! Association list of weakly-held observers keyed by id
//!
//! Shared storage behind [`Subject`](crate::Subject) and
//! [`KeyedSubject`](crate::KeyedSubject). Not synchronized itself; the
//! owning subject wraps it in a mutex.

use std::sync::{Arc, Weak};

use crate::id::Id;
use crate::observer::{Observer, WeakObserver};

pub(crate) struct Entries<E: 'static, P: 'static> {
    /// Attach order is preserved; ids are unique
    slots: Vec<(Id, WeakObserver<E, P>)>,
}

impl<E: 'static, P: 'static> Entries<E, P> {
    pub(crate) fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Insert or replace the entry for `id`, returning true if it was new
    pub(crate) fn upsert(&mut self, id: Id, observer: WeakObserver<E, P>) -> bool {
        match self.slots.iter_mut().find(|(slot_id, _)| *slot_id == id) {
            Some(slot) => {
                slot.1 = observer;
                false
            }
            None => {
                self.slots.push((id, observer));
                true
            }
        }
    }

    pub(crate) fn remove(&mut self, id: Id) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(slot_id, _)| *slot_id != id);
        self.slots.len() != before
    }

    /// Remove the entry pointing at the same allocation as `target`
    pub(crate) fn remove_same(&mut self, target: &WeakObserver<E, P>) -> Option<Id> {
        let index = self
            .slots
            .iter()
            .position(|(_, weak)| Weak::ptr_eq(weak, target))?;
        Some(self.slots.remove(index).0)
    }

    pub(crate) fn clear(&mut self) -> usize {
        let count = self.slots.len();
        self.slots.clear();
        count
    }

    pub(crate) fn contains(&self, id: Id) -> bool {
        self.slots.iter().any(|(slot_id, _)| *slot_id == id)
    }

    pub(crate) fn ids(&self) -> Vec<Id> {
        self.slots.iter().map(|(id, _)| *id).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }

    /// Drop expired entries, returning the ids that were removed
    pub(crate) fn prune(&mut self) -> Vec<Id> {
        let mut removed = Vec::new();
        self.slots.retain(|(id, weak)| {
            let alive = weak.strong_count() > 0;
            if !alive {
                removed.push(*id);
            }
            alive
        });
        removed
    }

    /// Resolve the live observers matching `filter`, in attach order
    ///
    /// Upgrading is the atomic liveness check: an observer whose last strong
    /// reference is being dropped concurrently yields `None` and is skipped.
    pub(crate) fn resolve<F>(&self, mut filter: F) -> Vec<Arc<dyn Observer<E, P>>>
    where
        F: FnMut(Id) -> bool,
    {
        self.slots
            .iter()
            .filter(|(id, _)| filter(*id))
            .filter_map(|(id, weak)| {
                let observer = weak.upgrade();
                if observer.is_none() {
                    tracing::trace!("Skipping expired observer {}", id);
                }
                observer
            })
            .collect()
    }
}

/// Call `update` on every resolved observer
///
/// Runs with no subject lock held. The snapshot owns strong references, so
/// an observer whose last owner let go meanwhile is dropped here, after
/// delivery and outside the lock.
pub(crate) fn deliver<E, P>(
    snapshot: Vec<Arc<dyn Observer<E, P>>>,
    event: &E,
    payload: &P,
) -> usize
where
    E: 'static,
    P: 'static,
{
    for observer in &snapshot {
        observer.update(event, payload);
    }
    snapshot.len()
}
