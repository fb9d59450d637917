//! Id-keyed subject
//!
//! A [`Subject`] maps observer ids to weak references. `notify` targets the
//! single observer registered under an id; `notify_all` broadcasts.
//!
//! Registry operations take the subject's mutex for their whole duration.
//! A notify resolves its targets under the mutex in one step, then releases
//! it before calling any observer, so it sees the registry either before or
//! after a concurrent attach/detach and never a half-applied one. Observers
//! may therefore attach to, detach from or notify the same subject from
//! inside `update`.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::entries::{self, Entries};
use crate::id::Id;
use crate::observer::{Observer, WeakObserver};

/// Registry of weakly-held observers addressed by id
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use signal_registry::{Id, Identified, Observer, Subject};
///
/// struct Counter { id: Id, hits: AtomicUsize }
///
/// impl Identified for Counter {
///     fn id(&self) -> Id { self.id }
/// }
///
/// impl Observer<u8> for Counter {
///     fn update(&self, _event: &u8, _payload: &()) {
///         self.hits.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let subject = Subject::<u8>::new();
/// let counter = Arc::new(Counter { id: Id::new(5), hits: AtomicUsize::new(0) });
/// subject.attach_arc(&counter);
///
/// assert_eq!(subject.notify_event(Id::new(5), &1), 1);
/// assert_eq!(subject.notify_event(Id::new(6), &1), 0);
///
/// drop(counter);
/// assert_eq!(subject.notify_all_event(&1), 0);
/// ```
pub struct Subject<E: 'static, P: 'static = ()> {
    observers: Mutex<Entries<E, P>>,
}

impl<E: 'static, P: 'static> Subject<E, P> {
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Entries::new()),
        }
    }

    /// Register an observer under its current id
    ///
    /// Does nothing (and returns false) if the observer has already been
    /// dropped. Attaching a second observer with the same id replaces the
    /// first one in place.
    pub fn attach(&self, observer: &WeakObserver<E, P>) -> bool {
        let Some(id) = observer.upgrade().map(|live| live.id()) else {
            trace!("Ignoring attach of expired observer");
            return false;
        };
        let mut observers = self.observers.lock();
        if !observers.upsert(id, observer.clone()) {
            debug!("Observer {} re-attached, previous entry replaced", id);
        }
        true
    }

    /// Convenience for attaching straight from an owning handle
    pub fn attach_arc<O>(&self, observer: &Arc<O>) -> bool
    where
        O: Observer<E, P> + 'static,
    {
        let weak: WeakObserver<E, P> = Arc::downgrade(observer) as WeakObserver<E, P>;
        self.attach(&weak)
    }

    /// Remove the entry referring to the same observer as `observer`
    ///
    /// Works even when the observer has expired. Absent targets are ignored.
    pub fn detach(&self, observer: &WeakObserver<E, P>) -> bool {
        self.observers.lock().remove_same(observer).is_some()
    }

    /// Remove the entry registered under `id`; absent ids are ignored
    pub fn detach_id(&self, id: Id) -> bool {
        self.observers.lock().remove(id)
    }

    pub fn detach_all(&self) {
        let removed = self.observers.lock().clear();
        if removed > 0 {
            trace!("Detached {} observers", removed);
        }
    }

    /// Deliver `event` to the observer registered under `id`
    ///
    /// Returns the number of deliveries made: 0 when nothing is registered
    /// under `id` or the observer has expired. Expired entries stay in the
    /// registry; see [`Subject::prune`].
    pub fn notify(&self, id: Id, event: &E, payload: &P) -> usize {
        let targets = self.observers.lock().resolve(|entry| entry == id);
        entries::deliver(targets, event, payload)
    }

    /// Deliver `event` to every live observer in attach order
    pub fn notify_all(&self, event: &E, payload: &P) -> usize {
        let targets = self.observers.lock().resolve(|_| true);
        entries::deliver(targets, event, payload)
    }

    /// Number of registered entries, expired ones included
    pub fn len(&self) -> usize {
        self.observers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries whose observer is still alive
    pub fn live_count(&self) -> usize {
        self.observers.lock().live_count()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.observers.lock().contains(id)
    }

    /// Registered ids in attach order
    pub fn ids(&self) -> Vec<Id> {
        self.observers.lock().ids()
    }

    /// Explicitly sweep expired entries
    ///
    /// Never called implicitly; notification only skips dead entries.
    pub fn prune(&self) -> Vec<Id> {
        self.observers.lock().prune()
    }
}

impl<E: 'static> Subject<E, ()> {
    /// Payload-less form of [`Subject::notify`]
    pub fn notify_event(&self, id: Id, event: &E) -> usize {
        self.notify(id, event, &())
    }

    /// Payload-less form of [`Subject::notify_all`]
    pub fn notify_all_event(&self, event: &E) -> usize {
        self.notify_all(event, &())
    }
}

impl<E: 'static, P: 'static> Default for Subject<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static, P: 'static> Drop for Subject<E, P> {
    fn drop(&mut self) {
        self.detach_all();
    }
}

impl<E: 'static, P: 'static> fmt::Debug for Subject<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let observers = self.observers.lock();
        f.debug_struct("Subject")
            .field("observer_count", &observers.len())
            .field("live_count", &observers.live_count())
            .finish()
    }
}
