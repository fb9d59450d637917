//! Key-scoped subject
//!
//! Observers subscribe under one or more notification keys; `notify(key)`
//! reaches every observer whose key set contains `key`.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::entries::{self, Entries};
use crate::id::Id;
use crate::observer::{Observer, WeakObserver};

struct KeyedState<K, E: 'static, P: 'static> {
    observers: Entries<E, P>,
    /// Subscriptions per observer, in the order they were made
    keys: HashMap<Id, Vec<K>>,
}

/// Registry of weakly-held observers subscribed under notification keys
///
/// Key sets keep every subscription, duplicates included, so
/// [`KeyedSubject::keys_of`] reports how often an observer subscribed to a
/// key. Delivery is still at most once per observer per notify.
pub struct KeyedSubject<K, E: 'static, P: 'static = ()> {
    state: Mutex<KeyedState<K, E, P>>,
}

impl<K, E, P> KeyedSubject<K, E, P>
where
    K: Eq + Hash + Clone,
    E: 'static,
    P: 'static,
{
    pub fn new() -> Self {
        Self {
            state: Mutex::new(KeyedState {
                observers: Entries::new(),
                keys: HashMap::new(),
            }),
        }
    }

    /// Subscribe `observer` under `key`
    ///
    /// No-op returning false if the observer has already expired.
    pub fn attach(&self, key: K, observer: &WeakObserver<E, P>) -> bool {
        let Some(id) = observer.upgrade().map(|live| live.id()) else {
            trace!("Ignoring keyed attach of expired observer");
            return false;
        };
        let mut state = self.state.lock();
        state.observers.upsert(id, observer.clone());
        state.keys.entry(id).or_default().push(key);
        true
    }

    pub fn attach_arc<O>(&self, key: K, observer: &Arc<O>) -> bool
    where
        O: Observer<E, P> + 'static,
    {
        let weak: WeakObserver<E, P> = Arc::downgrade(observer) as WeakObserver<E, P>;
        self.attach(key, &weak)
    }

    /// Remove an observer and all of its subscriptions
    pub fn detach(&self, observer: &WeakObserver<E, P>) -> bool {
        let mut state = self.state.lock();
        match state.observers.remove_same(observer) {
            Some(id) => {
                state.keys.remove(&id);
                true
            }
            None => false,
        }
    }

    pub fn detach_id(&self, id: Id) -> bool {
        let mut state = self.state.lock();
        state.keys.remove(&id);
        state.observers.remove(id)
    }

    /// Drop every subscription of `id` to `key`; the observer stays attached
    pub fn detach_key(&self, key: &K, id: Id) -> usize {
        let mut state = self.state.lock();
        let Some(keys) = state.keys.get_mut(&id) else {
            return 0;
        };
        let before = keys.len();
        keys.retain(|k| k != key);
        before - keys.len()
    }

    pub fn detach_all(&self) {
        let mut state = self.state.lock();
        state.observers.clear();
        state.keys.clear();
    }

    /// Deliver to every live observer subscribed under `key`
    ///
    /// Targets are resolved under the lock; `update` runs after it is
    /// released.
    pub fn notify(&self, key: &K, event: &E, payload: &P) -> usize {
        let targets = {
            let state = self.state.lock();
            let keys = &state.keys;
            state
                .observers
                .resolve(|id| keys.get(&id).is_some_and(|subscribed| subscribed.contains(key)))
        };
        entries::deliver(targets, event, payload)
    }

    /// Deliver to every live observer regardless of keys
    pub fn notify_all(&self, event: &E, payload: &P) -> usize {
        let targets = self.state.lock().observers.resolve(|_| true);
        entries::deliver(targets, event, payload)
    }

    /// Subscriptions of `id`, duplicates included
    pub fn keys_of(&self, id: Id) -> Vec<K> {
        self.state
            .lock()
            .keys
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.state.lock().observers.contains(id)
    }

    pub fn ids(&self) -> Vec<Id> {
        self.state.lock().observers.ids()
    }

    pub fn len(&self) -> usize {
        self.state.lock().observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn live_count(&self) -> usize {
        self.state.lock().observers.live_count()
    }

    /// Explicitly sweep expired observers and their key sets
    pub fn prune(&self) -> Vec<Id> {
        let mut state = self.state.lock();
        let removed = state.observers.prune();
        for id in &removed {
            state.keys.remove(id);
        }
        removed
    }
}

impl<K, E> KeyedSubject<K, E, ()>
where
    K: Eq + Hash + Clone,
    E: 'static,
{
    pub fn notify_event(&self, key: &K, event: &E) -> usize {
        self.notify(key, event, &())
    }

    pub fn notify_all_event(&self, event: &E) -> usize {
        self.notify_all(event, &())
    }
}

impl<K, E, P> Default for KeyedSubject<K, E, P>
where
    K: Eq + Hash + Clone,
    E: 'static,
    P: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E: 'static, P: 'static> fmt::Debug for KeyedSubject<K, E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("KeyedSubject")
            .field("observer_count", &state.observers.len())
            .field("subscribed", &state.keys.len())
            .finish()
    }
}
