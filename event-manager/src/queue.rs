//! Ordered strategy queue
//!
//! An association list keyed by [`Id`]: insertion order is dispatch order,
//! ids are unique and removal keeps survivors in their relative order.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use signal_registry::Id;

use crate::strategy::Strategy;

/// Where a queued strategy is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyState {
    /// Queued, `begin` not yet called
    Idle,
    /// `begin` has run; invoked on every tick
    Active,
    /// Removed from the queue
    Detached,
}

/// One queued strategy
///
/// The id is captured at push time and stays the queue key even if the
/// strategy's own id changes later.
pub struct QueueEntry<E: 'static> {
    id: Id,
    strategy: Arc<dyn Strategy<E>>,
    state: Cell<StrategyState>,
}

impl<E: 'static> QueueEntry<E> {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn strategy(&self) -> &Arc<dyn Strategy<E>> {
        &self.strategy
    }

    pub fn state(&self) -> StrategyState {
        self.state.get()
    }

    pub(crate) fn set_state(&self, state: StrategyState) {
        self.state.set(state);
    }

    pub fn into_strategy(self) -> Arc<dyn Strategy<E>> {
        self.strategy
    }
}

impl<E: 'static> fmt::Debug for QueueEntry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueEntry")
            .field("id", &self.id)
            .field("label", &self.strategy.label())
            .field("state", &self.state.get())
            .finish()
    }
}

/// Strategies in dispatch order
pub struct StrategyQueue<E: 'static> {
    entries: Vec<QueueEntry<E>>,
}

impl<E: 'static> StrategyQueue<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append `strategy` as `Idle`; returns false if its id is already queued
    pub fn push(&mut self, strategy: Arc<dyn Strategy<E>>) -> bool {
        let id = strategy.id();
        if self.contains(id) {
            return false;
        }
        self.entries.push(QueueEntry {
            id,
            strategy,
            state: Cell::new(StrategyState::Idle),
        });
        true
    }

    /// Remove the entry queued under `id`, keeping the others in order
    ///
    /// The returned entry is marked `Detached`.
    pub fn remove(&mut self, id: Id) -> Option<QueueEntry<E>> {
        let index = self.position(id)?;
        let entry = self.entries.remove(index);
        entry.set_state(StrategyState::Detached);
        Some(entry)
    }

    pub fn find(&self, id: Id) -> Option<&QueueEntry<E>> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Find the entry holding this exact strategy object
    pub fn find_same<S>(&self, strategy: &Arc<S>) -> Option<&QueueEntry<E>>
    where
        S: Strategy<E> + ?Sized,
    {
        let target = Arc::as_ptr(strategy) as *const ();
        self.entries
            .iter()
            .find(|entry| Arc::as_ptr(&entry.strategy) as *const () == target)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry<E>> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<Id> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empty the queue, returning every entry in order marked `Detached`
    pub fn drain(&mut self) -> Vec<QueueEntry<E>> {
        let drained: Vec<_> = self.entries.drain(..).collect();
        for entry in &drained {
            entry.set_state(StrategyState::Detached);
        }
        drained
    }

    fn position(&self, id: Id) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}

impl<E: 'static> Default for StrategyQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> fmt::Debug for StrategyQueue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{Lifecycle, StrategyCore};
    use signal_registry::{Identified, Observer};

    struct Noop {
        core: StrategyCore<u8>,
    }

    impl Identified for Noop {
        fn id(&self) -> Id {
            self.core.id()
        }
    }

    impl Observer<u8> for Noop {
        fn update(&self, _event: &u8, _payload: &()) {}
    }

    impl Lifecycle for Noop {}

    impl Strategy<u8> for Noop {
        fn core(&self) -> &StrategyCore<u8> {
            &self.core
        }
    }

    fn noop(id: u64) -> Arc<Noop> {
        Arc::new(Noop {
            core: StrategyCore::with_id(id, format!("S{id}"), true),
        })
    }

    #[test]
    fn test_push_rejects_duplicate_ids() {
        let mut queue = StrategyQueue::<u8>::new();
        assert!(queue.push(noop(1)));
        assert!(queue.push(noop(2)));
        assert!(!queue.push(noop(1)));
        assert_eq!(queue.ids(), vec![Id::new(1), Id::new(2)]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut queue = StrategyQueue::<u8>::new();
        for id in 1..=4 {
            queue.push(noop(id));
        }

        let removed = queue.remove(Id::new(2)).unwrap();
        assert_eq!(removed.state(), StrategyState::Detached);
        assert_eq!(queue.ids(), vec![Id::new(1), Id::new(3), Id::new(4)]);
        assert!(queue.remove(Id::new(2)).is_none());
    }

    #[test]
    fn test_find_same_uses_object_identity() {
        let mut queue = StrategyQueue::<u8>::new();
        let queued = noop(7);
        queue.push(queued.clone());

        let impostor = noop(7);
        assert!(queue.find_same(&queued).is_some());
        assert!(queue.find_same(&impostor).is_none());
        assert_eq!(
            queue.find(Id::new(7)).map(QueueEntry::state),
            Some(StrategyState::Idle)
        );
    }

    #[test]
    fn test_drain_empties_in_order() {
        let mut queue = StrategyQueue::<u8>::new();
        queue.push(noop(1));
        queue.push(noop(2));

        let drained = queue.drain();
        assert!(queue.is_empty());
        assert_eq!(
            drained.iter().map(QueueEntry::id).collect::<Vec<_>>(),
            vec![Id::new(1), Id::new(2)]
        );
        assert!(drained.iter().all(|e| e.state() == StrategyState::Detached));
    }
}
