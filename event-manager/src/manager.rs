//! Event manager: an ordered strategy queue driven once per scheduler tick
//!
//! The manager owns its strategies and each strategy holds a weak
//! back-reference to the manager (through the strategy's subject), so a
//! strategy can raise events upward without an ownership cycle.
//!
//! # Locking
//!
//! One re-entrant lock guards the queue. Every queue operation holds it for
//! its full duration, so a dispatch running on the scheduler thread and an
//! `add_subscriber`/`remove_subscriber` from another thread never interleave.
//! Because the lock is re-entrant, code running inside a dispatch (a
//! strategy's `begin`/`receive_message`, or the manager's handler reacting
//! to a strategy's event) may read the queue and dispatch again. A queue
//! mutation attempted from inside a dispatch on the same thread is rejected
//! and logged.
//!
//! A `receive_message` that never returns blocks the whole tick; there is
//! no timeout or cancellation.

use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, Weak};

use message_buffer::{BufferEvent, Document};
use parking_lot::ReentrantMutex;
use signal_registry::{Id, Identified, Observer, Subject, WeakObserver};
use tracing::{debug, info, trace, warn};

use crate::config::ManagerConfig;
use crate::error::Result;
use crate::queue::{StrategyQueue, StrategyState};
use crate::strategy::Strategy;

/// Reaction of a manager to events raised by its strategies
///
/// Closures `Fn(&E)` implement this directly. Implement it on a type when
/// the reaction needs the manager, e.g. to dispatch a specific strategy.
pub trait ManagerHandler<E: 'static>: Send + Sync + Sized + 'static {
    fn update(&self, manager: &EventManager<E, Self>, event: &E);
}

impl<E: 'static, F> ManagerHandler<E> for F
where
    F: Fn(&E) + Send + Sync + 'static,
{
    fn update(&self, _manager: &EventManager<E, Self>, event: &E) {
        self(event)
    }
}

/// Owns an ordered queue of strategies and drives their lifecycle
///
/// The manager is both an [`Observer`] (strategies notify it under
/// [`EventManager::id`]) and a subject (other observers may attach to
/// [`EventManager::subject`]).
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use event_manager::{EventManager, Lifecycle, Strategy, StrategyCore};
/// use signal_registry::{Id, Identified, Observer};
///
/// struct Tick { core: StrategyCore<u8>, runs: AtomicUsize }
///
/// impl Identified for Tick {
///     fn id(&self) -> Id { self.core.id() }
/// }
/// impl Observer<u8> for Tick {
///     fn update(&self, _event: &u8, _payload: &()) {}
/// }
/// impl Lifecycle for Tick {
///     fn receive_message(&self) { self.runs.fetch_add(1, Ordering::SeqCst); }
/// }
/// impl Strategy<u8> for Tick {
///     fn core(&self) -> &StrategyCore<u8> { &self.core }
/// }
///
/// let manager = EventManager::<u8, _>::new("Main", |event: &u8| println!("event {event}"));
/// let tick = Arc::new(Tick { core: StrategyCore::new("Tick", true), runs: AtomicUsize::new(0) });
///
/// assert!(manager.add_subscriber(tick.clone()));
/// manager.begin();
/// manager.handle_strategies();
/// manager.handle_strategies();
///
/// assert_eq!(tick.runs.load(Ordering::SeqCst), 2);
/// ```
pub struct EventManager<E: 'static, H> {
    id: Id,
    config: ManagerConfig,
    me: Weak<Self>,
    queue: ReentrantMutex<RefCell<StrategyQueue<E>>>,
    subject: Subject<E>,
    handler: H,
}

impl<E: 'static, H: ManagerHandler<E>> EventManager<E, H> {
    /// Create a manager with default configuration and the given label
    pub fn new(label: impl Into<String>, handler: H) -> Arc<Self> {
        Self::build(ManagerConfig::default().with_label(label), handler)
    }

    /// Create a manager from a validated configuration
    pub fn with_config(config: ManagerConfig, handler: H) -> Result<Arc<Self>> {
        config.validate()?;
        Ok(Self::build(config, handler))
    }

    fn build(config: ManagerConfig, handler: H) -> Arc<Self> {
        let id = config.id.unwrap_or_else(Id::next);
        info!(manager = %config.label, id = %id, "Event manager created");

        Arc::new_cyclic(|me| Self {
            id,
            config,
            me: me.clone(),
            queue: ReentrantMutex::new(RefCell::new(StrategyQueue::new())),
            subject: Subject::new(),
            handler,
        })
    }

    /// Queue `strategy` behind the existing ones
    ///
    /// The strategy's subject gets a weak reference to this manager, so the
    /// strategy can `notify` it under [`EventManager::id`]. Returns false
    /// (and logs) when the id is already queued or the queue is full.
    pub fn add_subscriber(&self, strategy: Arc<dyn Strategy<E>>) -> bool {
        let id = strategy.id();
        let me: WeakObserver<E> = self.me.clone();

        let added = self.with_queue_mut("add_subscriber", |queue| {
            if queue.contains(id) {
                warn!(manager = %self.config.label, strategy = %id, "Strategy already subscribed");
                return false;
            }
            if queue.len() >= self.config.max_strategies {
                warn!(
                    manager = %self.config.label,
                    strategy = %id,
                    max = self.config.max_strategies,
                    "Strategy queue is full"
                );
                return false;
            }

            strategy.core().subject().attach(&me);
            queue.push(Arc::clone(&strategy))
        });

        if added == Some(true) {
            debug!(
                manager = %self.config.label,
                strategy = %id,
                label = strategy.label(),
                "Strategy subscribed"
            );
        }
        added.unwrap_or(false)
    }
}

impl<E: 'static, H> EventManager<E, H> {
    /// Remove `strategy` from the queue
    ///
    /// Matching is by id. Absent strategies are ignored.
    pub fn remove_subscriber<S>(&self, strategy: &S) -> bool
    where
        S: Strategy<E> + ?Sized,
    {
        self.remove_subscriber_id(strategy.id())
    }

    /// Remove the strategy queued under `id`
    ///
    /// The strategy's back-reference to this manager is detached before the
    /// entry leaves the queue. Survivors keep their relative order.
    pub fn remove_subscriber_id(&self, id: Id) -> bool {
        let removed = self
            .with_queue_mut("remove_subscriber", |queue| {
                let entry = queue.find(id)?;
                entry.strategy().core().subject().detach_id(self.id);
                queue.remove(id)
            })
            .flatten();

        match removed {
            Some(entry) => {
                debug!(
                    manager = %self.config.label,
                    strategy = %entry.id(),
                    label = entry.strategy().label(),
                    "Strategy removed"
                );
                true
            }
            None => {
                trace!(manager = %self.config.label, strategy = %id, "Nothing to remove");
                false
            }
        }
    }

    /// Start every strategy that has not been started yet, in queue order
    ///
    /// Each strategy's `begin` runs exactly once over the manager's lifetime,
    /// so calling this again after adding strategies only starts the new
    /// ones. Returns the number of strategies started.
    pub fn begin(&self) -> usize {
        self.with_queue(|queue| {
            info!(manager = %self.config.label, "Initializing strategies");
            if queue.is_empty() {
                self.report_empty();
                return 0;
            }

            let mut started = 0;
            for entry in queue.iter() {
                if entry.state() != StrategyState::Idle {
                    continue;
                }
                debug!(
                    strategy = %entry.id(),
                    label = entry.strategy().label(),
                    "Starting strategy"
                );
                entry.set_state(StrategyState::Active);
                entry.strategy().begin();
                started += 1;
            }
            started
        })
    }

    /// One dispatch tick: `receive_message` on every queued strategy in order
    ///
    /// `repeat` is not consulted; strategies decide for themselves whether
    /// another invocation has work to do. Returns the number invoked.
    pub fn handle_strategies(&self) -> usize {
        self.with_queue(|queue| {
            if queue.is_empty() {
                self.report_empty();
                return 0;
            }

            for entry in queue.iter() {
                trace!(strategy = %entry.id(), "Dispatching strategy");
                entry.strategy().receive_message();
            }
            queue.len()
        })
    }

    /// Dispatch one queued strategy, found by object identity
    ///
    /// Returns 1 if it was invoked, 0 (and logs) if it is not queued here.
    pub fn handle_strategy<S>(&self, strategy: &Arc<S>) -> usize
    where
        S: Strategy<E> + ?Sized,
    {
        self.with_queue(|queue| match queue.find_same(strategy) {
            Some(entry) => {
                trace!(strategy = %entry.id(), "Dispatching strategy");
                entry.strategy().receive_message();
                1
            }
            None => {
                warn!(
                    manager = %self.config.label,
                    strategy = %strategy.id(),
                    "Strategy not found"
                );
                0
            }
        })
    }

    /// Drain the queue, detaching every strategy from this manager
    ///
    /// Returns the number of strategies removed.
    pub fn stop(&self) -> usize {
        let drained = self
            .with_queue_mut("stop", |queue| {
                let drained = queue.drain();
                for entry in &drained {
                    entry.strategy().core().subject().detach_id(self.id);
                }
                drained
            })
            .unwrap_or_default();

        if !drained.is_empty() {
            info!(manager = %self.config.label, count = drained.len(), "Stopped strategies");
        }
        drained.len()
    }

    /// Hand `message` to the `send_message` hook of the strategy queued under `id`
    pub fn send_message(&self, id: Id, message: &Document) -> bool {
        self.with_queue(|queue| match queue.find(id) {
            Some(entry) => {
                entry.strategy().send_message(message);
                true
            }
            None => {
                warn!(manager = %self.config.label, strategy = %id, "Strategy not found");
                false
            }
        })
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Subject other observers attach to in order to hear from this manager
    pub fn subject(&self) -> &Subject<E> {
        &self.subject
    }

    pub fn len(&self) -> usize {
        self.with_queue(|queue| queue.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: Id) -> bool {
        self.with_queue(|queue| queue.contains(id))
    }

    /// Queued ids in dispatch order
    pub fn strategy_ids(&self) -> Vec<Id> {
        self.with_queue(|queue| queue.ids())
    }

    /// Lifecycle state of the strategy queued under `id`
    pub fn state_of(&self, id: Id) -> Option<StrategyState> {
        self.with_queue(|queue| queue.find(id).map(|entry| entry.state()))
    }

    fn report_empty(&self) {
        if self.config.warn_on_empty_queue {
            warn!(manager = %self.config.label, "No strategies found");
        } else {
            debug!(manager = %self.config.label, "No strategies found");
        }
    }

    fn with_queue<R: Default>(&self, f: impl FnOnce(&StrategyQueue<E>) -> R) -> R {
        let guard = self.queue.lock();
        let Ok(queue) = guard.try_borrow() else {
            warn!(manager = %self.config.label, "Strategy queue is being modified, read skipped");
            return R::default();
        };
        f(&queue)
    }

    fn with_queue_mut<R>(
        &self,
        operation: &str,
        f: impl FnOnce(&mut StrategyQueue<E>) -> R,
    ) -> Option<R> {
        let guard = self.queue.lock();
        let Ok(mut queue) = guard.try_borrow_mut() else {
            warn!(
                manager = %self.config.label,
                operation,
                "Queue change rejected while strategies are being dispatched"
            );
            return None;
        };
        Some(f(&mut queue))
    }
}

impl<E, H> EventManager<E, H>
where
    E: From<BufferEvent> + 'static,
{
    /// Decode `data` into the mailbox of the strategy queued under `id`
    ///
    /// Returns `Ok(false)` when no such strategy is queued. A decode failure
    /// leaves the mailbox unchanged and is returned as an error.
    pub fn deliver(&self, id: Id, data: impl AsRef<[u8]>) -> Result<bool> {
        let target =
            self.with_queue(|queue| queue.find(id).map(|entry| Arc::clone(entry.strategy())));
        let Some(strategy) = target else {
            warn!(manager = %self.config.label, strategy = %id, "Strategy not found");
            return Ok(false);
        };

        strategy.core().mailbox().deserialize(data)?;
        Ok(true)
    }
}

impl<E: 'static, H> Identified for EventManager<E, H> {
    fn id(&self) -> Id {
        self.id
    }
}

impl<E: 'static, H: ManagerHandler<E>> Observer<E> for EventManager<E, H> {
    fn update(&self, event: &E, _payload: &()) {
        self.handler.update(self, event);
    }
}

impl<E: 'static, H> Drop for EventManager<E, H> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<E: 'static, H> fmt::Debug for EventManager<E, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field("id", &self.id)
            .field("label", &self.config.label)
            .field("strategies", &self.strategy_ids())
            .field("observers", &self.subject.len())
            .finish()
    }
}
