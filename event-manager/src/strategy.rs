//! Strategies: identity, mailbox and lifecycle hooks
//!
//! A strategy is assembled from capabilities rather than a class chain:
//!
//! - [`Identified`] / [`Observer`]: it can be attached to subjects and
//!   receive events
//! - [`Lifecycle`]: hooks the manager drives (`begin`, `receive_message`)
//!   and producers call (`send_message`)
//! - [`StrategyCore`]: the shared state every strategy embeds, providing
//!   the mailbox and the subject the owning manager listens on

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use message_buffer::{Document, NotifyingBuffer};
use signal_registry::{Id, Identified, Identity, Observer, Subject};

/// Hooks driven by an [`EventManager`](crate::EventManager)
///
/// All hooks default to doing nothing. `receive_message` runs on every
/// dispatch tick and blocks the tick until it returns.
pub trait Lifecycle {
    /// Called once, when the manager first starts this strategy
    fn begin(&self) {}

    /// Hand a document to the strategy from a producer
    fn send_message(&self, _message: &Document) {}

    /// Called on every dispatch tick
    fn receive_message(&self) {}
}

/// An event-handling unit owned by an [`EventManager`](crate::EventManager)
///
/// # Example
///
/// ```rust
/// use event_manager::{Lifecycle, Strategy, StrategyCore};
/// use signal_registry::{Id, Identified, Observer};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Event { Started }
///
/// struct Blink { core: StrategyCore<Event> }
///
/// impl Identified for Blink {
///     fn id(&self) -> Id { self.core.id() }
/// }
///
/// impl Observer<Event> for Blink {
///     fn update(&self, _event: &Event, _payload: &()) {}
/// }
///
/// impl Lifecycle for Blink {
///     fn receive_message(&self) {
///         if let Some(doc) = self.core.mailbox().get_message() {
///             println!("blink {}", doc.to_json());
///         }
///     }
/// }
///
/// impl Strategy<Event> for Blink {
///     fn core(&self) -> &StrategyCore<Event> { &self.core }
/// }
///
/// let blink = Blink { core: StrategyCore::new("Blink", true) };
/// assert!(blink.repeat());
/// assert_eq!(blink.label(), "Blink");
/// ```
pub trait Strategy<E: 'static>: Observer<E> + Lifecycle {
    fn core(&self) -> &StrategyCore<E>;

    /// Whether the strategy wants to keep working on later ticks
    ///
    /// Advisory only: the manager invokes every queued strategy on every
    /// tick regardless of this flag.
    fn repeat(&self) -> bool {
        self.core().repeat()
    }

    fn label(&self) -> &str {
        self.core().label()
    }
}

/// State shared by every strategy
///
/// The mailbox's subject doubles as the strategy's own subject: the owning
/// manager attaches there, so both `notify` calls and mailbox arrivals reach it.
pub struct StrategyCore<E: 'static> {
    identity: Identity,
    label: String,
    repeat: AtomicBool,
    mailbox: NotifyingBuffer<E>,
}

impl<E: 'static> StrategyCore<E> {
    /// New core with a freshly allocated id
    pub fn new(label: impl Into<String>, repeat: bool) -> Self {
        Self::with_identity(Identity::new(), label, repeat)
    }

    /// New core with an externally assigned id
    pub fn with_id(id: impl Into<Id>, label: impl Into<String>, repeat: bool) -> Self {
        Self::with_identity(Identity::with_id(id.into()), label, repeat)
    }

    fn with_identity(identity: Identity, label: impl Into<String>, repeat: bool) -> Self {
        Self {
            identity,
            label: label.into(),
            repeat: AtomicBool::new(repeat),
            mailbox: NotifyingBuffer::new(),
        }
    }

    pub fn id(&self) -> Id {
        self.identity.get()
    }

    /// Reassign the id
    ///
    /// Only safe before the strategy is queued or attached anywhere; the
    /// manager and subjects key their entries by the id seen at attach time.
    pub fn set_id(&self, id: Id) {
        self.identity.set(id);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn repeat(&self) -> bool {
        self.repeat.load(Ordering::Acquire)
    }

    pub fn set_repeat(&self, repeat: bool) {
        self.repeat.store(repeat, Ordering::Release);
    }

    pub fn mailbox(&self) -> &NotifyingBuffer<E> {
        &self.mailbox
    }

    /// Subject the owning manager is attached to
    pub fn subject(&self) -> &Subject<E> {
        self.mailbox.subject()
    }

    /// Raise `event` to the observer registered under `target`
    ///
    /// Typically `target` is the owning manager's id.
    pub fn notify(&self, target: Id, event: &E) -> usize {
        self.subject().notify_event(target, event)
    }

    pub fn notify_all(&self, event: &E) -> usize {
        self.subject().notify_all_event(event)
    }
}

impl<E: 'static> Identified for StrategyCore<E> {
    fn id(&self) -> Id {
        self.identity.get()
    }
}

impl<E: 'static> fmt::Debug for StrategyCore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyCore")
            .field("id", &self.id())
            .field("label", &self.label)
            .field("repeat", &self.repeat())
            .field("mailbox", &self.mailbox)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use message_buffer::BufferEvent;
    use signal_registry::Extended;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    type Event = Extended<u8, BufferEvent>;

    struct Listener {
        id: Id,
        events: parking_lot::Mutex<Vec<Event>>,
    }

    impl Identified for Listener {
        fn id(&self) -> Id {
            self.id
        }
    }

    impl Observer<Event> for Listener {
        fn update(&self, event: &Event, _payload: &()) {
            self.events.lock().push(*event);
        }
    }

    struct Counter {
        core: StrategyCore<Event>,
        ticks: AtomicUsize,
    }

    impl Identified for Counter {
        fn id(&self) -> Id {
            self.core.id()
        }
    }

    impl Observer<Event> for Counter {
        fn update(&self, _event: &Event, _payload: &()) {}
    }

    impl Lifecycle for Counter {
        fn receive_message(&self) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Strategy<Event> for Counter {
        fn core(&self) -> &StrategyCore<Event> {
            &self.core
        }
    }

    #[test]
    fn test_core_identity_and_flags() {
        let core = StrategyCore::<Event>::with_id(42u64, "Sensor", false);
        assert_eq!(core.id(), Id::new(42));
        assert_eq!(core.label(), "Sensor");
        assert!(!core.repeat());

        core.set_repeat(true);
        assert!(core.repeat());
    }

    #[test]
    fn test_fresh_cores_get_distinct_ids() {
        let a = StrategyCore::<Event>::new("a", true);
        let b = StrategyCore::<Event>::new("b", true);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_default_hooks_are_noops() {
        let counter = Counter {
            core: StrategyCore::new("Counter", true),
            ticks: AtomicUsize::new(0),
        };
        counter.begin();
        counter.send_message(&Document::new());
        assert_eq!(counter.ticks.load(Ordering::SeqCst), 0);

        counter.receive_message();
        assert_eq!(counter.ticks.load(Ordering::SeqCst), 1);
        assert_eq!(counter.label(), "Counter");
        assert!(counter.repeat());
    }

    #[test]
    fn test_notify_reaches_attached_listener() {
        let core = StrategyCore::<Event>::new("Producer", true);
        let listener = Arc::new(Listener {
            id: Id::new(100),
            events: parking_lot::Mutex::new(Vec::new()),
        });
        core.subject().attach_arc(&listener);

        assert_eq!(core.notify(Id::new(100), &Extended::Own(1)), 1);
        assert_eq!(core.notify(Id::new(101), &Extended::Own(2)), 0);
        core.mailbox().add_message(Document::new());

        assert_eq!(
            *listener.events.lock(),
            vec![Extended::Own(1), Extended::Base(BufferEvent::NewMessage)]
        );
    }
}
