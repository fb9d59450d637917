//! Mailbox that announces every arrival
//!
//! A [`NotifyingBuffer`] is both a mailbox and a [`Subject`]: each
//! successful `add_message`/`deserialize` raises [`BufferEvent::NewMessage`]
//! to its observers, so an owner learns about arrivals without polling.

use std::fmt;

use parking_lot::{Mutex, MutexGuard};
use signal_registry::Subject;

use crate::buffer::MessageBuffer;
use crate::document::{Document, Encoded};
use crate::error::Result;

/// Events raised by the mailbox itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferEvent {
    NewMessage,
}

/// Mailbox plus subject
///
/// The document queue has its own lock, separate from the subject's.
/// Observers are notified after the queue lock is released, so they may
/// read the mailbox from `update`.
///
/// Events raised here need `E: From<BufferEvent>`; either add a
/// `NewMessage` variant to the application enum or use
/// `Extended<App, BufferEvent>`.
pub struct NotifyingBuffer<E: 'static> {
    subject: Subject<E>,
    buffer: Mutex<MessageBuffer>,
}

impl<E: 'static> NotifyingBuffer<E> {
    pub fn new() -> Self {
        Self {
            subject: Subject::new(),
            buffer: Mutex::new(MessageBuffer::new()),
        }
    }

    /// The subject arrivals are announced on
    pub fn subject(&self) -> &Subject<E> {
        &self.subject
    }

    pub fn get_message(&self) -> Option<Document> {
        self.buffer.lock().get_message()
    }

    pub fn peek_message(&self) -> Option<Document> {
        self.buffer.lock().peek_message().cloned()
    }

    pub fn get_latest_message(&self) -> Option<Document> {
        self.buffer.lock().get_latest_message().cloned()
    }

    pub fn get_message_by_key(&self, key: &str) -> Option<Document> {
        self.buffer.lock().get_message_by_key(key).cloned()
    }

    pub fn pop(&self) {
        self.buffer.lock().pop();
    }

    pub fn size(&self) -> usize {
        self.buffer.lock().size()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }

    pub fn serialize<T: Encoded>(&self, iterate: bool, clear_buffer: bool) -> Option<T> {
        self.buffer.lock().serialize(iterate, clear_buffer)
    }

    /// Run `f` with exclusive access to the underlying queue
    ///
    /// Nothing is announced for documents added this way.
    pub fn with_buffer<R>(&self, f: impl FnOnce(&mut MessageBuffer) -> R) -> R {
        f(&mut self.buffer.lock())
    }

    /// Lock the underlying queue for a longer sequence of operations
    pub fn lock(&self) -> MutexGuard<'_, MessageBuffer> {
        self.buffer.lock()
    }
}

impl<E> NotifyingBuffer<E>
where
    E: From<BufferEvent> + 'static,
{
    /// Append and announce [`BufferEvent::NewMessage`]
    pub fn add_message(&self, message: Document) {
        self.buffer.lock().add_message(message);
        self.subject.notify_all_event(&E::from(BufferEvent::NewMessage));
    }

    /// Parse and append; announces only on success
    pub fn deserialize(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.buffer.lock().deserialize(data)?;
        self.subject.notify_all_event(&E::from(BufferEvent::NewMessage));
        Ok(())
    }
}

impl<E: 'static> Default for NotifyingBuffer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> fmt::Debug for NotifyingBuffer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyingBuffer")
            .field("size", &self.size())
            .field("observers", &self.subject.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use signal_registry::{Extended, Id, Identified, Observer};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum App {
        Tick,
    }

    type Event = Extended<App, BufferEvent>;

    struct Owner {
        id: Id,
        arrivals: AtomicUsize,
        ticks: AtomicUsize,
    }

    impl Identified for Owner {
        fn id(&self) -> Id {
            self.id
        }
    }

    impl Observer<Event> for Owner {
        fn update(&self, event: &Event, _payload: &()) {
            match event {
                Extended::Base(BufferEvent::NewMessage) => {
                    self.arrivals.fetch_add(1, Ordering::SeqCst);
                }
                Extended::Own(App::Tick) => {
                    self.ticks.fetch_add(1, Ordering::SeqCst);
                }
            }
        }
    }

    fn owner() -> Arc<Owner> {
        Arc::new(Owner {
            id: Id::next(),
            arrivals: AtomicUsize::new(0),
            ticks: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_add_message_announces() {
        let buffer = NotifyingBuffer::<Event>::new();
        let owner = owner();
        buffer.subject().attach_arc(&owner);

        let mut doc = Document::new();
        doc.insert("v", json!(1));
        buffer.add_message(doc);

        assert_eq!(owner.arrivals.load(Ordering::SeqCst), 1);
        assert_eq!(owner.ticks.load(Ordering::SeqCst), 0);
        assert_eq!(buffer.size(), 1);
    }

    #[test]
    fn test_failed_deserialize_is_silent() {
        let buffer = NotifyingBuffer::<Event>::new();
        let owner = owner();
        buffer.subject().attach_arc(&owner);

        assert!(buffer.deserialize("nope").is_err());
        assert_eq!(owner.arrivals.load(Ordering::SeqCst), 0);
        assert!(buffer.is_empty());

        buffer.deserialize(r#"{"ok":true}"#).unwrap();
        assert_eq!(owner.arrivals.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_with_buffer_does_not_announce() {
        let buffer = NotifyingBuffer::<Event>::new();
        let owner = owner();
        buffer.subject().attach_arc(&owner);

        buffer.with_buffer(|queue| queue.add_message(Document::new()));

        assert_eq!(owner.arrivals.load(Ordering::SeqCst), 0);
        assert_eq!(buffer.size(), 1);
    }

    #[test]
    fn test_observer_can_read_mailbox_during_update() {
        struct Reader {
            id: Id,
            mailbox: Arc<NotifyingBuffer<Event>>,
            seen: AtomicUsize,
        }

        impl Identified for Reader {
            fn id(&self) -> Id {
                self.id
            }
        }

        impl Observer<Event> for Reader {
            fn update(&self, _event: &Event, _payload: &()) {
                self.seen.store(self.mailbox.size(), Ordering::SeqCst);
            }
        }

        let mailbox = Arc::new(NotifyingBuffer::<Event>::new());
        let reader = Arc::new(Reader {
            id: Id::next(),
            mailbox: Arc::clone(&mailbox),
            seen: AtomicUsize::new(0),
        });
        mailbox.subject().attach_arc(&reader);

        mailbox.add_message(Document::new());
        mailbox.add_message(Document::new());

        assert_eq!(reader.seen.load(Ordering::SeqCst), 2);
    }
}
