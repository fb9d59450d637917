//! Observer Registry
//!
//! Thread-safe publish/subscribe registries that hold their observers
//! weakly, so producers never keep consumers alive.
//!
//! # Features
//!
//! - **Weak Registration**: Subjects store `Weak` handles; dropped observers are skipped on delivery
//! - **Id-keyed Notification**: [`Subject::notify`] reaches the observer registered under an id
//! - **Key-scoped Notification**: [`KeyedSubject::notify`] reaches every observer subscribed to a key
//! - **Optional Payloads**: `Observer<E, P>` with `P = ()` for payload-less events
//! - **Process-wide Ids**: [`Id::next`] hands out unique ids from an atomic counter
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use signal_registry::{Id, Identified, Observer, Subject};
//!
//! #[derive(Debug)]
//! enum Alarm { Raised }
//!
//! struct Siren { id: Id }
//!
//! impl Identified for Siren {
//!     fn id(&self) -> Id { self.id }
//! }
//!
//! impl Observer<Alarm> for Siren {
//!     fn update(&self, event: &Alarm, _payload: &()) {
//!         println!("siren {} got {:?}", self.id, event);
//!     }
//! }
//!
//! let subject = Subject::<Alarm>::new();
//! let siren = Arc::new(Siren { id: Id::next() });
//! subject.attach_arc(&siren);
//! assert_eq!(subject.notify_all_event(&Alarm::Raised), 1);
//! ```
//!
//! # Architecture
//!
//! ```text
//! Subject<E, P>
//!     │
//!     └── Mutex<[(Id, Weak<dyn Observer<E, P>>)]>   attach order
//!
//! KeyedSubject<K, E, P>
//!     │
//!     └── Mutex<{ [(Id, Weak<..>)], HashMap<Id, Vec<K>> }>
//! ```

// Modules
mod entries;
pub mod event;
pub mod id;
pub mod keyed;
pub mod observer;
pub mod subject;

// Re-exports - Public API
pub use event::Extended;
pub use id::{Id, Identified, Identity};
pub use keyed::KeyedSubject;
pub use observer::{Observer, WeakObserver};
pub use subject::Subject;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::event::Extended;
    pub use crate::id::{Id, Identified, Identity};
    pub use crate::keyed::KeyedSubject;
    pub use crate::observer::{Observer, WeakObserver};
    pub use crate::subject::Subject;
}
