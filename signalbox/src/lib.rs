//! # Signalbox
//!
//! Event dispatch for cooperative scheduler loops: producers raise typed
//! events on subjects, strategies receive them through weakly-held
//! observer registrations and their own mailboxes, and an event manager
//! drives every strategy once per tick.
//!
//! ```rust
//! use std::sync::Arc;
//! use signalbox::prelude::*;
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Sensor { Threshold }
//!
//! type Event = Extended<Sensor, BufferEvent>;
//!
//! struct Fan { core: StrategyCore<Event> }
//!
//! impl Identified for Fan {
//!     fn id(&self) -> Id { self.core.id() }
//! }
//! impl Observer<Event> for Fan {
//!     fn update(&self, _event: &Event, _payload: &()) {}
//! }
//! impl Lifecycle for Fan {
//!     fn begin(&self) {
//!         self.core.notify_all(&Extended::from_own(Sensor::Threshold));
//!     }
//! }
//! impl Strategy<Event> for Fan {
//!     fn core(&self) -> &StrategyCore<Event> { &self.core }
//! }
//!
//! let manager = EventManager::<Event, _>::new("Climate", |event: &Event| {
//!     assert_eq!(event.own(), Some(&Sensor::Threshold));
//! });
//! manager.add_subscriber(Arc::new(Fan { core: StrategyCore::new("Fan", true) }));
//! assert_eq!(manager.begin(), 1);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! signalbox (facade)
//!     ↓
//! event-manager (strategy queue, lifecycle, logging, config)
//!     ↓
//! message-buffer (JSON mailboxes that announce arrivals)
//!     ↓
//! signal-registry (ids, observers, subjects)
//! ```

pub use event_manager;
pub use message_buffer;
pub use signal_registry;

pub use event_manager::{
    logging, EventManager, EventManagerError, Lifecycle, ManagerConfig, ManagerHandler, Strategy,
    StrategyCore, StrategyState,
};
pub use message_buffer::{BufferError, BufferEvent, Document, MessageBuffer, NotifyingBuffer};
pub use signal_registry::{
    Extended, Id, Identified, Identity, KeyedSubject, Observer, Subject, WeakObserver,
};

/// Everything needed to write strategies and wire up a manager
pub mod prelude {
    pub use event_manager::prelude::*;
    pub use message_buffer::prelude::*;
    pub use signal_registry::prelude::*;
}
