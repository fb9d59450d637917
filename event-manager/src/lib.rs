//! Event Manager
//!
//! Drives an ordered queue of strategies from a cooperative scheduler loop.
//!
//! # Features
//!
//! - **Ordered Dispatch**: Strategies run in the order they were added; removal keeps the rest in order
//! - **Lifecycle Hooks**: `begin` once per strategy, `receive_message` on every tick
//! - **Back-Notification**: Strategies raise events to their manager through a weak back-reference
//! - **Per-Strategy Mailboxes**: Every strategy owns a notifying JSON mailbox
//! - **Thread Safety**: Producers on other threads may add, remove and notify while the loop dispatches
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use event_manager::prelude::*;
//! use signal_registry::{Extended, Id, Identified, Observer};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum App { Ready }
//!
//! type Event = Extended<App, BufferEvent>;
//!
//! struct Led { core: StrategyCore<Event> }
//!
//! impl Identified for Led {
//!     fn id(&self) -> Id { self.core.id() }
//! }
//! impl Observer<Event> for Led {
//!     fn update(&self, _event: &Event, _payload: &()) {}
//! }
//! impl Lifecycle for Led {
//!     fn receive_message(&self) {
//!         while let Some(doc) = self.core.mailbox().get_message() {
//!             println!("led <- {}", doc.to_json());
//!         }
//!     }
//! }
//! impl Strategy<Event> for Led {
//!     fn core(&self) -> &StrategyCore<Event> { &self.core }
//! }
//!
//! let manager = EventManager::<Event, _>::new("Main", |event: &Event| println!("{event:?}"));
//! let led = Arc::new(Led { core: StrategyCore::new("Led", true) });
//! manager.add_subscriber(led.clone());
//!
//! manager.begin();
//! manager.deliver(led.id(), r#"{"state":"on"}"#).unwrap();
//! manager.handle_strategies();
//! assert!(led.core.mailbox().is_empty());
//! ```
//!
//! # Architecture
//!
//! ```text
//! producer ──notify──▶ Strategy subject ──update──▶ EventManager ──▶ ManagerHandler
//!                                                        │
//! scheduler ──begin / handle_strategies──────────────────┘──▶ Strategy::receive_message
//! ```

// Modules
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod queue;
pub mod strategy;

// Re-exports - Public API
pub use config::ManagerConfig;
pub use error::{EventManagerError, Result};
pub use manager::{EventManager, ManagerHandler};
pub use queue::{QueueEntry, StrategyQueue, StrategyState};
pub use strategy::{Lifecycle, Strategy, StrategyCore};

pub use message_buffer::{BufferEvent, Document};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::ManagerConfig;
    pub use crate::error::EventManagerError;
    pub use crate::manager::{EventManager, ManagerHandler};
    pub use crate::queue::StrategyState;
    pub use crate::strategy::{Lifecycle, Strategy, StrategyCore};
    pub use message_buffer::{BufferEvent, Document};
}
