//! Message Buffer
//!
//! Per-owner FIFO mailboxes of JSON documents.
//!
//! # Features
//!
//! - **FIFO Delivery**: Documents come out in arrival order
//! - **Safe Empty Reads**: Every accessor returns `None` on an empty mailbox
//! - **Key Lookup**: Find the oldest document carrying a given key
//! - **Bulk Serialization**: Write the oldest or every document into a `String` or `Vec<u8>`
//! - **Arrival Notification**: [`NotifyingBuffer`] raises [`BufferEvent::NewMessage`] to its observers
//!
//! # Quick Start
//!
//! ```rust
//! use message_buffer::{Document, MessageBuffer};
//!
//! let mut mailbox = MessageBuffer::new();
//! mailbox.deserialize(r#"{"led":"on"}"#).unwrap();
//! mailbox.deserialize(r#"{"led":"off"}"#).unwrap();
//!
//! let all: String = mailbox.serialize(true, true).unwrap();
//! assert_eq!(all, r#"{"led":"on"}{"led":"off"}"#);
//! assert!(mailbox.is_empty());
//!
//! let restored = Document::decode_stream(all.as_bytes()).unwrap();
//! assert_eq!(restored.len(), 2);
//! ```

// Modules
pub mod buffer;
pub mod document;
pub mod error;
pub mod notifying;

// Re-exports - Public API
pub use buffer::MessageBuffer;
pub use document::{Document, Encoded};
pub use error::{BufferError, Result};
pub use notifying::{BufferEvent, NotifyingBuffer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::buffer::MessageBuffer;
    pub use crate::document::{Document, Encoded};
    pub use crate::error::BufferError;
    pub use crate::notifying::{BufferEvent, NotifyingBuffer};
}
