use message_buffer::BufferError;
use thiserror::Error;

use crate::logging::LoggingError;

/// Errors that can occur in the Event Manager
///
/// Empty queues, unknown strategies and expired observers are reported
/// through logging and return values, never as errors.
#[derive(Error, Debug)]
pub enum EventManagerError {
    /// Invalid manager configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A payload routed to a strategy mailbox could not be decoded
    #[error("Failed to deliver message: {0}")]
    Buffer(#[from] BufferError),

    /// Logging could not be initialized
    #[error("Logging setup failed: {0}")]
    Logging(#[from] LoggingError),
}

/// Result type for Event Manager operations
pub type Result<T> = std::result::Result<T, EventManagerError>;
