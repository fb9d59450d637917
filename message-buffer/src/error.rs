use thiserror::Error;

/// Errors surfaced by mailbox decoding
///
/// Empty mailboxes and lookup misses are not errors; accessors return
/// `None` for those.
#[derive(Error, Debug)]
pub enum BufferError {
    /// Input was not valid JSON
    #[error("Failed to decode document: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    /// Input was valid JSON but not an object
    #[error("Expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

impl From<serde_json::Error> for BufferError {
    fn from(source: serde_json::Error) -> Self {
        BufferError::Decode { source }
    }
}

/// Result type for mailbox decoding
pub type Result<T> = std::result::Result<T, BufferError>;
