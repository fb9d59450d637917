//! FIFO mailbox of documents
//!
//! Every read accessor has a defined result on an empty mailbox (`None`),
//! so callers never touch the front or back of an empty queue.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::document::{Document, Encoded};
use crate::error::Result;

/// Ordered, unbounded queue of documents in arrival order
///
/// Owned by a single entity and not synchronized; wrap it (or use
/// [`NotifyingBuffer`](crate::NotifyingBuffer)) to share it.
///
/// # Example
///
/// ```rust
/// use message_buffer::{Document, MessageBuffer};
/// use serde_json::json;
///
/// let mut buffer = MessageBuffer::new();
/// let mut first = Document::new();
/// first.insert("seq", json!(1));
/// buffer.add_message(first.clone());
///
/// assert_eq!(buffer.peek_message(), Some(&first));
/// assert_eq!(buffer.get_message(), Some(first));
/// assert_eq!(buffer.get_message(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageBuffer {
    messages: VecDeque<Document>,
}

impl MessageBuffer {
    pub fn new() -> Self {
        Self {
            messages: VecDeque::new(),
        }
    }

    pub fn add_message(&mut self, message: Document) {
        self.messages.push_back(message);
    }

    /// Remove and return the oldest document
    pub fn get_message(&mut self) -> Option<Document> {
        self.messages.pop_front()
    }

    /// Oldest document, left in place
    pub fn peek_message(&self) -> Option<&Document> {
        self.messages.front()
    }

    /// Newest document, left in place
    pub fn get_latest_message(&self) -> Option<&Document> {
        self.messages.back()
    }

    /// First document (oldest to newest) containing `key`
    pub fn get_message_by_key(&self, key: &str) -> Option<&Document> {
        let found = self.messages.iter().find(|doc| doc.contains_key(key));
        if found.is_none() && !self.messages.is_empty() {
            debug!("Document with key not found: {}", key);
        }
        found
    }

    /// Discard the oldest document; no-op when empty
    pub fn pop(&mut self) {
        self.messages.pop_front();
    }

    pub fn size(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Documents in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.messages.iter()
    }

    /// Serialize the oldest document, or every document when `iterate`
    ///
    /// Returns `None` on an empty mailbox. With `clear_buffer` the mailbox is
    /// emptied once serialization has produced its output.
    pub fn serialize<T: Encoded>(&mut self, iterate: bool, clear_buffer: bool) -> Option<T> {
        let Some(front) = self.messages.front() else {
            debug!("Buffer is empty, nothing to serialize");
            return None;
        };

        let mut output = T::default();
        if iterate {
            for message in &self.messages {
                output.push_document(message);
            }
        } else {
            output.push_document(front);
        }

        if clear_buffer {
            self.clear();
        }
        Some(output)
    }

    /// Parse one document from `data` and append it
    ///
    /// Malformed input leaves the mailbox untouched.
    pub fn deserialize(&mut self, data: impl AsRef<[u8]>) -> Result<()> {
        match Document::from_slice(data.as_ref()) {
            Ok(document) => {
                self.messages.push_back(document);
                Ok(())
            }
            Err(err) => {
                warn!("Deserializing message failed: {}", err);
                Err(err)
            }
        }
    }
}

impl FromIterator<Document> for MessageBuffer {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl Extend<Document> for MessageBuffer {
    fn extend<I: IntoIterator<Item = Document>>(&mut self, iter: I) {
        self.messages.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BufferError;
    use rstest::rstest;
    use serde_json::json;

    fn doc(key: &str, value: i64) -> Document {
        let mut doc = Document::new();
        doc.insert(key, json!(value));
        doc
    }

    #[test]
    fn test_empty_accessors() {
        let mut buffer = MessageBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.get_message(), None);
        assert_eq!(buffer.peek_message(), None);
        assert_eq!(buffer.get_latest_message(), None);
        assert_eq!(buffer.get_message_by_key("a"), None);
        assert_eq!(buffer.serialize::<String>(true, true), None);
        buffer.pop();
        assert_eq!(buffer.size(), 0);
    }

    #[test]
    fn test_fifo_order() {
        let mut buffer = MessageBuffer::new();
        buffer.add_message(doc("n", 1));
        buffer.add_message(doc("n", 2));
        buffer.add_message(doc("n", 3));

        assert_eq!(buffer.get_latest_message(), Some(&doc("n", 3)));
        assert_eq!(buffer.get_message(), Some(doc("n", 1)));
        assert_eq!(buffer.get_message(), Some(doc("n", 2)));
        assert_eq!(buffer.get_message(), Some(doc("n", 3)));
        assert_eq!(buffer.get_message(), None);
    }

    #[test]
    fn test_get_message_by_key_returns_oldest_match() {
        let mut buffer = MessageBuffer::new();
        buffer.add_message(doc("a", 1));
        buffer.add_message(doc("b", 2));
        buffer.add_message(doc("b", 3));

        assert_eq!(buffer.get_message_by_key("b"), Some(&doc("b", 2)));
        assert_eq!(buffer.get_message_by_key("c"), None);
        assert_eq!(buffer.size(), 3);
    }

    #[rstest]
    #[case(false, false, r#"{"n":1}"#, 2)]
    #[case(false, true, r#"{"n":1}"#, 0)]
    #[case(true, false, r#"{"n":1}{"n":2}"#, 2)]
    #[case(true, true, r#"{"n":1}{"n":2}"#, 0)]
    fn test_serialize_variants(
        #[case] iterate: bool,
        #[case] clear_buffer: bool,
        #[case] expected: &str,
        #[case] remaining: usize,
    ) {
        let mut buffer: MessageBuffer = [doc("n", 1), doc("n", 2)].into_iter().collect();

        let text: String = buffer.serialize(iterate, clear_buffer).unwrap();

        assert_eq!(text, expected);
        assert_eq!(buffer.size(), remaining);
    }

    #[test]
    fn test_serialize_roundtrips_through_decode_stream() {
        let mut buffer: MessageBuffer = [doc("a", 1), doc("b", 2)].into_iter().collect();
        let bytes: Vec<u8> = buffer.serialize(true, false).unwrap();

        let decoded = Document::decode_stream(&bytes).unwrap();
        assert_eq!(decoded, buffer.iter().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn test_deserialize_appends() {
        let mut buffer = MessageBuffer::new();
        buffer.deserialize(r#"{"cmd":"on"}"#).unwrap();
        assert_eq!(buffer.size(), 1);
        assert!(buffer.get_message_by_key("cmd").is_some());
    }

    #[test]
    fn test_deserialize_malformed_leaves_buffer_unchanged() {
        let mut buffer = MessageBuffer::new();
        buffer.add_message(doc("a", 1));

        let err = buffer.deserialize(b"{not json").unwrap_err();
        assert!(matches!(err, BufferError::Decode { .. }));

        let err = buffer.deserialize("42").unwrap_err();
        assert!(matches!(err, BufferError::NotAnObject { .. }));

        assert_eq!(buffer.size(), 1);
    }
}
