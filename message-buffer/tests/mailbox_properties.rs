//! Property-based tests for mailbox ordering and serialization

use proptest::prelude::*;
use serde_json::json;

use message_buffer::{Document, MessageBuffer};

fn document_strategy() -> impl Strategy<Value = Document> {
    ("[a-z]{1,6}", any::<i32>()).prop_map(|(key, value)| {
        let mut doc = Document::new();
        doc.insert(key, json!(value));
        doc
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// `get_message` returns documents in the order they were added, then `None`.
    #[test]
    fn prop_fifo_then_empty(docs in prop::collection::vec(document_strategy(), 0..20)) {
        let mut buffer = MessageBuffer::new();
        for doc in &docs {
            buffer.add_message(doc.clone());
        }

        for doc in &docs {
            let got = buffer.get_message();
            prop_assert_eq!(got.as_ref(), Some(doc));
        }
        prop_assert_eq!(buffer.get_message(), None);
        prop_assert!(buffer.is_empty());
    }

    /// Serializing the front decodes back to the oldest document.
    #[test]
    fn prop_serialize_front_matches_oldest(docs in prop::collection::vec(document_strategy(), 1..10)) {
        let mut buffer: MessageBuffer = docs.iter().cloned().collect();

        let text: String = buffer.serialize(false, false).unwrap();
        prop_assert_eq!(Document::from_json(&text).unwrap(), docs[0].clone());
        prop_assert_eq!(buffer.size(), docs.len());
    }

    /// Serializing everything and feeding it back one by one restores the mailbox.
    #[test]
    fn prop_serialize_all_restores_order(docs in prop::collection::vec(document_strategy(), 1..10)) {
        let mut source: MessageBuffer = docs.iter().cloned().collect();
        let bytes: Vec<u8> = source.serialize(true, true).unwrap();
        prop_assert!(source.is_empty());

        let mut restored = MessageBuffer::new();
        for doc in Document::decode_stream(&bytes).unwrap() {
            restored.deserialize(doc.to_json()).unwrap();
        }
        prop_assert_eq!(restored.iter().cloned().collect::<Vec<_>>(), docs);
    }

    /// Malformed input never changes the mailbox size.
    #[test]
    fn prop_malformed_input_leaves_size(
        docs in prop::collection::vec(document_strategy(), 0..5),
        garbage in "[^{}]{1,20}",
    ) {
        let mut buffer: MessageBuffer = docs.iter().cloned().collect();
        let before = buffer.size();

        // Anything that is not an object is rejected, including valid scalars
        prop_assert!(buffer.deserialize(&garbage).is_err());
        prop_assert_eq!(buffer.size(), before);
    }
}
