//! Structured message payloads
//!
//! A [`Document`] is a JSON object. The mailbox only needs to copy
//! documents, test them for a key and move them in and out of a textual or
//! byte representation, all of which `serde_json` provides.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BufferError, Result};

/// A JSON object carried through a mailbox
///
/// # Example
///
/// ```rust
/// use message_buffer::Document;
/// use serde_json::json;
///
/// let mut doc = Document::new();
/// doc.insert("temperature", json!(21.5));
///
/// assert!(doc.contains_key("temperature"));
/// assert_eq!(doc.to_json(), r#"{"temperature":21.5}"#);
///
/// let parsed = Document::from_json(&doc.to_json()).unwrap();
/// assert_eq!(parsed, doc);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build from any JSON value; only objects are accepted
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(BufferError::NotAnObject {
                found: kind_of(&other),
            }),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_slice(text.as_bytes())
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Parse an accumulated representation: zero or more documents written
    /// back to back, as produced by serializing a whole mailbox
    pub fn decode_stream(bytes: &[u8]) -> Result<Vec<Self>> {
        serde_json::Deserializer::from_slice(bytes)
            .into_iter::<Value>()
            .map(|value| Self::from_value(value?))
            .collect()
    }

    /// Compact JSON text
    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Document {
    type Error = BufferError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Caller-chosen representation a mailbox serializes into
///
/// Serializing several documents appends them back to back, which
/// [`Document::decode_stream`] reads back.
pub trait Encoded: Default {
    fn push_document(&mut self, document: &Document);
}

impl Encoded for String {
    fn push_document(&mut self, document: &Document) {
        self.push_str(&document.to_json());
    }
}

impl Encoded for Vec<u8> {
    fn push_document(&mut self, document: &Document) {
        self.extend_from_slice(document.to_json().as_bytes());
    }
}
