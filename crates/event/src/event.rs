//! Normalized event document
//!
//! `Event` wraps a JSON object and exposes read-only, dotted-path field
//! access for route predicates. Events are immutable once constructed.

use std::fmt;

use serde_json::Value;

use crate::error::{EventError, Result};
use crate::frame;

/// One normalized unit of security telemetry
///
/// Backed by a JSON object. Construction rejects anything that is not an
/// object, so downstream code can rely on field access being meaningful.
///
/// # Ownership
///
/// An event is produced externally, owned by the inbound queue until a single
/// worker thread dequeues it, then owned by that thread for the duration of
/// dispatch. Nothing in the engine mutates an event after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    doc: Value,
}

impl Event {
    /// Create an event from a JSON value
    ///
    /// # Errors
    ///
    /// Returns `NotAnObject` if the value is not a JSON object.
    pub fn from_value(doc: Value) -> Result<Self> {
        if !doc.is_object() {
            return Err(EventError::NotAnObject);
        }
        Ok(Self { doc })
    }

    /// Parse an event from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `Parse` for invalid JSON, `NotAnObject` for non-object
    /// documents.
    pub fn from_json(input: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(input)?;
        Self::from_value(doc)
    }

    /// Parse an event from a legacy `<queue>:<location>:<payload>` frame
    ///
    /// Older collectors deliver events over a datagram socket with a one-byte
    /// queue identifier and a location prefix. The payload is parsed as JSON
    /// when possible; otherwise it is preserved verbatim under `original`.
    /// The `queue` and `location` fields are always set on the result.
    ///
    /// # Errors
    ///
    /// Returns `MalformedFrame` if the frame misses either separator.
    pub fn from_legacy_frame(input: &str) -> Result<Self> {
        frame::parse(input)
    }

    /// Access a field by dotted path
    ///
    /// Each path segment descends one level into nested objects.
    /// Returns `None` if any segment is missing or a non-object is traversed.
    #[inline]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.doc;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Get an integer field by dotted path
    #[inline]
    pub fn i64_at(&self, path: &str) -> Option<i64> {
        self.get(path)?.as_i64()
    }

    /// Get a string field by dotted path
    #[inline]
    pub fn str_at(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// Get a boolean field by dotted path
    #[inline]
    pub fn bool_at(&self, path: &str) -> Option<bool> {
        self.get(path)?.as_bool()
    }

    /// Get the underlying JSON document
    #[inline]
    pub fn as_value(&self) -> &Value {
        &self.doc
    }

    /// Consume the event and return the underlying document
    #[inline]
    pub fn into_value(self) -> Value {
        self.doc
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.doc)
    }
}

impl TryFrom<Value> for Event {
    type Error = EventError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}
