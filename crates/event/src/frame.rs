//! Legacy datagram frame parsing
//!
//! Older collectors deliver events as `<queue>:<location>:<payload>` text
//! frames over a local datagram socket. The queue identifier is a single
//! character, the location names the producing module, and the payload is
//! the event body. Keep-alive frames carry no event and are skipped by the
//! ingest layer.

use serde_json::{Map, Value};

use crate::error::{EventError, Result};
use crate::event::Event;

/// Marker that a collector writes into the location slot of a keep-alive
const KEEPALIVE: &str = "keepalive";

/// Check whether a frame is a keep-alive
///
/// Keep-alive frames exist only to hold the transport open; they carry no
/// event and must not reach the dispatcher. Collectors mark them in the
/// location slot, directly after the queue prefix, and may omit the payload
/// entirely.
#[inline]
pub fn is_keepalive(frame: &str) -> bool {
    match frame.split_once(':') {
        Some((queue, rest)) if queue.len() == 1 => rest.starts_with(KEEPALIVE),
        _ => false,
    }
}

/// Parse a legacy frame into an [`Event`]
pub(crate) fn parse(frame: &str) -> Result<Event> {
    let (queue, location, payload) = split(frame)?;

    // JSON payloads become the event body; anything else is preserved raw.
    let mut doc = match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => map,
        _ => {
            let mut map = Map::new();
            map.insert("original".into(), Value::String(payload.to_string()));
            map
        }
    };

    doc.entry("queue")
        .or_insert_with(|| Value::String(queue.to_string()));
    doc.entry("location")
        .or_insert_with(|| Value::String(location.to_string()));

    Event::from_value(Value::Object(doc))
}

/// Split a frame into its queue, location and payload parts
fn split(frame: &str) -> Result<(&str, &str, &str)> {
    let (queue, rest) = frame
        .split_once(':')
        .ok_or_else(|| EventError::malformed_frame("missing queue separator"))?;

    if queue.len() != 1 {
        return Err(EventError::malformed_frame(
            "queue identifier must be a single character",
        ));
    }

    let (location, payload) = rest
        .split_once(':')
        .ok_or_else(|| EventError::malformed_frame("missing location separator"))?;

    if location.is_empty() {
        return Err(EventError::malformed_frame("empty location"));
    }

    Ok((queue, location, payload))
}
