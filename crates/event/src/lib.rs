//! Vigil - Event model
//!
//! Normalized security events as they flow through the routing engine.
//! An [`Event`] is a self-contained JSON document: produced by an external
//! normalization layer, owned by the inbound queue until dequeued by exactly
//! one worker thread, and never mutated concurrently.
//!
//! # Design
//!
//! - Events are opaque to the dispatcher: route predicates read fields,
//!   nothing in this crate interprets them.
//! - Field access uses dotted paths (`"data.severity"`) so predicates can
//!   address nested documents without knowing the schema.
//! - The legacy datagram framing (`<queue>:<location>:<payload>`) used by
//!   older collectors is supported through [`Event::from_legacy_frame`].
//!
//! # Example
//!
//! ```
//! use vigil_event::Event;
//!
//! let event = Event::from_json(r#"{"severity": 9, "data": {"rule": "ssh"}}"#).unwrap();
//! assert_eq!(event.i64_at("severity"), Some(9));
//! assert_eq!(event.str_at("data.rule"), Some("ssh"));
//! ```

mod error;
mod event;
mod frame;

pub use error::{EventError, Result};
pub use event::Event;
pub use frame::is_keepalive;
