//! Vigil - Routing
//!
//! The mutable routing state shared across dispatch worker threads: route
//! definitions, compiled per-thread route instances, and the [`RouteTable`]
//! that maps route names to them.
//!
//! # Design
//!
//! Dispatch reads the table on every event; administrative changes are rare.
//! The table therefore uses a reader/writer lock: dispatch lookups and
//! listings proceed concurrently, while insert/remove take the exclusive
//! lock and are atomic - readers never observe a half-installed route.
//!
//! Compiled pipelines are not required to be thread-safe. Each route owns a
//! fixed-length array of instances, one per worker thread, and worker *i*
//! only ever evaluates slot *i*. Pipeline evaluation needs no shared-state
//! locking as a result.
//!
//! # Example
//!
//! ```
//! use vigil_routing::{RouteDefinition, RouteTable};
//!
//! let table = RouteTable::new(4);
//! assert!(table.is_empty());
//!
//! let definition = RouteDefinition::from_json(
//!     r#"{"name": "alerts", "filter": {"field": "severity"}, "pipeline": "default"}"#,
//! ).unwrap();
//! assert_eq!(definition.name, "alerts");
//! ```

mod definition;
mod error;
mod route;
mod table;

pub use definition::RouteDefinition;
pub use error::{PipelineError, Result, RoutingError};
pub use route::{CompiledRoute, RouteEntry, RoutePipeline};
pub use table::{RouteTable, SlotDispatch};

// Re-export the event type routes evaluate against
pub use vigil_event::Event;
