//! Vigil - Dispatch
//!
//! The event-routing core: a fixed pool of worker threads draining a shared
//! inbound queue and forwarding each event to every installed route whose
//! predicate matches it.
//!
//! # Architecture
//!
//! ```text
//! [Producers]                [Dispatcher]                    [Pipelines]
//!    agent ──┐                                            ┌──→ alerting
//!    syslog ─┼──→ EventQueue ──→ worker i ──→ RouteTable ──┼──→ archiving
//!    api ────┘     (blocking      (slot i)    (RwLock)    └──→ forwarding
//!                   MPMC)
//! ```
//!
//! # Key design
//!
//! - **Fixed worker pool**: thread count is set at construction; each worker
//!   owns a slot index for the lifetime of the run cycle.
//! - **Per-slot replication**: the [`EnvironmentManager`] builds one pipeline
//!   instance per worker, so evaluation needs no shared-state locking.
//! - **Hot-read table**: route lookups take a shared lock; add/remove take
//!   the exclusive lock and are atomic.
//! - **Data-driven shutdown**: [`Dispatcher::stop`] wakes every blocked
//!   worker with a queue sentinel and joins them before returning.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vigil_dispatch::{Dispatcher, EventQueue};
//!
//! let mut dispatcher = Dispatcher::new(builder, 4)?;
//! dispatcher.add_route(&definition)?;
//!
//! let queue = EventQueue::bounded(8192);
//! dispatcher.run(queue.clone())?;
//!
//! queue.push(event)?;
//! dispatcher.stop();
//! ```

mod builder;
mod dispatcher;
mod error;
mod manager;
mod metrics;
mod queue;

pub use builder::{CompileError, DefinitionStore, RouteBuilder};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, Result};
pub use manager::EnvironmentManager;
pub use metrics::{DispatchMetrics, DispatchSnapshot};
pub use queue::EventQueue;

// Re-export the types the administrative surface exchanges
pub use vigil_event::Event;
pub use vigil_routing::{CompiledRoute, PipelineError, RouteDefinition, RoutePipeline};

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod dispatcher_test;
#[cfg(test)]
mod manager_test;
