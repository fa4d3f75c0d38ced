//! Compiled routes and per-thread instance slots
//!
//! The external builder turns a [`RouteDefinition`](crate::RouteDefinition)
//! into executable pipeline instances. Pipelines may hold mutable internal
//! state and are not required to be thread-safe, so every route is
//! materialized once per worker thread: a [`RouteEntry`] is a fixed-length
//! array of instances, addressed by the worker's slot index.

use parking_lot::Mutex;

use vigil_event::Event;

use crate::error::PipelineError;

/// Capability surface of one compiled route instance
///
/// The dispatcher only needs two operations: evaluate the match predicate,
/// and run the pipeline against a matched event. Pipeline internals and side
/// effects are not interpreted by the engine.
///
/// Implementations must be `Send` (instances move to worker threads) but are
/// deliberately not required to be `Sync`: slot replication guarantees a
/// single evaluating thread per instance.
pub trait RoutePipeline: Send {
    /// Evaluate the route's predicate against an event
    fn matches(&self, event: &Event) -> bool;

    /// Run the pipeline against a matched event
    ///
    /// # Errors
    ///
    /// A returned error is a transient, per-event failure. It is contained
    /// by the caller and never aborts the worker or other routes.
    fn process(&mut self, event: &Event) -> Result<(), PipelineError>;
}

/// An executable route instance produced by the builder
pub type CompiledRoute = Box<dyn RoutePipeline>;

/// All per-thread instances of one installed route
///
/// Slot *i* is only ever evaluated by worker thread *i*, so its mutex is
/// uncontended; it exists to make the exclusive-slot invariant expressible
/// in safe Rust while the entry lives in the shared table.
pub struct RouteEntry {
    slots: Vec<Mutex<CompiledRoute>>,
}

impl RouteEntry {
    /// Create an entry from one compiled instance per worker slot
    pub fn new(instances: Vec<CompiledRoute>) -> Self {
        Self {
            slots: instances.into_iter().map(Mutex::new).collect(),
        }
    }

    /// Number of worker slots this entry was built for
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Evaluate the instance at `slot` against an event
    ///
    /// Returns `None` when the predicate does not match (or the slot index
    /// is out of range), `Some(result)` of the pipeline run otherwise.
    pub(crate) fn dispatch(&self, slot: usize, event: &Event) -> Option<Result<(), PipelineError>> {
        let mut instance = self.slots.get(slot)?.lock();
        if !instance.matches(event) {
            return None;
        }
        Some(instance.process(event))
    }
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("slot_count", &self.slots.len())
            .finish()
    }
}
