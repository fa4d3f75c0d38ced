//! Environment manager
//!
//! Owns the lifecycle of compiled routes: materializes one instance per
//! worker-thread slot when a route is added, tears all instances down when
//! it is removed. The manager is the only component that calls the builder.

use std::sync::Arc;

use tracing::{debug, warn};

use vigil_routing::{CompiledRoute, RouteDefinition, RouteEntry};

use crate::builder::{CompileError, RouteBuilder};

/// Lifecycle manager for compiled route instances
pub struct EnvironmentManager {
    /// External compiler for route definitions
    builder: Arc<dyn RouteBuilder>,

    /// Number of instances to build per route (= worker-thread count)
    slot_count: usize,
}

impl EnvironmentManager {
    /// Create a manager building `slot_count` instances per route
    pub fn new(builder: Arc<dyn RouteBuilder>, slot_count: usize) -> Self {
        Self {
            builder,
            slot_count,
        }
    }

    /// Number of instances built per route
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Build one compiled instance per worker slot for a definition
    ///
    /// Materialization is all-or-nothing: if the builder rejects any slot,
    /// every instance already built for this batch is discarded and nothing
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns the builder's [`CompileError`] on rejection.
    pub fn materialize(&self, definition: &RouteDefinition) -> Result<RouteEntry, CompileError> {
        let mut instances: Vec<CompiledRoute> = Vec::with_capacity(self.slot_count);

        for slot in 0..self.slot_count {
            match self.builder.compile(definition) {
                Ok(instance) => instances.push(instance),
                Err(error) => {
                    warn!(
                        route = %definition.name,
                        slot,
                        built = instances.len(),
                        "builder rejected definition, discarding partial batch"
                    );
                    return Err(error);
                }
            }
        }

        debug!(
            route = %definition.name,
            slots = self.slot_count,
            "materialized compiled route instances"
        );
        Ok(RouteEntry::new(instances))
    }

    /// Tear down all instances of a removed route
    ///
    /// Best-effort: the route is already unreachable from the table, so
    /// teardown outcomes are logged, never propagated.
    pub fn release(&self, name: &str, entry: RouteEntry) {
        let slots = entry.slot_count();
        drop(entry);
        debug!(route = name, slots, "released compiled route instances");
    }
}

impl std::fmt::Debug for EnvironmentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentManager")
            .field("slot_count", &self.slot_count)
            .finish()
    }
}
