//! Shared routing table
//!
//! Maps route names to their per-thread compiled instances. This is the only
//! mutable state shared between the dispatch workers and the control plane.
//!
//! Dispatch happens on every event (hot), administrative changes are rare
//! (cold), so the table is guarded by a reader/writer lock rather than a
//! plain mutex: concurrent dispatch cycles and listings never serialize
//! against each other.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::warn;

use vigil_event::Event;

use crate::error::{Result, RoutingError};
use crate::route::RouteEntry;

/// Outcome of evaluating one event against every route at one slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotDispatch {
    /// Routes whose predicate matched the event
    pub matched: usize,
    /// Matched routes whose pipeline returned an error
    pub failed: usize,
}

/// Thread-safe mapping from route name to per-slot compiled instances
///
/// # Locking discipline
///
/// - `list`, `contains`, `len` and `dispatch_slot` take the shared lock and
///   may run concurrently with each other.
/// - `insert` and `remove` take the exclusive lock; each is atomic, so
///   readers never observe a partially installed route.
/// - No method holds a lock across a blocking wait, and `dispatch_slot`
///   releases the shared lock before returning.
pub struct RouteTable {
    /// Worker-thread count every entry must match
    slot_count: usize,

    /// Installed routes
    routes: RwLock<HashMap<String, RouteEntry>>,
}

impl RouteTable {
    /// Create an empty table for `slot_count` worker threads
    pub fn new(slot_count: usize) -> Self {
        Self {
            slot_count,
            routes: RwLock::new(HashMap::new()),
        }
    }

    /// Worker-thread count this table was created for
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Snapshot of the currently installed route names, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.routes.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Check whether a route is installed
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.routes.read().contains_key(name)
    }

    /// Number of installed routes
    #[inline]
    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    /// Check if no routes are installed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }

    /// Install all slot instances for a route atomically
    ///
    /// # Errors
    ///
    /// On `DuplicateRoute` or `SlotCountMismatch` the entry is handed back to
    /// the caller so its instances can be torn down; the table is unchanged.
    pub fn insert(
        &self,
        name: &str,
        entry: RouteEntry,
    ) -> std::result::Result<(), (RoutingError, RouteEntry)> {
        if entry.slot_count() != self.slot_count {
            return Err((
                RoutingError::SlotCountMismatch {
                    expected: self.slot_count,
                    actual: entry.slot_count(),
                },
                entry,
            ));
        }

        let mut routes = self.routes.write();
        if routes.contains_key(name) {
            return Err((RoutingError::duplicate_route(name), entry));
        }

        routes.insert(name.to_string(), entry);
        Ok(())
    }

    /// Remove a route, returning its instances for teardown
    ///
    /// # Errors
    ///
    /// Returns `RouteNotFound` if the name is absent; the table is unchanged.
    pub fn remove(&self, name: &str) -> Result<RouteEntry> {
        self.routes
            .write()
            .remove(name)
            .ok_or_else(|| RoutingError::route_not_found(name))
    }

    /// Evaluate one event against every route's instance at `slot`
    ///
    /// This is the hot path. It holds the shared lock for exactly one
    /// dispatch cycle: every installed route is evaluated (no first-match
    /// short-circuit, no inter-route ordering guarantee), per-route pipeline
    /// failures are logged and counted but never propagated, and the lock is
    /// released before returning.
    pub fn dispatch_slot(&self, slot: usize, event: &Event) -> SlotDispatch {
        let routes = self.routes.read();
        let mut outcome = SlotDispatch::default();

        for (name, entry) in routes.iter() {
            match entry.dispatch(slot, event) {
                None => {}
                Some(Ok(())) => {
                    outcome.matched += 1;
                }
                Some(Err(error)) => {
                    outcome.matched += 1;
                    outcome.failed += 1;
                    warn!(route = %name, slot, %error, "pipeline failed for event");
                }
            }
        }

        outcome
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("slot_count", &self.slot_count)
            .field("routes", &self.len())
            .finish()
    }
}
