//! Dispatcher metrics
//!
//! Atomic counters for the dispatch hot path and control plane.
//! All operations use relaxed ordering; values are eventually consistent.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between the worker threads and the control plane
///
/// Safe to read and update from any thread concurrently.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Events dequeued by any worker
    events_received: AtomicU64,

    /// Events that matched at least one route
    events_dispatched: AtomicU64,

    /// Events that matched no route
    events_unmatched: AtomicU64,

    /// Total route matches across all events (one event can match several)
    route_matches: AtomicU64,

    /// Per-event pipeline failures (contained, never fatal)
    pipeline_failures: AtomicU64,

    /// Routes added over the dispatcher's lifetime
    routes_added: AtomicU64,

    /// Routes removed over the dispatcher's lifetime
    routes_removed: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics with all counters at zero
    pub const fn new() -> Self {
        Self {
            events_received: AtomicU64::new(0),
            events_dispatched: AtomicU64::new(0),
            events_unmatched: AtomicU64::new(0),
            route_matches: AtomicU64::new(0),
            pipeline_failures: AtomicU64::new(0),
            routes_added: AtomicU64::new(0),
            routes_removed: AtomicU64::new(0),
        }
    }

    /// Record the outcome of one dispatch cycle
    #[inline]
    pub fn record_dispatch(&self, matched: usize, failed: usize) {
        self.events_received.fetch_add(1, Ordering::Relaxed);

        if matched == 0 {
            self.events_unmatched.fetch_add(1, Ordering::Relaxed);
        } else {
            self.events_dispatched.fetch_add(1, Ordering::Relaxed);
            self.route_matches
                .fetch_add(matched as u64, Ordering::Relaxed);
        }

        if failed > 0 {
            self.pipeline_failures
                .fetch_add(failed as u64, Ordering::Relaxed);
        }
    }

    /// Record a successful route addition
    #[inline]
    pub fn record_route_added(&self) {
        self.routes_added.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful route removal
    #[inline]
    pub fn record_route_removed(&self) {
        self.routes_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a point-in-time snapshot of all counters
    pub fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            events_unmatched: self.events_unmatched.load(Ordering::Relaxed),
            route_matches: self.route_matches.load(Ordering::Relaxed),
            pipeline_failures: self.pipeline_failures.load(Ordering::Relaxed),
            routes_added: self.routes_added.load(Ordering::Relaxed),
            routes_removed: self.routes_removed.load(Ordering::Relaxed),
        }
    }
}

/// Copyable point-in-time view of [`DispatchMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSnapshot {
    /// Events dequeued by any worker
    pub events_received: u64,
    /// Events that matched at least one route
    pub events_dispatched: u64,
    /// Events that matched no route
    pub events_unmatched: u64,
    /// Total route matches across all events
    pub route_matches: u64,
    /// Contained per-event pipeline failures
    pub pipeline_failures: u64,
    /// Routes added
    pub routes_added: u64,
    /// Routes removed
    pub routes_removed: u64,
}
