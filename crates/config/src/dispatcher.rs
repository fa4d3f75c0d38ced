//! Dispatcher configuration
//!
//! Worker pool and queue sizing for the routing engine.

use serde::Deserialize;

/// Default capacity of the inbound event queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 8192;

/// Dispatcher configuration
///
/// # Example
///
/// ```toml
/// [dispatcher]
/// threads = 4
/// queue_capacity = 8192
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Worker-thread count
    /// Default: one per available CPU core
    pub threads: Option<usize>,

    /// Inbound event queue capacity
    /// Default: 8192
    pub queue_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            threads: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl DispatcherConfig {
    /// Resolve the worker-thread count
    ///
    /// An explicit `threads` value wins; otherwise one worker per available
    /// CPU core, and at least one if parallelism cannot be queried.
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
