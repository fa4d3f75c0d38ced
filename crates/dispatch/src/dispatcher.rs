//! Worker-thread dispatcher
//!
//! Owns the routing table, the environment manager and a fixed pool of
//! worker threads. Each worker blocks on the inbound queue, evaluates every
//! installed route at its own slot index, and loops. The administrative
//! surface (add/remove/list, run/stop) mutates the table under its exclusive
//! lock and never stalls the dispatch hot path for longer than one map
//! operation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{debug, error, info, trace};

use vigil_routing::{RouteDefinition, RouteTable};

use crate::builder::{DefinitionStore, RouteBuilder};
use crate::error::{DispatchError, Result};
use crate::manager::EnvironmentManager;
use crate::metrics::{DispatchMetrics, DispatchSnapshot};
use crate::queue::{EventQueue, QueueItem};

/// The event-routing dispatcher
///
/// # Lifecycle
///
/// `Created → Running → Stopped`, driven by [`run`](Self::run) and
/// [`stop`](Self::stop). Routes may be added and removed in any state;
/// routes added before `run` are active once it is called. A stopped
/// dispatcher can be run again with a fresh (or fully drained) queue.
///
/// # Concurrency
///
/// `add_route`/`remove_route`/`list_routes`/`metrics` take `&self` and are
/// safe to call from any thread, concurrently with dispatch. `run` and
/// `stop` take `&mut self`: starting and stopping belong to the single
/// owner of the dispatcher.
pub struct Dispatcher {
    /// Shared routing table, read by every worker on every event
    table: Arc<RouteTable>,

    /// Lifecycle manager for compiled instances (sole builder caller)
    manager: EnvironmentManager,

    /// Optional definition lookup for `add_route_by_name`
    store: Option<Arc<dyn DefinitionStore>>,

    /// Hot-path and control-plane counters
    metrics: Arc<DispatchMetrics>,

    /// Running flag; written by run/stop only
    running: Arc<AtomicBool>,

    /// Worker threads of the current run cycle
    workers: Vec<JoinHandle<()>>,

    /// Queue handle kept for shutdown sentinels
    queue: Option<EventQueue>,

    /// Fixed worker-thread count
    threads: usize,
}

impl Dispatcher {
    /// Create a dispatcher with the given builder and worker-thread count
    ///
    /// No threads are spawned until [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `threads` is zero. Detected before
    /// any table or manager resource is allocated.
    pub fn new(builder: Arc<dyn RouteBuilder>, threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(DispatchError::invalid_configuration(
                "worker thread count must be greater than zero",
            ));
        }

        Ok(Self {
            table: Arc::new(RouteTable::new(threads)),
            manager: EnvironmentManager::new(builder, threads),
            store: None,
            metrics: Arc::new(DispatchMetrics::new()),
            running: Arc::new(AtomicBool::new(false)),
            workers: Vec::new(),
            queue: None,
            threads,
        })
    }

    /// Attach a definition store for [`add_route_by_name`](Self::add_route_by_name)
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn DefinitionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Worker-thread count this dispatcher was configured with
    #[inline]
    pub fn thread_count(&self) -> usize {
        self.threads
    }

    /// Check whether the dispatcher is currently running
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Get a snapshot of the dispatch counters
    #[inline]
    pub fn metrics(&self) -> DispatchSnapshot {
        self.metrics.snapshot()
    }

    /// Add a route from its definition
    ///
    /// Builds one compiled instance per worker slot, then installs them
    /// atomically. On a duplicate name the freshly built instances are
    /// released and the error returned; the table is unchanged.
    ///
    /// # Errors
    ///
    /// `Routing(EmptyName)` for invalid definitions, `Compilation` if the
    /// builder rejects the definition, `Routing(DuplicateRoute)` if the name
    /// is already installed.
    pub fn add_route(&self, definition: &RouteDefinition) -> Result<()> {
        definition.validate()?;

        let entry = self.manager.materialize(definition)?;

        match self.table.insert(&definition.name, entry) {
            Ok(()) => {
                self.metrics.record_route_added();
                info!(
                    route = %definition.name,
                    pipeline = %definition.pipeline,
                    slots = self.threads,
                    "route added"
                );
                Ok(())
            }
            Err((routing_error, rejected)) => {
                self.manager.release(&definition.name, rejected);
                Err(routing_error.into())
            }
        }
    }

    /// Add a route by name, resolving its definition from the store
    ///
    /// # Errors
    ///
    /// `UnknownDefinition` if no store is attached or the name is absent;
    /// otherwise as [`add_route`](Self::add_route).
    pub fn add_route_by_name(&self, name: &str) -> Result<()> {
        let definition = self
            .store
            .as_ref()
            .and_then(|store| store.lookup(name))
            .ok_or_else(|| DispatchError::unknown_definition(name))?;

        self.add_route(&definition)
    }

    /// Remove a route and tear down its compiled instances
    ///
    /// # Errors
    ///
    /// `Routing(RouteNotFound)` if the name is absent; the table is
    /// unchanged (idempotent failure).
    pub fn remove_route(&self, name: &str) -> Result<()> {
        let entry = self.table.remove(name)?;
        self.manager.release(name, entry);
        self.metrics.record_route_removed();
        info!(route = name, "route removed");
        Ok(())
    }

    /// List the names of all installed routes
    #[inline]
    pub fn list_routes(&self) -> Vec<String> {
        self.table.list()
    }

    /// Start dispatching events from the queue
    ///
    /// Spawns exactly the configured number of worker threads, each bound
    /// to a fixed slot index for this run cycle.
    ///
    /// # Errors
    ///
    /// `AlreadyRunning` if called while running; `ThreadSpawn` if the OS
    /// refuses a worker thread (any workers already spawned are stopped
    /// before returning).
    pub fn run(&mut self, queue: EventQueue) -> Result<()> {
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(DispatchError::AlreadyRunning);
        }

        info!(
            threads = self.threads,
            routes = self.table.len(),
            "dispatcher starting"
        );

        for slot in 0..self.threads {
            let table = Arc::clone(&self.table);
            let metrics = Arc::clone(&self.metrics);
            let worker_queue = queue.clone();

            let spawned = std::thread::Builder::new()
                .name(format!("vigil-dispatch-{slot}"))
                .spawn(move || worker_loop(slot, worker_queue, table, metrics));

            match spawned {
                Ok(handle) => self.workers.push(handle),
                Err(io_error) => {
                    // Unwind the partial pool before reporting the failure.
                    self.queue = Some(queue);
                    self.stop();
                    return Err(DispatchError::ThreadSpawn(io_error));
                }
            }
        }

        self.queue = Some(queue);
        Ok(())
    }

    /// Stop dispatching and join every worker thread
    ///
    /// Wakes all blocked workers with queue sentinels and returns only once
    /// every worker has exited: callers may rely on no further dispatch
    /// activity afterwards. Events already queued ahead of the sentinels are
    /// still dispatched. Idempotent.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }

        if let Some(queue) = &self.queue {
            queue.interrupt(self.workers.len());
        }

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("dispatch worker panicked");
            }
        }
        self.queue = None;

        info!("dispatcher stopped");
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("threads", &self.threads)
            .field("routes", &self.table.len())
            .field("running", &self.is_running())
            .finish()
    }
}

/// Per-thread dispatch loop
///
/// The blocking dequeue is the only suspension point; once an event is
/// received the cycle runs to completion, and the table's shared lock is
/// never held across the blocking wait. Exits on the shutdown sentinel.
fn worker_loop(
    slot: usize,
    queue: EventQueue,
    table: Arc<RouteTable>,
    metrics: Arc<DispatchMetrics>,
) {
    debug!(slot, "dispatch worker started");

    loop {
        match queue.pop() {
            QueueItem::Shutdown => break,
            QueueItem::Event(event) => {
                let outcome = table.dispatch_slot(slot, &event);
                metrics.record_dispatch(outcome.matched, outcome.failed);

                if outcome.matched == 0 {
                    trace!(slot, "event matched no route");
                }
            }
        }
    }

    debug!(slot, "dispatch worker stopped");
}
