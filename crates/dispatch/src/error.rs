//! Dispatch error types

use thiserror::Error;

use crate::builder::CompileError;
use vigil_routing::RoutingError;

/// Result type for dispatch operations
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Errors returned by the dispatcher's administrative surface
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The dispatcher was constructed with unusable settings
    ///
    /// Fatal: raised eagerly at construction, before any thread is spawned.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// What was wrong
        reason: String,
    },

    /// `run` was called while the dispatcher is already running
    #[error("dispatcher is already running")]
    AlreadyRunning,

    /// The builder rejected a route definition
    ///
    /// No instances are installed; the table is unchanged.
    #[error(transparent)]
    Compilation(#[from] CompileError),

    /// A routing-table mutation failed (duplicate name, unknown route, ...)
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// `add_route_by_name` found no definition for the name
    #[error("no definition found for route '{name}'")]
    UnknownDefinition {
        /// Name that was looked up
        name: String,
    },

    /// The inbound event queue is closed
    #[error("event queue is closed")]
    QueueClosed,

    /// The OS refused to spawn a worker thread
    #[error("failed to spawn dispatch worker")]
    ThreadSpawn(#[source] std::io::Error),
}

impl DispatchError {
    /// Create an InvalidConfiguration error
    #[inline]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create an UnknownDefinition error
    #[inline]
    pub fn unknown_definition(name: impl Into<String>) -> Self {
        Self::UnknownDefinition { name: name.into() }
    }
}
