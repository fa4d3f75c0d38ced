//! Routing error types

use thiserror::Error;

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors that can occur while mutating or validating routing state
#[derive(Debug, Error)]
pub enum RoutingError {
    /// A route with this name is already installed
    #[error("route '{name}' already exists")]
    DuplicateRoute {
        /// Name of the conflicting route
        name: String,
    },

    /// No route with this name is installed
    #[error("route '{name}' not found")]
    RouteNotFound {
        /// Name that was looked up
        name: String,
    },

    /// A route definition was supplied with an empty name
    #[error("route name must not be empty")]
    EmptyName,

    /// An entry was built for a different worker-thread count than the table
    #[error("route entry has {actual} slots, table expects {expected}")]
    SlotCountMismatch {
        /// Slot count the table was created with
        expected: usize,
        /// Slot count of the rejected entry
        actual: usize,
    },

    /// A route definition document could not be parsed
    #[error("invalid route definition: {reason}")]
    InvalidDefinition {
        /// Parser detail
        reason: String,
    },
}

impl RoutingError {
    /// Create a DuplicateRoute error
    #[inline]
    pub fn duplicate_route(name: impl Into<String>) -> Self {
        Self::DuplicateRoute { name: name.into() }
    }

    /// Create a RouteNotFound error
    #[inline]
    pub fn route_not_found(name: impl Into<String>) -> Self {
        Self::RouteNotFound { name: name.into() }
    }

    /// Create an InvalidDefinition error
    #[inline]
    pub fn invalid_definition(reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            reason: reason.into(),
        }
    }
}

/// Error raised by a pipeline while processing a single event
///
/// These are transient, per-event failures. The dispatcher contains them to
/// the failing route and event: they are logged and counted, never
/// propagated to other routes or to the worker loop.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct PipelineError(String);

impl PipelineError {
    /// Create a new pipeline error
    #[inline]
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}
