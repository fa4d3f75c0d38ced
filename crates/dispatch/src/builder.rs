//! External collaborator seams
//!
//! The dispatcher does not compile route definitions itself and does not
//! store them. Both concerns are behind traits: [`RouteBuilder`] turns a
//! definition into an executable instance, [`DefinitionStore`] resolves a
//! definition by name for `add_route_by_name`.

use thiserror::Error;

use vigil_routing::{CompiledRoute, RouteDefinition};

/// Compiler for route definitions
///
/// Called by the [`EnvironmentManager`](crate::EnvironmentManager) once per
/// worker-thread slot per route. Each call is synchronous; implementations
/// must tolerate concurrent calls for different routes.
pub trait RouteBuilder: Send + Sync {
    /// Compile a definition into one executable route instance
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if the definition is rejected (bad syntax,
    /// unknown asset reference, invalid pipeline graph).
    fn compile(&self, definition: &RouteDefinition) -> Result<CompiledRoute, CompileError>;
}

/// Lookup of route definitions by name
///
/// Backs `add_route_by_name`; typically implemented over the deployment's
/// asset catalog. Persistence of definitions is outside the engine.
pub trait DefinitionStore: Send + Sync {
    /// Resolve a definition by route name
    fn lookup(&self, name: &str) -> Option<RouteDefinition>;
}

/// Rejection detail from the builder
#[derive(Debug, Error)]
#[error("route '{name}' failed to compile: {detail}")]
pub struct CompileError {
    /// Name of the rejected route
    name: String,
    /// Builder-supplied detail
    detail: String,
}

impl CompileError {
    /// Create a new compile error
    pub fn new(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: detail.into(),
        }
    }

    /// Name of the rejected route
    #[inline]
    pub fn route(&self) -> &str {
        &self.name
    }

    /// Builder-supplied rejection detail
    #[inline]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}
