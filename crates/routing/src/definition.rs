//! Declarative route definitions
//!
//! A `RouteDefinition` pairs a name with a filter document and a pipeline
//! reference. The filter and pipeline parts are owned by the external
//! builder; the routing engine treats them as opaque.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, RoutingError};

/// Immutable declarative specification of one route
///
/// Supplied by the administrative layer either as a structured document or
/// looked up by name from an external store. Names must be non-empty and are
/// unique within a routing table.
///
/// # Example
///
/// ```
/// use vigil_routing::RouteDefinition;
///
/// let definition = RouteDefinition::from_json(r#"{
///     "name": "alert-high-sev",
///     "filter": { "field": "severity", "gte": 8 },
///     "pipeline": "alerting/default"
/// }"#).unwrap();
///
/// assert_eq!(definition.name, "alert-high-sev");
/// assert_eq!(definition.pipeline, "alerting/default");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Route name, unique within a table
    pub name: String,

    /// Match predicate specification, opaque to the engine
    #[serde(default)]
    pub filter: Value,

    /// Reference to the processing pipeline asset
    pub pipeline: String,
}

impl RouteDefinition {
    /// Create a definition from its parts
    pub fn new(name: impl Into<String>, filter: Value, pipeline: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filter,
            pipeline: pipeline.into(),
        }
    }

    /// Parse a definition from a JSON document and validate it
    ///
    /// # Errors
    ///
    /// Returns `InvalidDefinition` for malformed documents and `EmptyName`
    /// for definitions without a name.
    pub fn from_json(input: &str) -> Result<Self> {
        let definition: Self =
            serde_json::from_str(input).map_err(|e| RoutingError::invalid_definition(e.to_string()))?;
        definition.validate()?;
        Ok(definition)
    }

    /// Check the definition invariants the engine relies on
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` if the name is empty.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(RoutingError::EmptyName);
        }
        Ok(())
    }
}
