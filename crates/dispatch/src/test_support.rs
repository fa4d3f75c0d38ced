//! Shared fixtures for the dispatch tests
//!
//! A minimal in-process builder: filters of the form
//! `{"field": "...", "gte": N}` compile to a threshold predicate, and the
//! pipeline reference selects the behavior (`record` reports processed
//! events on a channel, `fail` returns a pipeline error).

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use serde_json::json;

use vigil_event::Event;
use vigil_routing::{CompiledRoute, PipelineError, RouteDefinition, RoutePipeline};

use crate::builder::{CompileError, DefinitionStore, RouteBuilder};

/// Compiled test route: threshold predicate plus a reporting channel
pub(crate) struct ThresholdPipeline {
    route: String,
    field: String,
    threshold: i64,
    fail: bool,
    events: Option<Sender<(String, i64)>>,
    live: Arc<AtomicUsize>,
}

impl RoutePipeline for ThresholdPipeline {
    fn matches(&self, event: &Event) -> bool {
        event
            .i64_at(&self.field)
            .is_some_and(|value| value >= self.threshold)
    }

    fn process(&mut self, event: &Event) -> Result<(), PipelineError> {
        if self.fail {
            return Err(PipelineError::new("injected pipeline failure"));
        }
        if let Some(events) = &self.events {
            let id = event.i64_at("id").unwrap_or(-1);
            let _ = events.send((self.route.clone(), id));
        }
        Ok(())
    }
}

impl Drop for ThresholdPipeline {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Test builder tracking how many instances it built and how many are alive
pub(crate) struct TestBuilder {
    compile_calls: AtomicUsize,
    live: Arc<AtomicUsize>,
    /// Compile calls accepted before rejection kicks in
    fail_after: usize,
    events: Option<Sender<(String, i64)>>,
}

impl TestBuilder {
    pub(crate) fn new() -> Self {
        Self {
            compile_calls: AtomicUsize::new(0),
            live: Arc::new(AtomicUsize::new(0)),
            fail_after: usize::MAX,
            events: None,
        }
    }

    /// Builder whose pipelines report processed events on `events`
    pub(crate) fn recording(events: Sender<(String, i64)>) -> Self {
        Self {
            events: Some(events),
            ..Self::new()
        }
    }

    /// Builder that accepts `accepted` compile calls, then rejects
    pub(crate) fn failing_after(accepted: usize) -> Self {
        Self {
            fail_after: accepted,
            ..Self::new()
        }
    }

    /// Total compile calls observed
    pub(crate) fn compile_calls(&self) -> usize {
        self.compile_calls.load(Ordering::SeqCst)
    }

    /// Instances built and not yet dropped
    pub(crate) fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl RouteBuilder for TestBuilder {
    fn compile(&self, definition: &RouteDefinition) -> Result<CompiledRoute, CompileError> {
        let call = self.compile_calls.fetch_add(1, Ordering::SeqCst);
        if call >= self.fail_after {
            return Err(CompileError::new(
                &definition.name,
                "injected compile failure",
            ));
        }

        let field = definition
            .filter
            .get("field")
            .and_then(|v| v.as_str())
            .unwrap_or("severity")
            .to_string();
        let threshold = definition
            .filter
            .get("gte")
            .and_then(|v| v.as_i64())
            .unwrap_or(i64::MIN);

        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ThresholdPipeline {
            route: definition.name.clone(),
            field,
            threshold,
            fail: definition.pipeline == "fail",
            events: self.events.clone(),
            live: Arc::clone(&self.live),
        }))
    }
}

/// In-memory definition store
pub(crate) struct MapStore {
    definitions: HashMap<String, RouteDefinition>,
}

impl MapStore {
    pub(crate) fn new(definitions: Vec<RouteDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|d| (d.name.clone(), d))
                .collect(),
        }
    }
}

impl DefinitionStore for MapStore {
    fn lookup(&self, name: &str) -> Option<RouteDefinition> {
        self.definitions.get(name).cloned()
    }
}

/// Definition matching events with `severity >= gte`
pub(crate) fn definition(name: &str, gte: i64) -> RouteDefinition {
    RouteDefinition::new(name, json!({"field": "severity", "gte": gte}), "record")
}

/// Definition whose pipeline fails on every matched event
pub(crate) fn failing_definition(name: &str, gte: i64) -> RouteDefinition {
    RouteDefinition::new(name, json!({"field": "severity", "gte": gte}), "fail")
}

/// Event with an id and a severity
pub(crate) fn event(id: i64, severity: i64) -> Event {
    Event::from_value(json!({"id": id, "severity": severity})).unwrap()
}
