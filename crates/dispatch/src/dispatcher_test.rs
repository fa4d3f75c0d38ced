use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_channel::unbounded;

use vigil_routing::RoutingError;

use crate::error::DispatchError;
use crate::queue::EventQueue;
use crate::test_support::{definition, event, failing_definition, MapStore, TestBuilder};
use crate::Dispatcher;

#[test]
fn test_zero_threads_rejected() {
    let err = Dispatcher::new(Arc::new(TestBuilder::new()), 0).unwrap_err();
    assert!(matches!(err, DispatchError::InvalidConfiguration { .. }));
}

#[test]
fn test_add_route_materializes_one_instance_per_thread() {
    let builder = Arc::new(TestBuilder::new());
    let dispatcher = Dispatcher::new(builder.clone(), 4).unwrap();

    dispatcher.add_route(&definition("alerts", 8)).unwrap();

    assert_eq!(builder.compile_calls(), 4);
    assert_eq!(builder.live(), 4);
    assert_eq!(dispatcher.list_routes(), vec!["alerts".to_string()]);
}

#[test]
fn test_add_route_rejects_empty_name() {
    let dispatcher = Dispatcher::new(Arc::new(TestBuilder::new()), 2).unwrap();
    let err = dispatcher.add_route(&definition("", 0)).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Routing(RoutingError::EmptyName)
    ));
}

#[test]
fn test_duplicate_route_releases_new_instances() {
    let builder = Arc::new(TestBuilder::new());
    let dispatcher = Dispatcher::new(builder.clone(), 3).unwrap();

    dispatcher.add_route(&definition("alerts", 8)).unwrap();
    let err = dispatcher.add_route(&definition("alerts", 5)).unwrap_err();

    assert!(matches!(
        err,
        DispatchError::Routing(RoutingError::DuplicateRoute { .. })
    ));
    // The rejected batch was built and then torn down; the installed one stays.
    assert_eq!(builder.compile_calls(), 6);
    assert_eq!(builder.live(), 3);
    assert_eq!(dispatcher.list_routes(), vec!["alerts".to_string()]);
}

#[test]
fn test_compile_failure_discards_partial_batch() {
    // Accept two compile calls, reject the third of four.
    let builder = Arc::new(TestBuilder::failing_after(2));
    let dispatcher = Dispatcher::new(builder.clone(), 4).unwrap();

    let err = dispatcher.add_route(&definition("alerts", 8)).unwrap_err();

    assert!(matches!(err, DispatchError::Compilation(_)));
    assert_eq!(builder.live(), 0);
    assert!(dispatcher.list_routes().is_empty());
}

#[test]
fn test_remove_route_tears_down_instances() {
    let builder = Arc::new(TestBuilder::new());
    let dispatcher = Dispatcher::new(builder.clone(), 2).unwrap();

    dispatcher.add_route(&definition("alerts", 8)).unwrap();
    dispatcher.remove_route("alerts").unwrap();

    assert_eq!(builder.live(), 0);
    assert!(dispatcher.list_routes().is_empty());

    let snapshot = dispatcher.metrics();
    assert_eq!(snapshot.routes_added, 1);
    assert_eq!(snapshot.routes_removed, 1);
}

#[test]
fn test_remove_unknown_route() {
    let dispatcher = Dispatcher::new(Arc::new(TestBuilder::new()), 2).unwrap();
    let err = dispatcher.remove_route("ghost").unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Routing(RoutingError::RouteNotFound { .. })
    ));
}

#[test]
fn test_add_route_by_name() {
    let store = MapStore::new(vec![definition("archive", 0)]);
    let dispatcher = Dispatcher::new(Arc::new(TestBuilder::new()), 2)
        .unwrap()
        .with_store(Arc::new(store));

    dispatcher.add_route_by_name("archive").unwrap();
    assert_eq!(dispatcher.list_routes(), vec!["archive".to_string()]);

    let err = dispatcher.add_route_by_name("missing").unwrap_err();
    assert!(matches!(err, DispatchError::UnknownDefinition { .. }));
}

#[test]
fn test_add_route_by_name_without_store() {
    let dispatcher = Dispatcher::new(Arc::new(TestBuilder::new()), 2).unwrap();
    let err = dispatcher.add_route_by_name("archive").unwrap_err();
    assert!(matches!(err, DispatchError::UnknownDefinition { .. }));
}

#[test]
fn test_run_twice_rejected() {
    let mut dispatcher = Dispatcher::new(Arc::new(TestBuilder::new()), 2).unwrap();
    let queue = EventQueue::bounded(16);

    dispatcher.run(queue.clone()).unwrap();
    assert!(dispatcher.is_running());

    let err = dispatcher.run(queue).unwrap_err();
    assert!(matches!(err, DispatchError::AlreadyRunning));

    dispatcher.stop();
    assert!(!dispatcher.is_running());
}

#[test]
fn test_stop_is_idempotent() {
    let mut dispatcher = Dispatcher::new(Arc::new(TestBuilder::new()), 2).unwrap();
    dispatcher.stop();

    dispatcher.run(EventQueue::bounded(16)).unwrap();
    dispatcher.stop();
    dispatcher.stop();
    assert!(!dispatcher.is_running());
}

#[test]
fn test_dispatch_matching_and_non_matching() {
    let (tx, rx) = unbounded();
    let mut dispatcher = Dispatcher::new(Arc::new(TestBuilder::recording(tx)), 2).unwrap();
    dispatcher.add_route(&definition("alert-high-sev", 8)).unwrap();

    let queue = EventQueue::bounded(16);
    dispatcher.run(queue.clone()).unwrap();

    queue.push(event(1, 9)).unwrap();
    queue.push(event(2, 3)).unwrap();

    dispatcher.stop();

    let processed: Vec<_> = rx.try_iter().collect();
    assert_eq!(processed, vec![("alert-high-sev".to_string(), 1)]);

    let snapshot = dispatcher.metrics();
    assert_eq!(snapshot.events_received, 2);
    assert_eq!(snapshot.events_dispatched, 1);
    assert_eq!(snapshot.events_unmatched, 1);
    assert_eq!(snapshot.route_matches, 1);
}

#[test]
fn test_stop_drains_queued_events() {
    let (tx, rx) = unbounded();
    let mut dispatcher = Dispatcher::new(Arc::new(TestBuilder::recording(tx)), 3).unwrap();
    dispatcher.add_route(&definition("all", i64::MIN)).unwrap();

    let queue = EventQueue::unbounded();
    for id in 0..200 {
        queue.push(event(id, 5)).unwrap();
    }

    dispatcher.run(queue).unwrap();
    dispatcher.stop();

    // Sentinels queue behind the events, so every event is dispatched
    // before the workers exit.
    assert_eq!(rx.try_iter().count(), 200);
    assert_eq!(dispatcher.metrics().events_received, 200);
}

#[test]
fn test_each_event_dispatched_exactly_once_per_route() {
    const EVENTS: i64 = 1000;

    let (tx, rx) = unbounded();
    let mut dispatcher = Dispatcher::new(Arc::new(TestBuilder::recording(tx)), 4).unwrap();
    dispatcher.add_route(&definition("low", 0)).unwrap();
    dispatcher.add_route(&definition("high", 50)).unwrap();

    let queue = EventQueue::bounded(64);
    dispatcher.run(queue.clone()).unwrap();

    // Concurrent control-plane churn on an unrelated route.
    let churn = std::thread::spawn({
        let queue = queue.clone();
        move || {
            for id in 0..EVENTS {
                queue.push(event(id, (id % 100) as i64)).unwrap();
            }
        }
    });

    for _ in 0..20 {
        dispatcher.add_route(&definition("churn", 1000)).unwrap();
        dispatcher.remove_route("churn").unwrap();
    }

    churn.join().unwrap();
    dispatcher.stop();

    let mut per_route: HashMap<(String, i64), usize> = HashMap::new();
    for key in rx.try_iter() {
        *per_route.entry(key).or_default() += 1;
    }

    for id in 0..EVENTS {
        let severity = id % 100;
        assert_eq!(
            per_route.get(&("low".to_string(), id)),
            Some(&1),
            "event {id} on route 'low'"
        );
        let high = per_route.get(&("high".to_string(), id));
        if severity >= 50 {
            assert_eq!(high, Some(&1), "event {id} on route 'high'");
        } else {
            assert_eq!(high, None, "event {id} must not match 'high'");
        }
    }

    assert_eq!(dispatcher.metrics().events_received, EVENTS as u64);
}

#[test]
fn test_pipeline_failure_is_contained() {
    let (tx, rx) = unbounded();
    let mut dispatcher = Dispatcher::new(Arc::new(TestBuilder::recording(tx)), 2).unwrap();
    dispatcher.add_route(&failing_definition("broken", 0)).unwrap();
    dispatcher.add_route(&definition("healthy", 0)).unwrap();

    let queue = EventQueue::bounded(16);
    dispatcher.run(queue.clone()).unwrap();

    for id in 0..10 {
        queue.push(event(id, 5)).unwrap();
    }

    dispatcher.stop();

    // The failing route never starves the healthy one or kills a worker.
    let healthy: Vec<_> = rx
        .try_iter()
        .filter(|(route, _)| route == "healthy")
        .collect();
    assert_eq!(healthy.len(), 10);

    let snapshot = dispatcher.metrics();
    assert_eq!(snapshot.events_received, 10);
    assert_eq!(snapshot.pipeline_failures, 10);
    assert_eq!(snapshot.route_matches, 20);
}

#[test]
fn test_restart_after_stop() {
    let (tx, rx) = unbounded();
    let mut dispatcher = Dispatcher::new(Arc::new(TestBuilder::recording(tx)), 2).unwrap();
    dispatcher.add_route(&definition("all", i64::MIN)).unwrap();

    let queue = EventQueue::bounded(16);
    dispatcher.run(queue.clone()).unwrap();
    queue.push(event(1, 5)).unwrap();
    dispatcher.stop();

    // The first cycle consumed its own sentinels, so the queue is clean.
    assert!(queue.is_empty());

    dispatcher.run(queue.clone()).unwrap();
    queue.push(event(2, 5)).unwrap();
    dispatcher.stop();

    let ids: Vec<i64> = rx.try_iter().map(|(_, id)| id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_routes_added_while_running() {
    let (tx, rx) = unbounded();
    let mut dispatcher = Dispatcher::new(Arc::new(TestBuilder::recording(tx)), 2).unwrap();

    let queue = EventQueue::bounded(16);
    dispatcher.run(queue.clone()).unwrap();

    dispatcher.add_route(&definition("late", 0)).unwrap();
    queue.push(event(1, 5)).unwrap();

    dispatcher.stop();
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn test_drop_stops_workers() {
    let builder = Arc::new(TestBuilder::new());
    let queue = EventQueue::bounded(16);
    {
        let mut dispatcher = Dispatcher::new(builder.clone(), 2).unwrap();
        dispatcher.add_route(&definition("alerts", 8)).unwrap();
        dispatcher.run(queue.clone()).unwrap();
    }
    // Drop joined the workers; their sentinels are consumed.
    assert!(queue.is_empty());
}
