use std::sync::Arc;

use crate::manager::EnvironmentManager;
use crate::test_support::{definition, TestBuilder};

#[test]
fn test_materialize_builds_one_instance_per_slot() {
    let builder = Arc::new(TestBuilder::new());
    let manager = EnvironmentManager::new(builder.clone(), 3);

    let entry = manager.materialize(&definition("alerts", 8)).unwrap();

    assert_eq!(entry.slot_count(), 3);
    assert_eq!(builder.compile_calls(), 3);
    assert_eq!(builder.live(), 3);
}

#[test]
fn test_materialize_is_all_or_nothing() {
    let builder = Arc::new(TestBuilder::failing_after(3));
    let manager = EnvironmentManager::new(builder.clone(), 5);

    let err = manager.materialize(&definition("alerts", 8)).unwrap_err();

    assert_eq!(err.route(), "alerts");
    // The three instances built before the rejection were discarded.
    assert_eq!(builder.compile_calls(), 4);
    assert_eq!(builder.live(), 0);
}

#[test]
fn test_release_drops_every_instance() {
    let builder = Arc::new(TestBuilder::new());
    let manager = EnvironmentManager::new(builder.clone(), 4);

    let entry = manager.materialize(&definition("alerts", 8)).unwrap();
    assert_eq!(builder.live(), 4);

    manager.release("alerts", entry);
    assert_eq!(builder.live(), 0);
}

#[test]
fn test_slot_count() {
    let manager = EnvironmentManager::new(Arc::new(TestBuilder::new()), 7);
    assert_eq!(manager.slot_count(), 7);
}
