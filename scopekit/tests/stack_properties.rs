//! Teardown ordering and failure properties of `ResourceStack`.

use pretty_assertions::assert_eq;
use scopekit::{EntryKind, ResourceStack, StackError};
use scopekit_testing::{
    ReleaseLog, TrackedResource, assert_failed_labels, assert_log, callback, failing_factory,
    failing_release, tracked,
};

#[tokio::test]
async fn n_acquisitions_release_in_reverse() {
    let log = ReleaseLog::new();
    let mut stack = ResourceStack::new();

    let names = ["r1", "r2", "r3", "r4", "r5"];
    for name in names {
        stack.acquire(name, tracked(&log, name)).await.unwrap();
    }
    assert_eq!(stack.labels(), ["r5", "r4", "r3", "r2", "r1"]);
    stack.close().await.unwrap();

    let exits: Vec<String> = log
        .entries()
        .into_iter()
        .filter(|entry| entry.starts_with("EXIT"))
        .collect();
    assert_eq!(exits, ["EXIT: r5", "EXIT: r4", "EXIT: r3", "EXIT: r2", "EXIT: r1"]);
}

#[tokio::test]
async fn failed_acquisition_leaves_earlier_entries() {
    let log = ReleaseLog::new();
    let mut stack = ResourceStack::new();

    stack.acquire("r1", tracked(&log, "r1")).await.unwrap();
    stack.acquire("r2", tracked(&log, "r2")).await.unwrap();

    let err = stack.acquire("r3", failing_factory("r3")).await.unwrap_err();
    assert!(matches!(err, StackError::Acquire { ref label, .. } if label == "r3"));
    assert_eq!(stack.len(), 2);

    stack.close().await.unwrap();
    assert_log(&log, &["ENTER: r1", "ENTER: r2", "EXIT: r2", "EXIT: r1"]);
}

#[tokio::test]
async fn deferred_callbacks_interleave_by_insertion() {
    let log = ReleaseLog::new();
    let mut stack = ResourceStack::new();

    stack.acquire("A", tracked(&log, "A")).await.unwrap();
    stack.defer("first", callback(&log, "first callback")).unwrap();
    stack.enter("B", TrackedResource::new(&log, "B")).await.unwrap();
    stack.defer("second", callback(&log, "second callback")).unwrap();

    stack.close().await.unwrap();
    assert_log(
        &log,
        &[
            "ENTER: A",
            "ENTER: B",
            "second callback",
            "EXIT: B",
            "first callback",
            "EXIT: A",
        ],
    );
}

#[tokio::test]
async fn closing_twice_is_closing_once() {
    let log = ReleaseLog::new();
    let mut stack = ResourceStack::new();
    stack.acquire("A", tracked(&log, "A")).await.unwrap();

    stack.close().await.unwrap();
    stack.close().await.unwrap();

    assert!(stack.is_closed());
    assert_log(&log, &["ENTER: A", "EXIT: A"]);
}

#[tokio::test]
async fn failing_release_does_not_stop_siblings() {
    let log = ReleaseLog::new();
    let mut stack = ResourceStack::new();

    stack.acquire("r1", tracked(&log, "r1")).await.unwrap();
    stack.acquire("r2", failing_release(&log, "r2")).await.unwrap();
    stack.acquire("r3", tracked(&log, "r3")).await.unwrap();

    let err = stack.close().await.unwrap_err();
    let errors = err.release_errors().unwrap();
    assert_failed_labels(errors, &["r2"]);
    assert_eq!(errors.iter().next().map(|f| f.kind), Some(EntryKind::Resource));
    assert_log(
        &log,
        &["ENTER: r1", "ENTER: r2", "ENTER: r3", "EXIT: r3", "EXIT: r2", "EXIT: r1"],
    );
}

#[tokio::test]
async fn every_release_failure_is_reported() {
    let log = ReleaseLog::new();
    let mut stack = ResourceStack::new();

    stack.acquire("r1", failing_release(&log, "r1")).await.unwrap();
    stack
        .enter("r2", TrackedResource::new(&log, "r2").failing_exit())
        .await
        .unwrap();

    let err = stack.close().await.unwrap_err();
    assert_failed_labels(err.release_errors().unwrap(), &["r2", "r1"]);
    assert!(err.to_string().starts_with("2 release actions failed"));
}

#[tokio::test]
async fn conditional_acquisition_with_cleanup() {
    let log = ReleaseLog::new();
    let mut stack = ResourceStack::new();

    let a = stack.acquire("A", tracked(&log, "A")).await.unwrap();
    if a == "A" {
        stack.acquire("B", tracked(&log, "B")).await.unwrap();
    }
    stack.defer("cleanup", callback(&log, "Clean up function called")).unwrap();

    stack.close().await.unwrap();
    assert_log(
        &log,
        &[
            "ENTER: A",
            "ENTER: B",
            "Clean up function called",
            "EXIT: B",
            "EXIT: A",
        ],
    );
}

#[tokio::test]
async fn failed_second_acquisition_tears_down_first() {
    let log = ReleaseLog::new();
    let mut stack = ResourceStack::new();

    stack.acquire("A", tracked(&log, "A")).await.unwrap();
    assert!(stack.acquire("B", failing_factory("B")).await.is_err());

    stack.close().await.unwrap();
    assert_log(&log, &["ENTER: A", "EXIT: A"]);
}

#[tokio::test]
async fn closed_stack_never_invokes_the_factory() {
    let log = ReleaseLog::new();
    let mut stack = ResourceStack::new();
    stack.close().await.unwrap();

    let err = stack.acquire("late", tracked(&log, "late")).await.unwrap_err();
    assert!(err.is_closed());
    assert!(stack.defer("late", callback(&log, "late")).unwrap_err().is_closed());
    assert!(
        stack
            .enter("late", TrackedResource::new(&log, "late"))
            .await
            .unwrap_err()
            .is_closed()
    );
    assert!(log.is_empty());
}

#[tokio::test]
async fn pop_all_transfers_ownership() {
    let log = ReleaseLog::new();
    let mut builder = ResourceStack::new();
    builder.acquire("A", tracked(&log, "A")).await.unwrap();
    builder.acquire("B", tracked(&log, "B")).await.unwrap();

    let mut owner = builder.pop_all();
    builder.close().await.unwrap();
    assert_log(&log, &["ENTER: A", "ENTER: B"]);

    owner.close().await.unwrap();
    assert_log(&log, &["ENTER: A", "ENTER: B", "EXIT: B", "EXIT: A"]);
}
