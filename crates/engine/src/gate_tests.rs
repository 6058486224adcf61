// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sluice_core::{AttemptState, ExecutionId, LockConfig};
use sluice_storage::{FaultyLockStore, MemoryLockStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

async fn gate(limit: u32) -> Gate<FaultyLockStore<MemoryLockStore>> {
    let store = FaultyLockStore::new(MemoryLockStore::new());
    store
        .create(LockConfig::new("textract", limit), None)
        .await
        .unwrap();
    Gate::new(store)
}

fn attempt(exec: &str) -> Attempt {
    Attempt::for_execution("textract", ExecutionId::new(exec))
}

async fn holders(gate: &Gate<FaultyLockStore<MemoryLockStore>>) -> u32 {
    gate.admission()
        .store()
        .inner()
        .get("textract")
        .await
        .unwrap()
        .holder_count
}

#[tokio::test]
async fn completed_work_releases_slot() {
    let gate = gate(1).await;
    let mut a = attempt("A");

    let outcome = gate
        .run(&mut a, || async { Ok::<_, String>(42) })
        .await
        .unwrap();

    assert_eq!(outcome, GateOutcome::Completed(42));
    assert_eq!(a.state, AttemptState::Released);
    assert_eq!(holders(&gate).await, 0);
}

#[tokio::test]
async fn denial_returns_retry_later_without_running_work() {
    let gate = gate(0).await;
    let mut a = attempt("A");
    let ran = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = ran.clone();

    let outcome = gate
        .run(&mut a, move || async move {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok::<_, String>(())
        })
        .await
        .unwrap();

    assert_eq!(outcome, GateOutcome::RetryLater { denials: 1 });
    assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
    assert_eq!(a.state, AttemptState::Denied);
}

#[tokio::test]
async fn work_error_still_releases() {
    let gate = gate(1).await;
    let mut a = attempt("A");

    let err = gate
        .run(&mut a, || async { Err::<(), _>("textract throttled".to_string()) })
        .await
        .unwrap_err();

    assert!(matches!(err, GateError::Work(ref msg) if msg == "textract throttled"));
    assert_eq!(holders(&gate).await, 0);
}

#[tokio::test(start_paused = true)]
async fn timeout_releases_slot() {
    let gate = gate(1).await.with_work_timeout(Duration::from_secs(25 * 60));
    let mut a = attempt("A");

    let err = gate
        .run(&mut a, || async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<_, String>(())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, GateError::Timeout(limit) if limit == Duration::from_secs(1500)));
    assert_eq!(holders(&gate).await, 0);
}

#[tokio::test]
async fn panic_releases_slot_then_resumes() {
    let gate = gate(1).await;
    let task_gate = gate.clone();

    let joined = tokio::spawn(async move {
        let mut a = attempt("A");
        task_gate
            .run(&mut a, || async {
                if true {
                    panic!("work blew up");
                }
                Ok::<(), String>(())
            })
            .await
    })
    .await;

    assert!(joined.unwrap_err().is_panic());
    assert_eq!(holders(&gate).await, 0);
}

#[tokio::test]
async fn release_failure_is_left_for_reaper() {
    let gate = gate(1).await;
    let mut a = attempt("A");
    let store = gate.admission().store().clone();

    let outcome = gate
        .run(&mut a, move || {
            // Fail the release that follows the work
            store.fail_next(1);
            async { Ok::<_, String>("done") }
        })
        .await
        .unwrap();

    assert_eq!(outcome, GateOutcome::Completed("done"));
    assert!(a.is_admitted());
    assert_eq!(holders(&gate).await, 1);
}

#[tokio::test(start_paused = true)]
async fn waiting_gate_gives_retry_later_at_queue_timeout() {
    let store = MemoryLockStore::new();
    store
        .create(LockConfig::new("textract", 0), None)
        .await
        .unwrap();
    let config = GateConfig {
        work_timeout: None,
        queue_timeout: Some(Duration::from_secs(30 * 60)),
    };
    let gate = Gate::from_config(store, &config);
    let mut a = attempt("A");

    let outcome = gate
        .run(&mut a, || async { Ok::<_, String>(()) })
        .await
        .unwrap();
    assert!(outcome.is_retry_later());
}

#[tokio::test(start_paused = true)]
async fn queue_timeout_bounds_the_work_too() {
    let store = MemoryLockStore::new();
    store
        .create(LockConfig::new("textract", 1), None)
        .await
        .unwrap();
    let config = GateConfig {
        work_timeout: None,
        queue_timeout: Some(Duration::from_millis(100)),
    };
    let gate = Gate::from_config(store, &config);
    let mut a = attempt("A");

    let err = gate
        .run(&mut a, || async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<_, String>(())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, GateError::Timeout(limit) if limit == Duration::from_millis(100)));
    assert_eq!(a.state, AttemptState::Released);
}

#[tokio::test(start_paused = true)]
async fn time_spent_waiting_comes_out_of_the_deadline() {
    let deadline = Duration::from_secs(100);
    let gate = gate(1)
        .await
        .with_deadline(deadline)
        .with_wait(RetryPolicy::new().with_deadline(deadline));
    let mut x = attempt("X");
    assert!(gate.admission().request(&mut x).await.unwrap().is_granted());
    let releaser = gate.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(60)).await;
        releaser.admission().release(&mut x).await.unwrap();
    });

    let started = tokio::time::Instant::now();
    let mut b = attempt("B");
    let err = gate
        .run(&mut b, || async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<_, String>(())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, GateError::Timeout(limit) if limit <= Duration::from_secs(40)));
    assert!(started.elapsed() <= deadline + Duration::from_secs(1));
    assert_eq!(holders(&gate).await, 0);
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[tokio::test(start_paused = true)]
async fn timed_out_work_has_stopped_before_run_returns() {
    let gate = gate(1).await.with_work_timeout(Duration::from_secs(1));
    let dropped = Arc::new(AtomicBool::new(false));
    let guard = DropFlag(dropped.clone());
    let mut a = attempt("A");

    let err = gate
        .run(&mut a, move || async move {
            let _guard = guard;
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<_, String>(())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, GateError::Timeout(_)));
    assert!(dropped.load(Ordering::SeqCst));
    assert_eq!(holders(&gate).await, 0);
}
