// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::memory::MemoryLockStore;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn traced_store() -> TracedLockStore<MemoryLockStore> {
    TracedLockStore::new(MemoryLockStore::new())
}

#[test]
fn acquire_logs_span_and_outcome() {
    let store = traced_store();
    let (logs, granted) = with_tracing(|| async {
        store
            .create(LockConfig::new("textract", 1), None)
            .await
            .unwrap();
        store
            .try_acquire("textract", &HolderId::new("h-1"), &ExecutionId::new("exec-1"))
            .await
            .unwrap()
    });

    assert!(granted.is_granted());
    assert!(logs.contains("store.try_acquire"), "logs: {logs}");
    assert!(logs.contains("holder=h-1"), "logs: {logs}");
    assert!(logs.contains("execution=exec-1"), "logs: {logs}");
    assert!(logs.contains("granted"), "logs: {logs}");
    assert!(logs.contains("elapsed_ms"), "logs: {logs}");
}

#[test]
fn denial_logs_reason() {
    let store = traced_store();
    let (logs, _) = with_tracing(|| async {
        store
            .create(LockConfig::new("textract", 0), None)
            .await
            .unwrap();
        store
            .try_acquire("textract", &HolderId::new("h-1"), &ExecutionId::new("exec-1"))
            .await
            .unwrap()
    });

    assert!(logs.contains("denied"), "logs: {logs}");
    assert!(logs.contains("reason=capacity"), "logs: {logs}");
}

#[test]
fn release_of_absent_holder_logs_not_held() {
    let store = traced_store();
    let (logs, outcome) = with_tracing(|| async {
        store
            .create(LockConfig::new("textract", 1), None)
            .await
            .unwrap();
        store
            .release("textract", &HolderId::new("ghost"))
            .await
            .unwrap()
    });

    assert_eq!(outcome, ReleaseOutcome::NotHeld);
    assert!(logs.contains("store.release"), "logs: {logs}");
    assert!(logs.contains("not held"), "logs: {logs}");
}

#[test]
fn errors_are_logged_and_passed_through() {
    let store = traced_store();
    let (logs, result) = with_tracing(|| async {
        store
            .try_acquire("missing", &HolderId::new("h-1"), &ExecutionId::new("exec-1"))
            .await
    });

    assert!(matches!(result, Err(StoreError::LockNotFound(_))));
    assert!(logs.contains("acquire failed"), "logs: {logs}");
    assert!(logs.contains("lock not found: missing"), "logs: {logs}");
}
