//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::oneshot;

/// Create a temporary config file with the given TOML content.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

// -- Producer helpers ---------------------------------------------------------

/// Outcome a gated producer call resolves with.
pub type GateResult = Result<String, String>;

pub type GateFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, TestFailure>> + Send>>;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TestFailure(pub String);

/// Producer whose calls each block until the test releases them.
///
/// Every call takes the next gate from a queue; `calls()` counts
/// invocations so tests can assert how often the producer ran.
#[derive(Clone, Default)]
pub struct GatedProducer {
    gates: Arc<Mutex<VecDeque<oneshot::Receiver<GateResult>>>>,
    calls: Arc<AtomicUsize>,
}

impl GatedProducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a gate for the next call; send on the returned sender to settle it.
    pub fn gate(&self) -> oneshot::Sender<GateResult> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Closure to hand to `FetchController::new`.
    pub fn producer(&self) -> impl Fn() -> GateFuture + Send + Sync + 'static {
        let this = self.clone();
        move || -> GateFuture {
            this.calls.fetch_add(1, Ordering::SeqCst);
            let gate = this.gates.lock().pop_front();
            Box::pin(async move {
                let Some(gate) = gate else {
                    return Err(TestFailure("no gate queued".to_string()));
                };
                match gate.await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(message)) => Err(TestFailure(message)),
                    Err(_) => Err(TestFailure("gate dropped".to_string())),
                }
            })
        }
    }
}

/// Yield until `cond` holds or the timeout expires.
pub async fn eventually(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}
