#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use lv_kernel::{Evaluator, KernelError, KernelResult};
use lv_results::JsonRecordStore;
use serde_json::{Value, json};

pub fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

pub fn temp_store(prefix: &str) -> JsonRecordStore {
    JsonRecordStore::new(unique_temp_dir(prefix).join("calculations_db.json")).unwrap()
}

/// Kernel-shaped answer: 501 rows of `[t, x, y]` over 0..=50.
pub fn kernel_rows() -> Value {
    let rows: Vec<Value> = (0..=500)
        .map(|i| {
            let t = i as f64 * 0.1;
            json!([t, 10.0 + 5.0 * (t / 4.0).sin(), 5.0 + 2.0 * (t / 4.0).cos()])
        })
        .collect();
    Value::Array(rows)
}

/// Answers every request with the same value and records what it was asked.
pub struct ScriptedEvaluator {
    response: Value,
    pub expressions: Mutex<Vec<String>>,
}

impl ScriptedEvaluator {
    pub fn new(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response,
            expressions: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.expressions.lock().unwrap().len()
    }
}

impl Evaluator for ScriptedEvaluator {
    fn evaluate(&self, expression: &str) -> KernelResult<Value> {
        self.expressions.lock().unwrap().push(expression.to_string());
        Ok(self.response.clone())
    }
}

/// Always fails the way a dead kernel does.
pub struct FailingEvaluator;

impl Evaluator for FailingEvaluator {
    fn evaluate(&self, _expression: &str) -> KernelResult<Value> {
        Err(KernelError::Terminated)
    }
}

/// Blocks each evaluation until the test releases it.
pub struct GatedEvaluator {
    gate: Mutex<Receiver<()>>,
    calls: AtomicUsize,
    aborts: AtomicUsize,
    response: Value,
}

impl GatedEvaluator {
    pub fn new(response: Value) -> (Arc<Self>, Sender<()>) {
        let (tx, rx) = channel();
        let evaluator = Arc::new(Self {
            gate: Mutex::new(rx),
            calls: AtomicUsize::new(0),
            aborts: AtomicUsize::new(0),
            response,
        });
        (evaluator, tx)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn aborts(&self) -> usize {
        self.aborts.load(Ordering::SeqCst)
    }

    /// Spin until `n` evaluations have started.
    pub fn wait_for_calls(&self, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.calls() < n {
            assert!(Instant::now() < deadline, "evaluator was never called");
            std::thread::sleep(Duration::from_millis(2));
        }
    }
}

impl Evaluator for GatedEvaluator {
    fn evaluate(&self, _expression: &str) -> KernelResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().map_err(|_| KernelError::LockPoisoned)?;
        gate.recv().map_err(|_| KernelError::Terminated)?;
        Ok(self.response.clone())
    }

    fn abort(&self) {
        self.aborts.fetch_add(1, Ordering::SeqCst);
    }
}

/// Holds each request in a queue until released, then honours cancellation
/// the way a shared kernel does once the request reaches the front.
pub struct QueuedEvaluator {
    gate: Mutex<Receiver<()>>,
    entered: AtomicUsize,
    refused: AtomicUsize,
    answered: AtomicUsize,
    response: Value,
}

impl QueuedEvaluator {
    pub fn new(response: Value) -> (Arc<Self>, Sender<()>) {
        let (tx, rx) = channel();
        let evaluator = Arc::new(Self {
            gate: Mutex::new(rx),
            entered: AtomicUsize::new(0),
            refused: AtomicUsize::new(0),
            answered: AtomicUsize::new(0),
            response,
        });
        (evaluator, tx)
    }

    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }

    pub fn refused(&self) -> usize {
        self.refused.load(Ordering::SeqCst)
    }

    pub fn answered(&self) -> usize {
        self.answered.load(Ordering::SeqCst)
    }

    pub fn wait_until(&self, what: impl Fn(&Self) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !what(self) {
            assert!(Instant::now() < deadline, "evaluator never reached the expected state");
            std::thread::sleep(Duration::from_millis(2));
        }
    }
}

impl Evaluator for QueuedEvaluator {
    fn evaluate(&self, expression: &str) -> KernelResult<Value> {
        self.evaluate_cancellable(expression, &AtomicBool::new(false))
    }

    fn evaluate_cancellable(
        &self,
        _expression: &str,
        cancelled: &AtomicBool,
    ) -> KernelResult<Value> {
        self.entered.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().map_err(|_| KernelError::LockPoisoned)?;
        gate.recv().map_err(|_| KernelError::Terminated)?;
        if cancelled.load(Ordering::SeqCst) {
            self.refused.fetch_add(1, Ordering::SeqCst);
            return Err(KernelError::Cancelled);
        }
        self.answered.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}
