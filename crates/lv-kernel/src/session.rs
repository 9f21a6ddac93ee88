//! Persistent kernel process shared across calculations.

use std::io::{BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::expression::{read_framed_response, request_line};
use crate::{Evaluator, KernelError, KernelResult};

/// How to launch the kernel process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            command: "WolframKernel".to_string(),
            args: vec!["-noprompt".to_string()],
        }
    }
}

struct KernelIo {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Lazily started kernel process.
///
/// The process is spawned on the first `evaluate` and reused afterwards. After
/// `abort`, or any I/O failure, the session is poisoned: the old process is
/// discarded and a fresh one is spawned on the next request. Dropping the
/// session shuts the process down.
pub struct KernelSession {
    config: KernelConfig,
    io: Mutex<Option<KernelIo>>,
    // Kept apart from `io` so `abort` can kill the process while a worker is
    // blocked reading from it.
    child: Mutex<Option<Child>>,
    poisoned: AtomicBool,
}

impl KernelSession {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config,
            io: Mutex::new(None),
            child: Mutex::new(None),
            poisoned: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Whether a kernel process is currently attached and not poisoned.
    pub fn is_open(&self) -> bool {
        !self.poisoned.load(Ordering::SeqCst)
            && self.child.lock().map(|c| c.is_some()).unwrap_or(false)
    }

    fn spawn(&self, cancelled: &AtomicBool) -> KernelResult<KernelIo> {
        let mut slot = self.child.lock().map_err(|_| KernelError::LockPoisoned)?;
        // `abort` takes this lock after the request was cancelled, so a
        // cancel racing the first check is caught here.
        if cancelled.load(Ordering::SeqCst) {
            return Err(KernelError::Cancelled);
        }
        if let Some(mut old) = slot.take() {
            let _ = old.kill();
            let _ = old.wait();
        }

        let mut child = Command::new(&self.config.command)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| KernelError::Spawn {
                command: self.config.command.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(KernelError::Terminated);
        };

        info!(command = %self.config.command, pid = child.id(), "kernel session started");
        *slot = Some(child);
        Ok(KernelIo {
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    fn roundtrip(io: &mut KernelIo, expression: &str) -> KernelResult<Value> {
        io.stdin.write_all(request_line(expression).as_bytes())?;
        io.stdin.flush()?;
        read_framed_response(&mut io.stdout)
    }

    fn shutdown(&mut self) {
        if let Ok(io) = self.io.get_mut() {
            if let Some(mut io) = io.take() {
                let _ = io.stdin.write_all(b"Quit[]\n");
                let _ = io.stdin.flush();
            }
        }
        let Ok(slot) = self.child.get_mut() else {
            return;
        };
        let Some(mut child) = slot.take() else {
            return;
        };

        let deadline = Instant::now() + Duration::from_millis(500);
        while Instant::now() < deadline {
            if let Ok(Some(_)) = child.try_wait() {
                info!("kernel session closed");
                return;
            }
            thread::sleep(Duration::from_millis(20));
        }
        let _ = child.kill();
        let _ = child.wait();
        info!("kernel session killed on shutdown");
    }
}

impl Evaluator for KernelSession {
    fn evaluate(&self, expression: &str) -> KernelResult<Value> {
        self.evaluate_cancellable(expression, &AtomicBool::new(false))
    }

    fn evaluate_cancellable(
        &self,
        expression: &str,
        cancelled: &AtomicBool,
    ) -> KernelResult<Value> {
        let mut guard = self.io.lock().map_err(|_| KernelError::LockPoisoned)?;

        // Checked under the lock: an abort that lands before this point must
        // not start a kernel for the abandoned request.
        if cancelled.load(Ordering::SeqCst) {
            debug!("request cancelled before reaching the kernel");
            return Err(KernelError::Cancelled);
        }

        if self.poisoned.swap(false, Ordering::SeqCst) && guard.is_some() {
            debug!("discarding poisoned kernel session");
            *guard = None;
        }
        if guard.is_none() {
            *guard = Some(self.spawn(cancelled)?);
        }
        let Some(io) = guard.as_mut() else {
            return Err(KernelError::Terminated);
        };

        debug!(bytes = expression.len(), "sending expression to kernel");
        match Self::roundtrip(io, expression) {
            Ok(value) => Ok(value),
            Err(err) => {
                // A response error leaves the stream framed and reusable.
                if !matches!(err, KernelError::Response { .. }) {
                    warn!(error = %err, "kernel session lost");
                    *guard = None;
                    self.poisoned.store(true, Ordering::SeqCst);
                }
                Err(err)
            }
        }
    }

    fn abort(&self) {
        self.poisoned.store(true, Ordering::SeqCst);
        let Ok(mut slot) = self.child.lock() else {
            return;
        };
        if let Some(mut child) = slot.take() {
            warn!(pid = child.id(), "killing kernel process");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for KernelSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
