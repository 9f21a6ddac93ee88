//! lv-kernel: client for the external Wolfram Language kernel.
//!
//! The kernel is a black box that takes an expression and answers with a
//! nested numeric array. It may be slow, may fail for any reason and must
//! never be called from the interaction thread.

use std::sync::atomic::{AtomicBool, Ordering};

pub mod expression;
pub mod session;

pub use expression::{lotka_volterra_expression, read_framed_response, request_line};
pub use session::{KernelConfig, KernelSession};

pub type KernelResult<T> = Result<T, KernelError>;

#[derive(thiserror::Error, Debug)]
pub enum KernelError {
    #[error("Failed to start kernel `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Kernel I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Kernel terminated before answering")]
    Terminated,

    #[error("Kernel returned unparsable output {payload:?}: {source}")]
    Response {
        payload: String,
        source: serde_json::Error,
    },

    #[error("Kernel session lock poisoned")]
    LockPoisoned,

    #[error("Evaluation cancelled before it reached the kernel")]
    Cancelled,
}

/// Evaluates textual expressions in an external process.
///
/// Implementations must be thread-safe: the pipeline calls `evaluate` from
/// a worker thread and `abort` from the interaction thread.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, expression: &str) -> KernelResult<serde_json::Value>;

    /// Like `evaluate`, but refuses the request once `cancelled` is set.
    /// Implementations that queue requests should check the flag again when
    /// the request reaches the front of the queue.
    fn evaluate_cancellable(
        &self,
        expression: &str,
        cancelled: &AtomicBool,
    ) -> KernelResult<serde_json::Value> {
        if cancelled.load(Ordering::SeqCst) {
            return Err(KernelError::Cancelled);
        }
        self.evaluate(expression)
    }

    /// Forcefully stop any in-flight evaluation. The evaluator must accept new
    /// requests afterwards, re-establishing its connection if needed.
    fn abort(&self) {}
}
