//! Background thread running one kernel evaluation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use lv_core::{ModelParams, SAMPLE_COUNT, TimeSeries};
use lv_kernel::{Evaluator, lotka_volterra_expression};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// One background evaluation. Dropping the worker detaches its thread; any
/// message it sends afterwards goes nowhere.
pub struct CalcWorker {
    pub generation: u64,
    pub rx: Receiver<WorkerMessage>,
    cancelled: Arc<AtomicBool>,
    _handle: JoinHandle<()>,
}

#[derive(Debug, Clone)]
pub enum WorkerMessage {
    Complete {
        generation: u64,
        params: ModelParams,
        series: TimeSeries,
    },
    Error {
        generation: u64,
        message: String,
    },
}

impl WorkerMessage {
    pub fn generation(&self) -> u64 {
        match self {
            WorkerMessage::Complete { generation, .. } | WorkerMessage::Error { generation, .. } => {
                *generation
            }
        }
    }
}

impl CalcWorker {
    pub fn start(generation: u64, evaluator: Arc<dyn Evaluator>, params: ModelParams) -> Self {
        let (tx, rx) = channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let handle = thread::spawn(move || {
            let message = match Self::run_calculation(evaluator.as_ref(), &params, &flag) {
                Ok(series) => WorkerMessage::Complete {
                    generation,
                    params,
                    series,
                },
                Err(e) => WorkerMessage::Error {
                    generation,
                    message: e.to_string(),
                },
            };
            Self::send(&tx, message);
        });

        Self {
            generation,
            rx,
            cancelled,
            _handle: handle,
        }
    }

    /// Mark the request abandoned. An evaluation that has not reached the
    /// kernel yet is refused; one already running must be aborted separately.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn run_calculation(
        evaluator: &dyn Evaluator,
        params: &ModelParams,
        cancelled: &AtomicBool,
    ) -> AppResult<TimeSeries> {
        let started = Instant::now();
        let expression = lotka_volterra_expression(params);

        let response = evaluator.evaluate_cancellable(&expression, cancelled)?;
        let series = TimeSeries::from_response(&response).map_err(AppError::from)?;

        if series.len() != SAMPLE_COUNT {
            warn!(
                rows = series.len(),
                expected = SAMPLE_COUNT,
                "kernel returned an unexpected number of samples"
            );
        }
        info!(
            rows = series.len(),
            elapsed_s = started.elapsed().as_secs_f64(),
            "calculation finished"
        );
        Ok(series)
    }

    fn send(tx: &Sender<WorkerMessage>, message: WorkerMessage) {
        if tx.send(message).is_err() {
            info!("calculation result discarded: slot was cleared");
        }
    }
}
