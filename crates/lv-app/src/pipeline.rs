//! Calculation slot: the Idle/Running gate around one background evaluation.

use std::sync::Arc;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::Duration;

use lv_core::{ModelParams, ParamInput, TimeSeries};
use lv_kernel::Evaluator;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::worker::{CalcWorker, WorkerMessage};

/// Parameters and the series they produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedCalc {
    pub params: ModelParams,
    pub series: TimeSeries,
}

/// `Completed` and `Failed` are idle states that remember the last outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotStatus {
    Idle,
    Running { params: ModelParams },
    Completed(CompletedCalc),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started,
    /// A calculation is already in flight; nothing was started.
    AlreadyRunning,
}

/// Delivered exactly once per started submission, unless the slot is cleared first.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotEvent {
    Completed(CompletedCalc),
    Failed(String),
}

pub struct CalculationSlot {
    evaluator: Arc<dyn Evaluator>,
    status: SlotStatus,
    worker: Option<CalcWorker>,
    generation: u64,
}

impl CalculationSlot {
    pub fn new(evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            evaluator,
            status: SlotStatus::Idle,
            worker: None,
            generation: 0,
        }
    }

    pub fn status(&self) -> &SlotStatus {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Validate `input` and start one evaluation on a worker thread.
    pub fn submit(&mut self, input: &ParamInput) -> AppResult<SubmitOutcome> {
        if self.is_running() {
            debug!("submit ignored: calculation already running");
            return Ok(SubmitOutcome::AlreadyRunning);
        }

        let params = input.parse()?;
        self.generation += 1;
        info!(generation = self.generation, ?params, "calculation submitted");

        self.worker = Some(CalcWorker::start(
            self.generation,
            Arc::clone(&self.evaluator),
            params,
        ));
        self.status = SlotStatus::Running { params };
        Ok(SubmitOutcome::Started)
    }

    /// Non-blocking check for the in-flight calculation's outcome.
    pub fn poll(&mut self) -> Option<SlotEvent> {
        let received = match &self.worker {
            Some(worker) => match worker.rx.try_recv() {
                Ok(message) => Some(message),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Self::lost(worker)),
            },
            None => None,
        };
        received.and_then(|message| self.finish(message))
    }

    /// Block up to `timeout` for the in-flight calculation's outcome.
    pub fn wait(&mut self, timeout: Duration) -> Option<SlotEvent> {
        let received = match &self.worker {
            Some(worker) => match worker.rx.recv_timeout(timeout) {
                Ok(message) => Some(message),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => Some(Self::lost(worker)),
            },
            None => None,
        };
        received.and_then(|message| self.finish(message))
    }

    /// Return to `Idle`. An in-flight evaluation is killed and its outcome
    /// will never be delivered.
    pub fn clear(&mut self) {
        if let Some(worker) = self.worker.take() {
            warn!(generation = worker.generation, "aborting running calculation");
            worker.cancel();
            self.evaluator.abort();
        }
        self.generation += 1;
        self.status = SlotStatus::Idle;
    }

    fn lost(worker: &CalcWorker) -> WorkerMessage {
        WorkerMessage::Error {
            generation: worker.generation,
            message: "Evaluation error: calculation worker exited without a result".to_string(),
        }
    }

    fn finish(&mut self, message: WorkerMessage) -> Option<SlotEvent> {
        if message.generation() != self.generation {
            debug!(
                stale = message.generation(),
                current = self.generation,
                "dropping stale calculation result"
            );
            return None;
        }
        self.worker = None;

        let event = match message {
            WorkerMessage::Complete { params, series, .. } => {
                SlotEvent::Completed(CompletedCalc { params, series })
            }
            WorkerMessage::Error { message, .. } => {
                warn!(error = %message, "calculation failed");
                SlotEvent::Failed(message)
            }
        };
        self.status = match &event {
            SlotEvent::Completed(done) => SlotStatus::Completed(done.clone()),
            SlotEvent::Failed(message) => SlotStatus::Failed(message.clone()),
        };
        Some(event)
    }
}
