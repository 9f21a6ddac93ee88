//! Presentation model of the Lotka–Volterra tab.
//!
//! Owns the parameter form, the calculation slot, what the result tabs show
//! and the id under which the current result was last saved. Frontends call
//! `poll` once per frame and draw `view()`.

use std::sync::Arc;
use std::time::Duration;

use lv_core::ParamInput;
use lv_kernel::Evaluator;
use lv_results::{RecordId, RecordStore};

use crate::animation::AnimationState;
use crate::error::AppResult;
use crate::pipeline::{CalculationSlot, CompletedCalc, SlotEvent, SlotStatus, SubmitOutcome};
use crate::record_service::{self, PersistOutcome};
use crate::render::{ResultView, render};

pub struct LotkaVolterraSession {
    pub input: ParamInput,
    slot: CalculationSlot,
    view: ResultView,
    current: Option<CompletedCalc>,
    record_id: Option<RecordId>,
    animation_interval: Duration,
}

impl LotkaVolterraSession {
    pub fn new(evaluator: Arc<dyn Evaluator>, animation_interval: Duration) -> Self {
        Self {
            input: ParamInput::default(),
            slot: CalculationSlot::new(evaluator),
            view: ResultView::Placeholder,
            current: None,
            record_id: None,
            animation_interval,
        }
    }

    pub fn status(&self) -> &SlotStatus {
        self.slot.status()
    }

    pub fn is_running(&self) -> bool {
        self.slot.is_running()
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ResultView {
        &mut self.view
    }

    pub fn current(&self) -> Option<&CompletedCalc> {
        self.current.as_ref()
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn animation_mut(&mut self) -> Option<&mut AnimationState> {
        self.view.rendered_mut().map(|run| &mut run.animation)
    }

    pub fn calculate(&mut self) -> AppResult<SubmitOutcome> {
        self.slot.submit(&self.input)
    }

    pub fn poll(&mut self) -> Option<SlotEvent> {
        let event = self.slot.poll()?;
        self.apply(&event);
        Some(event)
    }

    pub fn wait(&mut self, timeout: Duration) -> Option<SlotEvent> {
        let event = self.slot.wait(timeout)?;
        self.apply(&event);
        Some(event)
    }

    fn apply(&mut self, event: &SlotEvent) {
        match event {
            SlotEvent::Completed(done) => {
                self.show(done.clone());
                // A fresh result is a new record until saved.
                self.record_id = None;
            }
            SlotEvent::Failed(message) => {
                self.current = None;
                self.view = ResultView::Error(message.clone());
            }
        }
    }

    fn show(&mut self, done: CompletedCalc) {
        self.view = ResultView::Rendered(Box::new(render(&done, self.animation_interval)));
        self.current = Some(done);
    }

    /// Abort any running calculation and restore the initial state.
    pub fn clear(&mut self) {
        self.slot.clear();
        self.input = ParamInput::default();
        self.view = ResultView::Placeholder;
        self.current = None;
        self.record_id = None;
    }

    /// Save the current result; repeated saves overwrite the same record.
    pub fn save(&mut self, store: &dyn RecordStore) -> AppResult<PersistOutcome> {
        let outcome =
            record_service::persist(store, self.current.as_ref(), self.record_id.as_deref())?;
        self.record_id = Some(outcome.id.clone());
        Ok(outcome)
    }

    /// Replace form, charts and record id with a saved record.
    pub fn load(&mut self, store: &dyn RecordStore, id: &str) -> AppResult<()> {
        let (record_id, done) = record_service::load_record(store, id)?;
        if self.slot.is_running() {
            self.slot.clear();
        }
        self.input = done.params.to_input();
        self.show(done);
        self.record_id = Some(record_id);
        Ok(())
    }
}
