use std::sync::Arc;
use std::time::Duration;

use lv_app::{LotkaVolterraSession, ResultView, SlotEvent, SubmitOutcome};
use lv_kernel::Evaluator;
use lv_results::RecordStore;

use crate::app::Status;
use crate::views::params_view::{self, ParamsAction};
use crate::views::{animation_view, charts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResultTab {
    Population,
    Phase,
    VectorField,
    Animation,
}

pub struct LotkaVolterraTab {
    session: LotkaVolterraSession,
    result_tab: ResultTab,
    interval_text: String,
}

impl LotkaVolterraTab {
    pub fn new(evaluator: Arc<dyn Evaluator>, interval: Duration) -> Self {
        Self {
            session: LotkaVolterraSession::new(evaluator, interval),
            result_tab: ResultTab::Population,
            interval_text: interval.as_millis().to_string(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    pub fn poll(&mut self) -> Option<Status> {
        match self.session.poll()? {
            SlotEvent::Completed(_) => Some(Status::info("Calculation complete")),
            SlotEvent::Failed(message) => Some(Status::error(message)),
        }
    }

    /// Feed frame time to the animation; returns when the next tick is due.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Duration> {
        if self.result_tab != ResultTab::Animation {
            return None;
        }
        let anim = self.session.animation_mut()?;
        anim.advance(elapsed);
        anim.until_next_tick()
    }

    pub fn pause_animation(&mut self) {
        if let Some(anim) = self.session.animation_mut() {
            anim.pause();
        }
    }

    pub fn save(&mut self, store: &dyn RecordStore) -> Status {
        match self.session.save(store) {
            Ok(outcome) => Status::info(outcome.message()),
            Err(e) => Status::error(e.to_string()),
        }
    }

    pub fn load(&mut self, store: &dyn RecordStore, id: &str) -> Status {
        match self.session.load(store, id) {
            Ok(()) => {
                self.sync_interval_text();
                Status::info("Calculation loaded")
            }
            Err(e) => Status::error(e.to_string()),
        }
    }

    fn sync_interval_text(&mut self) {
        if let Some(anim) = self.session.animation_mut() {
            self.interval_text = anim.interval().as_millis().to_string();
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<Status> {
        let mut status = None;

        egui::SidePanel::left("lv_params_panel")
            .resizable(false)
            .default_width(260.0)
            .show_inside(ui, |ui| {
                let running = self.session.is_running();
                match params_view::show(ui, &mut self.session.input, running) {
                    ParamsAction::Calculate => status = self.calculate(),
                    ParamsAction::Clear => {
                        self.session.clear();
                        status = Some(Status::info("Cleared"));
                    }
                    ParamsAction::None => {}
                }
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            let previous = self.result_tab;
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.result_tab, ResultTab::Population, "Population");
                ui.selectable_value(&mut self.result_tab, ResultTab::Phase, "Phase portrait");
                ui.selectable_value(&mut self.result_tab, ResultTab::VectorField, "Vector field");
                ui.selectable_value(&mut self.result_tab, ResultTab::Animation, "Animation");
            });
            if previous == ResultTab::Animation && self.result_tab != ResultTab::Animation {
                self.pause_animation();
            }
            ui.separator();
            self.show_result(ui);
        });

        status
    }

    fn calculate(&mut self) -> Option<Status> {
        match self.session.calculate() {
            Ok(SubmitOutcome::Started) => {
                self.pause_animation();
                Some(Status::info("Calculating…"))
            }
            Ok(SubmitOutcome::AlreadyRunning) => None,
            Err(e) => Some(Status::error(e.to_string())),
        }
    }

    fn show_result(&mut self, ui: &mut egui::Ui) {
        let tab = self.result_tab;
        let interval_text = &mut self.interval_text;
        match self.session.view_mut() {
            ResultView::Placeholder => {
                charts::placeholder(ui, "Enter parameters and press Calculate")
            }
            ResultView::Error(message) => {
                let text = egui::RichText::new(message.as_str()).color(ui.visuals().error_fg_color);
                charts::placeholder(ui, text);
            }
            ResultView::Rendered(run) => match tab {
                ResultTab::Population => charts::population(ui, run),
                ResultTab::Phase => charts::phase(ui, run),
                ResultTab::VectorField => charts::vector_field(ui, run),
                ResultTab::Animation => animation_view::show(ui, run, interval_text),
            },
        }
    }
}
