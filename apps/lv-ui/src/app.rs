use std::sync::Arc;
use std::time::{Duration, Instant};

use lv_app::{AppConfig, HistoryEntry, clear_history, history};
use lv_kernel::KernelSession;
use lv_results::JsonRecordStore;
use tracing::{error, info};

use crate::views::LotkaVolterraTab;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One line in the status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

enum ModelTab {
    LotkaVolterra(Box<LotkaVolterraTab>),
    Placeholder { title: &'static str },
}

impl ModelTab {
    fn title(&self) -> &'static str {
        match self {
            ModelTab::LotkaVolterra(_) => "Lotka-Volterra",
            ModelTab::Placeholder { title } => *title,
        }
    }
}

enum MenuAction {
    Save,
    Load(String),
    ConfirmClear,
    About,
    Quit,
}

pub struct LvSimApp {
    tabs: Vec<ModelTab>,
    active_tab: usize,
    store: Option<JsonRecordStore>,
    status: Option<Status>,
    confirm_clear: bool,
    show_about: bool,
    last_frame: Instant,
}

impl LvSimApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let kernel = Arc::new(KernelSession::new(config.kernel.clone()));

        let (store, status) = match JsonRecordStore::new(config.store_path.clone()) {
            Ok(store) => (Some(store), None),
            Err(e) => {
                error!(error = %e, "record store unavailable");
                (None, Some(Status::error(format!("Record store unavailable: {}", e))))
            }
        };

        Self {
            tabs: vec![
                ModelTab::LotkaVolterra(Box::new(LotkaVolterraTab::new(
                    kernel,
                    config.animation_interval(),
                ))),
                ModelTab::Placeholder { title: "Pendulum" },
                ModelTab::Placeholder {
                    title: "Lorenz system",
                },
                ModelTab::Placeholder {
                    title: "Chemical reaction",
                },
            ],
            active_tab: 0,
            store,
            status,
            confirm_clear: false,
            show_about: false,
            last_frame: Instant::now(),
        }
    }

    fn lotka_volterra(&mut self) -> Option<&mut LotkaVolterraTab> {
        self.tabs.iter_mut().find_map(|tab| match tab {
            ModelTab::LotkaVolterra(lv) => Some(lv.as_mut()),
            ModelTab::Placeholder { .. } => None,
        })
    }

    fn history_entries(&self) -> Result<Vec<HistoryEntry>, String> {
        match &self.store {
            Some(store) => history(store).map_err(|e| e.to_string()),
            None => Err("Record store unavailable".to_string()),
        }
    }

    fn poll_tabs(&mut self) {
        for tab in &mut self.tabs {
            if let ModelTab::LotkaVolterra(lv) = tab {
                if let Some(status) = lv.poll() {
                    self.status = Some(status);
                }
            }
        }
    }

    fn any_running(&self) -> bool {
        self.tabs.iter().any(|tab| match tab {
            ModelTab::LotkaVolterra(lv) => lv.is_running(),
            ModelTab::Placeholder { .. } => false,
        })
    }

    fn pause_all(&mut self) {
        for tab in &mut self.tabs {
            if let ModelTab::LotkaVolterra(lv) = tab {
                lv.pause_animation();
            }
        }
    }

    fn apply_menu_action(&mut self, ctx: &egui::Context, action: MenuAction) {
        match action {
            MenuAction::Save => {
                let Some(store) = self.store.clone() else {
                    self.status = Some(Status::error("Record store unavailable"));
                    return;
                };
                if let Some(lv) = self.lotka_volterra() {
                    let status = lv.save(&store);
                    self.status = Some(status);
                }
            }
            MenuAction::Load(id) => {
                let Some(store) = self.store.clone() else {
                    return;
                };
                if let Some(lv) = self.lotka_volterra() {
                    let status = lv.load(&store, &id);
                    self.status = Some(status);
                }
                self.active_tab = 0;
            }
            MenuAction::ConfirmClear => self.confirm_clear = true,
            MenuAction::About => self.show_about = true,
            MenuAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    fn clear_saved_history(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        self.status = Some(match clear_history(store) {
            Ok(()) => {
                info!("history cleared from menu");
                Status::info("History cleared")
            }
            Err(e) => Status::error(e.to_string()),
        });
    }

    fn show_menu(&self, ctx: &egui::Context) -> Option<MenuAction> {
        let mut action = None;

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save calculation").clicked() {
                        action = Some(MenuAction::Save);
                        ui.close_menu();
                    }
                    ui.menu_button("Load calculation", |ui| match self.history_entries() {
                        Ok(entries) if entries.is_empty() => {
                            ui.label("No saved calculations");
                        }
                        Ok(entries) => {
                            for entry in entries {
                                if ui.button(entry.label.as_str()).clicked() {
                                    action = Some(MenuAction::Load(entry.id));
                                    ui.close_menu();
                                }
                            }
                        }
                        Err(message) => {
                            ui.colored_label(ui.visuals().error_fg_color, message);
                        }
                    });
                    if ui.button("Clear history…").clicked() {
                        action = Some(MenuAction::ConfirmClear);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        action = Some(MenuAction::Quit);
                        ui.close_menu();
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        action = Some(MenuAction::About);
                        ui.close_menu();
                    }
                });
            });
        });

        action
    }

    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if self.confirm_clear {
            let mut confirmed = false;
            let mut cancelled = false;
            egui::Window::new("Clear history")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label("Delete all saved calculations?");
                    ui.horizontal(|ui| {
                        confirmed = ui.button("Delete").clicked();
                        cancelled = ui.button("Cancel").clicked();
                    });
                });
            if confirmed {
                self.clear_saved_history();
            }
            if confirmed || cancelled {
                self.confirm_clear = false;
            }
        }

        if self.show_about {
            egui::Window::new("About")
                .collapsible(false)
                .resizable(false)
                .open(&mut self.show_about)
                .show(ctx, |ui| {
                    ui.heading("Population Dynamics Simulator");
                    ui.label("Lotka-Volterra predator-prey model solved by the Wolfram kernel.");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                });
        }
    }
}

impl eframe::App for LvSimApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let elapsed = now - self.last_frame;
        self.last_frame = now;

        self.poll_tabs();

        let mut next_repaint = match self.tabs.get_mut(self.active_tab) {
            Some(ModelTab::LotkaVolterra(lv)) => lv.tick(elapsed),
            _ => None,
        };

        if let Some(action) = self.show_menu(ctx) {
            self.apply_menu_action(ctx, action);
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| match &self.status {
                Some(status) if status.is_error => {
                    ui.colored_label(ui.visuals().error_fg_color, status.text.as_str());
                }
                Some(status) => {
                    ui.label(status.text.as_str());
                }
                None => {
                    ui.label("Ready");
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let previous = self.active_tab;
            ui.horizontal(|ui| {
                for (index, tab) in self.tabs.iter().enumerate() {
                    ui.selectable_value(&mut self.active_tab, index, tab.title());
                }
            });
            if previous != self.active_tab {
                self.pause_all();
            }
            ui.separator();

            match self.tabs.get_mut(self.active_tab) {
                Some(ModelTab::LotkaVolterra(lv)) => {
                    if let Some(status) = lv.show(ui) {
                        self.status = Some(status);
                    }
                }
                Some(ModelTab::Placeholder { title }) => {
                    ui.centered_and_justified(|ui| {
                        ui.heading(format!("{} model coming soon", title));
                    });
                }
                None => {}
            }
        });

        self.show_dialogs(ctx);

        if self.any_running() {
            next_repaint = Some(next_repaint.map_or(POLL_INTERVAL, |d| d.min(POLL_INTERVAL)));
        }
        if let Some(delay) = next_repaint {
            ctx.request_repaint_after(delay);
        }
    }
}
