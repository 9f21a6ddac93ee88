use lv_core::{ParamField, ParamInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsAction {
    None,
    Calculate,
    Clear,
}

/// Parameter form. Calculate is disabled while a calculation runs; Clear
/// stays available so a hung kernel can be abandoned.
pub fn show(ui: &mut egui::Ui, input: &mut ParamInput, running: bool) -> ParamsAction {
    let mut action = ParamsAction::None;

    ui.heading("Parameters");
    ui.add_space(4.0);
    egui::Grid::new("lv_params")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            for field in ParamField::ALL {
                ui.label(field.label());
                ui.add_enabled(
                    !running,
                    egui::TextEdit::singleline(input.text_mut(field)).desired_width(90.0),
                );
                ui.end_row();
            }
        });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!running, egui::Button::new("Calculate"))
            .clicked()
        {
            action = ParamsAction::Calculate;
        }
        if ui.button("Clear").clicked() {
            action = ParamsAction::Clear;
        }
    });

    if running {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Waiting for the Wolfram kernel…");
        });
    }

    action
}
