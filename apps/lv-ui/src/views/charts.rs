use egui::Color32;
use egui_plot::{Arrows, Legend, Line, Plot, PlotPoints};
use lv_app::RenderedRun;

const PREY: Color32 = Color32::from_rgb(31, 119, 180);
const PREDATORS: Color32 = Color32::from_rgb(214, 39, 40);

fn line(points: &[[f64; 2]]) -> Line {
    Line::new(PlotPoints::from(points.to_vec()))
}

pub fn population(ui: &mut egui::Ui, run: &RenderedRun) {
    ui.strong("Population dynamics");
    Plot::new("lv_population")
        .legend(Legend::default())
        .x_axis_label("Time")
        .y_axis_label("Population")
        .show(ui, |plot_ui| {
            plot_ui.line(line(&run.population.prey).name("Prey").color(PREY));
            plot_ui.line(
                line(&run.population.predators)
                    .name("Predators")
                    .color(PREDATORS),
            );
        });
}

pub fn phase(ui: &mut egui::Ui, run: &RenderedRun) {
    ui.strong("Phase portrait");
    Plot::new("lv_phase")
        .legend(Legend::default())
        .x_axis_label("Prey")
        .y_axis_label("Predators")
        .show(ui, |plot_ui| {
            plot_ui.line(line(&run.phase.trajectory).name("Trajectory"));
        });
}

pub fn vector_field(ui: &mut egui::Ui, run: &RenderedRun) {
    let field = &run.vector_field;
    ui.strong("Vector field");
    Plot::new("lv_vector_field")
        .legend(Legend::default())
        .x_axis_label("Prey")
        .y_axis_label("Predators")
        .show(ui, |plot_ui| {
            plot_ui.arrows(
                Arrows::new(
                    PlotPoints::from(field.origins.clone()),
                    PlotPoints::from(field.tips.clone()),
                )
                .name("Direction")
                .color(Color32::GRAY),
            );
            plot_ui.line(line(&field.trajectory).name("Trajectory").color(PREDATORS));
        });
}

pub fn placeholder(ui: &mut egui::Ui, message: impl Into<egui::WidgetText>) {
    ui.centered_and_justified(|ui| {
        ui.label(message);
    });
}
