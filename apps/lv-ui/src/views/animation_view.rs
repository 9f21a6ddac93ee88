use egui::{Align2, Color32};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints, Points, Text};
use lv_app::RenderedRun;

/// Transport controls and the animated phase portrait.
pub fn show(ui: &mut egui::Ui, run: &mut RenderedRun, interval_text: &mut String) {
    let anim = &mut run.animation;

    ui.horizontal(|ui| {
        let label = if anim.is_playing() { "Pause" } else { "Play" };
        if ui.button(label).clicked() {
            if anim.is_playing() {
                anim.pause();
            } else {
                anim.play();
            }
        }
        if ui.button("Reset").clicked() {
            anim.reset();
        }

        ui.separator();
        ui.label("Interval (ms):");
        let response = ui.add(egui::TextEdit::singleline(interval_text).desired_width(50.0));
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if submitted || ui.button("Apply").clicked() {
            if !anim.set_interval_text(interval_text) {
                *interval_text = anim.interval().as_millis().to_string();
            }
        }

        ui.separator();
        ui.label(format!("Frame {}/{}", anim.frame() + 1, anim.frame_count()));
    });

    let bounds = run.animation_bounds;
    let Some(frame) = run.animation.view(&run.series) else {
        return;
    };
    let trail: Vec<[f64; 2]> = frame
        .trail_x
        .iter()
        .zip(frame.trail_y)
        .map(|(&x, &y)| [x, y])
        .collect();

    Plot::new("lv_animation")
        .x_axis_label("Prey")
        .y_axis_label("Predators")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(egui_plot::PlotBounds::from_min_max(
                [bounds.x.0, bounds.y.0],
                [bounds.x.1, bounds.y.1],
            ));
            plot_ui.line(Line::new(PlotPoints::from(trail)).name("Trajectory"));
            plot_ui.points(
                Points::new(vec![[frame.prey, frame.predators]])
                    .radius(6.0)
                    .color(Color32::from_rgb(214, 39, 40)),
            );
            plot_ui.text(
                Text::new(PlotPoint::new(bounds.x.0, bounds.y.1), frame.readout())
                    .anchor(Align2::LEFT_TOP),
            );
        });
}
