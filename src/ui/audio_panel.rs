use eframe::egui;

use crate::controller::AudioController;
use crate::engine::EngineFactory;

const NEON: egui::Color32 = egui::Color32::from_rgb(0, 255, 170);
const DIM: egui::Color32 = egui::Color32::from_rgb(120, 140, 160);

/// Draws the player panel and forwards every control to the controller.
///
/// The panel reads a snapshot of the state up front, so widgets never hold a borrow of the
/// controller while a command runs.
pub fn audio_panel<F: EngineFactory>(
    ui: &mut egui::Ui,
    controller: &mut AudioController<F>,
    class_name: &str,
) {
    let state = controller.state().clone();
    let track_count = controller.playlist().len();

    ui.push_id(("audio-controller", class_name), |ui| {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            // Header
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("🎵 NEURAL AUDIO SYSTEM")
                        .strong()
                        .color(NEON),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let status = if state.is_playing { "▶ " } else { "⏸ " };
                    ui.label(
                        egui::RichText::new(format!("{}{}", status, state.status_label()))
                            .monospace()
                            .color(if state.is_playing { NEON } else { DIM }),
                    );
                });
            });
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("TRACK SELECT:");
                for index in 0..track_count {
                    let title = controller.playlist().title(index).unwrap_or_default();
                    let button =
                        ui.selectable_label(index == state.current_track, format!("{}", index + 1));
                    if button.on_hover_text(title).clicked() {
                        controller.change_track(index);
                    }
                }
            });

            ui.horizontal(|ui| {
                let play_label = if state.is_playing { "⏸" } else { "▶" };
                if ui.button(play_label).clicked() {
                    controller.toggle_play();
                }
                if ui.selectable_label(state.looping, "🔁").clicked() {
                    controller.toggle_loop();
                }
            });

            // Progress
            let (current, total) = state.time_display();
            ui.horizontal(|ui| {
                ui.monospace(current);
                let mut percent = state.progress_percent();
                let slider = egui::Slider::new(&mut percent, 0.0..=100.0).show_value(false);
                if ui.add_enabled(state.duration > 0.0, slider).changed() {
                    controller.seek_to(percent);
                }
                ui.monospace(total);
            });
            ui.separator();

            ui.label(format!("VOLUME: {}%", state.volume_percent()));
            let mut volume = state.volume;
            let slider = egui::Slider::new(&mut volume, 0.0..=1.0)
                .step_by(0.01)
                .show_value(false);
            if ui.add(slider).changed() {
                controller.set_volume(volume);
            }

            ui.label(format!("SPEED: {:.2}x", state.rate));
            let mut rate = state.rate;
            let slider = egui::Slider::new(&mut rate, 0.25..=4.0)
                .step_by(0.25)
                .show_value(false);
            if ui.add(slider).changed() {
                controller.set_rate(rate);
            }

            ui.label(format!("PITCH: {:.2}x", state.pitch));
            let mut pitch = state.pitch;
            let slider = egui::Slider::new(&mut pitch, 0.5..=2.0)
                .step_by(0.1)
                .show_value(false);
            if ui.add(slider).changed() {
                controller.set_pitch(pitch);
            }
        });
    });
}
