use std::time::{Duration, Instant};

use eframe::egui;

use crate::controller::AudioController;
use crate::engine::EngineFactory;
use crate::ui::audio_panel::audio_panel;

// Engine confirmations arrive even when the playhead is not being polled.
const IDLE_REFRESH: Duration = Duration::from_millis(250);

pub struct NeuralAudioApp<F: EngineFactory> {
    pub controller: AudioController<F>,
    pub class_name: String,
}

impl<F: EngineFactory> NeuralAudioApp<F> {
    pub fn new(controller: AudioController<F>, class_name: String) -> Self {
        Self {
            controller,
            class_name,
        }
    }

    /// How long the window may sleep before the controller needs another tick.
    fn next_refresh(&self, now: Instant) -> Duration {
        self.controller
            .next_poll_in(now)
            .map_or(IDLE_REFRESH, |wait| wait.min(IDLE_REFRESH))
    }
}

impl<F: EngineFactory> eframe::App for NeuralAudioApp<F> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.tick(now);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(egui::RichText::new("CYBER PUZZLE").monospace());
            });
            ui.add_space(16.0);
            audio_panel(ui, &mut self.controller, &self.class_name);
        });

        ctx.request_repaint_after(self.next_refresh(now));
    }
}
