// src/visualization/window.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use super::plotter::{lock_plotter, SharedPlotter, StatusKind};
use super::VisualizationConfig;
use crate::display::ModeSwitch;

const REPAINT_INTERVAL: Duration = Duration::from_millis(50);

pub struct VisualizationWindow {
    plotter: SharedPlotter,
    config: VisualizationConfig,
    mode: ModeSwitch,
    running: Arc<AtomicBool>,
}

impl VisualizationWindow {
    pub fn new(
        plotter: SharedPlotter,
        config: VisualizationConfig,
        mode: ModeSwitch,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            plotter,
            config,
            mode,
            running,
        }
    }

    /// Blocks the calling (main) thread until the window closes, then clears
    /// `running` so the sampling loop stops too. Closes itself once `running`
    /// is cleared elsewhere.
    pub fn run(
        plotter: SharedPlotter,
        config: VisualizationConfig,
        mode: ModeSwitch,
        running: Arc<AtomicBool>,
    ) -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([config.window_width as f32, config.window_height as f32])
                .with_title("Magnetic Field Monitor"),
            ..Default::default()
        };

        let window_running = Arc::clone(&running);
        let result = eframe::run_native(
            "Magnetic Field Monitor",
            options,
            Box::new(move |_cc| {
                Ok(Box::new(VisualizationWindow::new(
                    plotter,
                    config,
                    mode,
                    window_running,
                )))
            }),
        );
        running.store(false, Ordering::SeqCst);
        result
    }

    fn plot_field(&self, ui: &mut egui::Ui) {
        let plotter = lock_plotter(&self.plotter);
        let series = [
            ("X", plotter.x_points(), egui::Color32::RED),
            ("Y", plotter.y_points(), egui::Color32::GREEN),
            ("Z", plotter.z_points(), egui::Color32::from_rgb(80, 120, 255)),
            ("|B|", plotter.magnitude_points(), egui::Color32::YELLOW),
        ];
        drop(plotter);

        Plot::new("magnetic_field_components")
            .height(self.config.plot_height as f32)
            .legend(Legend::default())
            .show_axes([true, true])
            .show_grid([true, true])
            .allow_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .show(ui, |plot_ui| {
                for (name, points, color) in series {
                    let line = Line::new(PlotPoints::from(points))
                        .color(color)
                        .width(1.5)
                        .name(name);
                    plot_ui.line(line);
                }
            });
    }
}

impl eframe::App for VisualizationWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Samples arrive on another thread
        ctx.request_repaint_after(REPAINT_INTERVAL);

        if !self.running.load(Ordering::SeqCst) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Magnetic Field Components (uT)");
            self.plot_field(ui);
            ui.separator();

            let mut magnitude_only = self.mode.is_magnitude_only();
            if ui
                .checkbox(&mut magnitude_only, "Use Magnitude Only")
                .changed()
            {
                self.mode.set_magnitude_only(magnitude_only);
            }

            let (text, kind) = {
                let plotter = lock_plotter(&self.plotter);
                let (text, kind) = plotter.status();
                (text.to_string(), kind)
            };
            let label = match kind {
                StatusKind::Motion => egui::RichText::new(text)
                    .size(28.0)
                    .strong()
                    .color(egui::Color32::RED),
                StatusKind::Error => egui::RichText::new(text)
                    .size(18.0)
                    .color(egui::Color32::from_rgb(255, 165, 0)),
                StatusKind::Normal | StatusKind::Waiting => egui::RichText::new(text).size(24.0),
            };
            ui.vertical_centered(|ui| ui.label(label));
        });
    }
}
