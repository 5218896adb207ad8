// src/visualization/mod.rs

pub mod plotter;
pub mod window;

use crate::display::{DisplayPayload, DisplaySink, ModeSwitch};
use crate::processing::detectors::DetectionMode;
use crate::processing::history::History;
use plotter::{lock_plotter, SharedPlotter};

pub use crate::config::VisualizationConfig;

/// Display sink that hands each frame to the plotting window.
pub struct PlotterDisplay {
    plotter: SharedPlotter,
    mode: ModeSwitch,
}

impl PlotterDisplay {
    pub fn new(plotter: SharedPlotter, mode: ModeSwitch) -> Self {
        Self { plotter, mode }
    }
}

impl DisplaySink for PlotterDisplay {
    fn render(&mut self, payload: &DisplayPayload, history: &History) {
        lock_plotter(&self.plotter).add_data(payload, history);
    }

    fn show_error(&mut self, message: &str) {
        lock_plotter(&self.plotter).set_error(message);
    }

    fn mode(&self) -> DetectionMode {
        self.mode.mode()
    }
}

#[cfg(test)]
mod tests {
    use super::plotter::{create_shared_plotter, StatusKind};
    use super::*;

    #[test]
    fn forwards_frames_to_shared_plotter() {
        let plotter = create_shared_plotter();
        let mode = ModeSwitch::new(DetectionMode::MagnitudeOnly);
        let mut display = PlotterDisplay::new(plotter.clone(), mode);

        assert_eq!(display.mode(), DetectionMode::MagnitudeOnly);

        display.show_error("timeout");
        assert_eq!(lock_plotter(&plotter).status().1, StatusKind::Error);

        let payload = DisplayPayload {
            x: 0.0,
            y: 0.0,
            z: 50.0,
            magnitude: 50.0,
            spike_count: 0,
            triggered: false,
            spike_active: false,
            mode: DetectionMode::MagnitudeOnly,
        };
        display.render(&payload, &History::new(10));
        assert_eq!(lock_plotter(&plotter).status().1, StatusKind::Normal);
    }
}
