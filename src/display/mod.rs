pub mod console;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::processing::detectors::DetectionMode;
use crate::processing::history::History;

/// Values shown to the operator after each processed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPayload {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub magnitude: f64,
    pub spike_count: u64,
    pub triggered: bool,
    pub spike_active: bool,
    pub mode: DetectionMode,
}

impl DisplayPayload {
    pub fn status_line(&self) -> String {
        if self.triggered {
            format!(
                "\u{26a1} Motion Detected! |B|: {:.1} uT | Spikes: {}",
                self.magnitude, self.spike_count
            )
        } else {
            format!(
                "X: {:.1} Y: {:.1} Z: {:.1} | |B|: {:.1} uT | Spikes: {}",
                self.x, self.y, self.z, self.magnitude, self.spike_count
            )
        }
    }
}

pub fn sensor_error_line(reason: &str) -> String {
    format!("Error reading sensor: {}", reason)
}

/// Where tick results are rendered, and where the operator picks the mode.
pub trait DisplaySink: Send {
    fn render(&mut self, payload: &DisplayPayload, history: &History);

    /// Transient message for a tick that produced no data.
    fn show_error(&mut self, message: &str);

    fn mode(&self) -> DetectionMode;
}

// MODE SWITCH -----------------------------------------------------------------

/// "Use Magnitude Only" toggle shared between the UI and the sampling loop.
#[derive(Debug, Clone, Default)]
pub struct ModeSwitch {
    magnitude_only: Arc<AtomicBool>,
}

impl ModeSwitch {
    pub fn new(mode: DetectionMode) -> Self {
        Self {
            magnitude_only: Arc::new(AtomicBool::new(mode == DetectionMode::MagnitudeOnly)),
        }
    }

    pub fn mode(&self) -> DetectionMode {
        if self.magnitude_only.load(Ordering::Relaxed) {
            DetectionMode::MagnitudeOnly
        } else {
            DetectionMode::Vector
        }
    }

    pub fn set_magnitude_only(&self, magnitude_only: bool) {
        self.magnitude_only.store(magnitude_only, Ordering::Relaxed);
    }

    pub fn is_magnitude_only(&self) -> bool {
        self.magnitude_only.load(Ordering::Relaxed)
    }

    /// Flips the mode and returns the new one.
    pub fn toggle(&self) -> DetectionMode {
        self.magnitude_only.fetch_xor(true, Ordering::Relaxed);
        self.mode()
    }
}
