// src/visualization/plotter.rs

use std::sync::{Arc, Mutex, MutexGuard};

use crate::display::{sensor_error_line, DisplayPayload};
use crate::processing::history::History;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Waiting,
    Normal,
    Motion,
    Error,
}

/// Latest frame of data for the window: the four smoothed series plus the
/// status line.
pub struct SignalPlotter {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    magnitude: Vec<f64>,
    samples_seen: u64,
    status: String,
    status_kind: StatusKind,
    last_payload: Option<DisplayPayload>,
}

impl Default for SignalPlotter {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalPlotter {
    pub fn new() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            magnitude: Vec::new(),
            samples_seen: 0,
            status: "Initializing...".to_string(),
            status_kind: StatusKind::Waiting,
            last_payload: None,
        }
    }

    pub fn add_data(&mut self, payload: &DisplayPayload, history: &History) {
        self.x = history.x.to_vec();
        self.y = history.y.to_vec();
        self.z = history.z.to_vec();
        self.magnitude = history.magnitude.to_vec();
        self.samples_seen += 1;

        self.status = payload.status_line();
        self.status_kind = if payload.triggered {
            StatusKind::Motion
        } else {
            StatusKind::Normal
        };
        self.last_payload = Some(*payload);
    }

    pub fn set_error(&mut self, message: &str) {
        self.status = sensor_error_line(message);
        self.status_kind = StatusKind::Error;
    }

    /// Series as `[sample_index, value]` points, the newest at `samples_seen - 1`.
    fn points(&self, series: &[f64]) -> Vec<[f64; 2]> {
        let first = self.samples_seen.saturating_sub(series.len() as u64);
        series
            .iter()
            .enumerate()
            .map(|(i, v)| [(first + i as u64) as f64, *v])
            .collect()
    }

    pub fn x_points(&self) -> Vec<[f64; 2]> {
        self.points(&self.x)
    }

    pub fn y_points(&self) -> Vec<[f64; 2]> {
        self.points(&self.y)
    }

    pub fn z_points(&self) -> Vec<[f64; 2]> {
        self.points(&self.z)
    }

    pub fn magnitude_points(&self) -> Vec<[f64; 2]> {
        self.points(&self.magnitude)
    }

    pub fn status(&self) -> (&str, StatusKind) {
        (&self.status, self.status_kind)
    }

    pub fn last_payload(&self) -> Option<&DisplayPayload> {
        self.last_payload.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.samples_seen == 0
    }
}

pub type SharedPlotter = Arc<Mutex<SignalPlotter>>;

pub fn create_shared_plotter() -> SharedPlotter {
    Arc::new(Mutex::new(SignalPlotter::new()))
}

/// Locks the plotter, recovering the data if a previous holder panicked.
pub fn lock_plotter(plotter: &SharedPlotter) -> MutexGuard<'_, SignalPlotter> {
    plotter.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
