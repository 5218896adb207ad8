pub mod spike;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which changes count as a spike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Per-axis jumps or |B| jumps
    #[default]
    Vector,
    /// |B| jumps only, ignores rotations of the field
    MagnitudeOnly,
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionMode::Vector => write!(f, "vector"),
            DetectionMode::MagnitudeOnly => write!(f, "magnitude only"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionResult {
    /// Largest per-axis change, only evaluated in `Vector` mode
    pub axis_delta: Option<f64>,
    pub mag_delta: f64,
    pub triggered: bool,
}
