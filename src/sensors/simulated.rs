use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{SensorError, SensorSource};
use crate::processing::Sample;

// -----------------------------------------------------------------------------
// SETUP FOR THE SIMULATED FIELD
// -----------------------------------------------------------------------------

const BASELINE_FIELD: Sample = Sample::new(20.0, -5.0, 42.0);
const DRIFT_AMPLITUDE: f64 = 1.5;
const DRIFT_FREQ: f64 = 0.05;
const INCREMENT_TIME: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct SimulatedSensorConfig {
    pub seed: Option<u64>,
    pub baseline: Sample,
    /// Uniform noise added to every axis, +/- uT
    pub noise: f64,
    pub spike_probability: f64,
    pub failure_probability: f64,
}

impl Default for SimulatedSensorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            baseline: BASELINE_FIELD,
            noise: 0.8,
            spike_probability: 0.02,
            failure_probability: 0.0,
        }
    }
}

/// A magnet passing the sensor: a field offset that ramps up and back down.
#[derive(Debug)]
struct MagnetPass {
    offset: Sample,
    length: usize,
    elapsed: usize,
}

impl MagnetPass {
    fn current_offset(&self) -> Sample {
        // Triangular envelope peaking mid-pass
        let half = self.length as f64 / 2.0;
        let weight = 1.0 - ((self.elapsed as f64 - half).abs() / half).min(1.0);
        Sample::new(
            self.offset.x * weight,
            self.offset.y * weight,
            self.offset.z * weight,
        )
    }
}

pub struct SimulatedSensor {
    config: SimulatedSensorConfig,
    rng: StdRng,
    time: f64,
    pass: Option<MagnetPass>,
}

fn unit_interval(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl SimulatedSensor {
    /// Probabilities are clamped to 0.0 - 1.0 and a negative or non-finite
    /// `noise` turns noise off.
    pub fn new(mut config: SimulatedSensorConfig) -> Self {
        config.spike_probability = unit_interval(config.spike_probability);
        config.failure_probability = unit_interval(config.failure_probability);
        if !config.noise.is_finite() || config.noise < 0.0 {
            config.noise = 0.0;
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            time: 0.0,
            pass: None,
        }
    }

    fn next_offset(&mut self) -> Sample {
        if self.pass.is_none() && self.rng.gen_bool(self.config.spike_probability) {
            let strength = self.rng.gen_range(40.0..120.0);
            let offset = match self.rng.gen_range(0..3) {
                0 => Sample::new(strength, 0.0, 0.0),
                1 => Sample::new(0.0, strength, 0.0),
                2 => Sample::new(0.0, 0.0, -strength),
                _ => unreachable!(), // Should never happen with the above range
            };
            let length = self.rng.gen_range(6..20);
            tracing::debug!(?offset, length, "Simulating magnet pass");
            self.pass = Some(MagnetPass {
                offset,
                length,
                elapsed: 0,
            });
        }

        match self.pass.as_mut() {
            Some(pass) => {
                let offset = pass.current_offset();
                pass.elapsed += 1;
                if pass.elapsed > pass.length {
                    self.pass = None;
                }
                offset
            }
            None => Sample::default(),
        }
    }
}

impl SensorSource for SimulatedSensor {
    fn read(&mut self) -> Result<Sample, SensorError> {
        self.time += INCREMENT_TIME;

        if self.rng.gen_bool(self.config.failure_probability) {
            return Err(SensorError::Bus("simulated read failure".to_string()));
        }

        let drift = DRIFT_AMPLITUDE * (2.0 * std::f64::consts::PI * DRIFT_FREQ * self.time).sin();
        let offset = self.next_offset();
        let base = self.config.baseline;
        let noise = self.config.noise;
        let mut jitter = || {
            if noise > 0.0 {
                self.rng.gen_range(-noise..noise)
            } else {
                0.0
            }
        };

        Ok(Sample::new(
            base.x + drift + offset.x + jitter(),
            base.y + offset.y + jitter(),
            base.z - drift + offset.z + jitter(),
        ))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
