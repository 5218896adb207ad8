// src/config/mod.rs
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::processing::detectors::DetectionMode;
use crate::scheduler::MAX_TICK_PERIOD;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to write config file: {0}")]
    Write(#[source] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub processor: ProcessorConfig,
    pub trigger: TriggerConfig,
    pub scheduler: SchedulerConfig,
    pub visualization: VisualizationConfig,
    pub sensor: SensorConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Low-pass weight given to the newest reading, 0.0 - 1.0
    pub alpha: f64,
    /// Per-axis change (uT) that counts as a spike
    pub vector_jump_threshold: f64,
    /// Change in |B| (uT) that counts as a spike
    pub mag_jump_threshold: f64,
    pub mode: DetectionMode,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            vector_jump_threshold: 25.0,
            mag_jump_threshold: 10.0,
            mode: DetectionMode::Vector,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TriggerConfig {
    /// Seconds the output line stays high after the last spike
    pub hold_duration_seconds: f64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            hold_duration_seconds: 5.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    pub tick_period_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 100, // 10 Hz
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct VisualizationConfig {
    /// Open the plotting window (ignored when built without the `visualization` feature)
    pub enabled: bool,
    /// Number of points kept per series
    pub history_length: usize,
    pub window_width: u32,
    pub window_height: u32,
    pub plot_height: u32,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            history_length: 200,
            window_width: 1280,
            window_height: 720,
            plot_height: 520,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorConfig {
    Simulated {
        #[serde(default)]
        seed: Option<u64>,
        /// Chance per tick that a magnet pass starts, 0.0 - 1.0
        #[serde(default = "default_spike_probability")]
        spike_probability: f64,
        /// Chance per tick that the read fails, 0.0 - 1.0
        #[serde(default)]
        failure_probability: f64,
    },
    Csv {
        path: PathBuf,
    },
    Lis2mdl {
        #[serde(default = "default_i2c_bus")]
        i2c_bus: PathBuf,
        #[serde(default = "default_lis2mdl_address")]
        address: u8,
    },
}

fn default_spike_probability() -> f64 {
    0.02
}

fn default_i2c_bus() -> PathBuf {
    PathBuf::from("/dev/i2c-1")
}

fn default_lis2mdl_address() -> u8 {
    0x1E
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorConfig::Simulated {
            seed: None,
            spike_probability: default_spike_probability(),
            failure_probability: 0.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputConfig {
    Console,
    Gpio {
        #[serde(default = "default_gpio_pin")]
        pin: u64,
    },
}

fn default_gpio_pin() -> u64 {
    16
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig::Console
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.processor;
        if !p.alpha.is_finite() || !(0.0..=1.0).contains(&p.alpha) {
            return Err(invalid("processor.alpha", "must be between 0 and 1"));
        }
        check_non_negative("processor.vector_jump_threshold", p.vector_jump_threshold)?;
        check_non_negative("processor.mag_jump_threshold", p.mag_jump_threshold)?;
        check_non_negative(
            "trigger.hold_duration_seconds",
            self.trigger.hold_duration_seconds,
        )?;
        if Duration::try_from_secs_f64(self.trigger.hold_duration_seconds).is_err() {
            return Err(invalid(
                "trigger.hold_duration_seconds",
                "is too large to represent as a duration",
            ));
        }

        let period_ms = self.scheduler.tick_period_ms;
        if period_ms == 0 || u128::from(period_ms) > MAX_TICK_PERIOD.as_millis() {
            return Err(ConfigError::Invalid {
                field: "scheduler.tick_period_ms",
                message: format!(
                    "must be between 1 and {}",
                    MAX_TICK_PERIOD.as_millis()
                ),
            });
        }
        if self.visualization.history_length == 0 {
            return Err(invalid(
                "visualization.history_length",
                "must be greater than 0",
            ));
        }

        if let SensorConfig::Simulated {
            spike_probability,
            failure_probability,
            ..
        } = &self.sensor
        {
            check_probability("sensor.spike_probability", *spike_probability)?;
            check_probability("sensor.failure_probability", *failure_probability)?;
        }

        Ok(())
    }
}

fn invalid(field: &'static str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.to_string(),
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, "must be a finite, non-negative number"));
    }
    Ok(())
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, "must be between 0 and 1"));
    }
    Ok(())
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path).map_err(ConfigError::Read)?;

    serde_yaml::from_str(&config_str).map_err(ConfigError::Parse)
}

pub fn save_config<P: AsRef<Path>>(config: &Config, path: P) -> Result<(), ConfigError> {
    let yaml = serde_yaml::to_string(config).map_err(ConfigError::Serialize)?;

    fs::write(path, yaml).map_err(ConfigError::Write)
}
