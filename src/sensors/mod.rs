pub mod csv_replay;
#[cfg(feature = "hardware")]
pub mod lis2mdl;
pub mod simulated;

use thiserror::Error;

use crate::config::SensorConfig;
use crate::processing::Sample;

/// Sensor read errors
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("Bus error: {0}")]
    Bus(String),

    #[error("Malformed reading at row {row}: {message}")]
    Malformed { row: usize, message: String },

    #[error("Unexpected device id 0x{0:02X}")]
    UnexpectedDevice(u8),

    #[error("No more samples")]
    Exhausted,

    #[error("Failed to open sensor source: {0}")]
    Open(String),
}

/// Produces one 3-axis reading per call.
pub trait SensorSource: Send {
    fn read(&mut self) -> Result<Sample, SensorError>;

    fn name(&self) -> &str;
}

pub fn create_sensor(config: &SensorConfig) -> Result<Box<dyn SensorSource>, SensorError> {
    match config {
        SensorConfig::Simulated {
            seed,
            spike_probability,
            failure_probability,
        } => {
            let sensor = simulated::SimulatedSensor::new(simulated::SimulatedSensorConfig {
                seed: *seed,
                spike_probability: *spike_probability,
                failure_probability: *failure_probability,
                ..simulated::SimulatedSensorConfig::default()
            });
            Ok(Box::new(sensor))
        }
        SensorConfig::Csv { path } => Ok(Box::new(csv_replay::CsvSensor::open(path)?)),
        #[cfg(feature = "hardware")]
        SensorConfig::Lis2mdl { i2c_bus, address } => {
            Ok(Box::new(lis2mdl::Lis2mdl::open(i2c_bus, *address)?))
        }
        #[cfg(not(feature = "hardware"))]
        SensorConfig::Lis2mdl { .. } => Err(SensorError::Open(
            "LIS2MDL support requires the `hardware` feature".to_string(),
        )),
    }
}
