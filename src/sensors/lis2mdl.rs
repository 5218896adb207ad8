use std::path::Path;

use embedded_hal::i2c::I2c;
use linux_embedded_hal::I2cdev;

use super::{SensorError, SensorSource};
use crate::processing::Sample;

pub const LIS2MDL_ADDRESS: u8 = 0x1E;

const WHO_AM_I: u8 = 0x4F;
const WHO_AM_I_VALUE: u8 = 0x40;
const CFG_REG_A: u8 = 0x60;
const CFG_REG_C: u8 = 0x62;
const OUTX_L_REG: u8 = 0x68;

// Temperature compensation on, 10 Hz output rate, continuous mode
const CFG_A_CONTINUOUS_10HZ: u8 = 0b1000_0000;
// Block data update so the six output bytes belong to one measurement
const CFG_C_BDU: u8 = 0b0001_0000;

const UT_PER_LSB: f64 = 0.15; // 1.5 mGauss per LSB

/// LIS2MDL 3-axis magnetometer on a Linux I2C bus.
pub struct Lis2mdl<I2C = I2cdev> {
    i2c: I2C,
    address: u8,
    name: String,
}

impl Lis2mdl<I2cdev> {
    pub fn open<P: AsRef<Path>>(bus: P, address: u8) -> Result<Self, SensorError> {
        let bus = bus.as_ref();
        let i2c = I2cdev::new(bus)
            .map_err(|e| SensorError::Open(format!("{}: {}", bus.display(), e)))?;
        let sensor = Self::new(i2c, address, format!("lis2mdl:{}", bus.display()))?;
        tracing::info!(bus = %bus.display(), address, "LIS2MDL initialised");
        Ok(sensor)
    }
}

impl<I2C: I2c> Lis2mdl<I2C> {
    pub fn new(i2c: I2C, address: u8, name: String) -> Result<Self, SensorError> {
        let mut sensor = Self { i2c, address, name };

        let id = sensor.read_register(WHO_AM_I)?;
        if id != WHO_AM_I_VALUE {
            return Err(SensorError::UnexpectedDevice(id));
        }

        sensor.write_register(CFG_REG_A, CFG_A_CONTINUOUS_10HZ)?;
        sensor.write_register(CFG_REG_C, CFG_C_BDU)?;
        Ok(sensor)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, SensorError> {
        let mut value = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut value)
            .map_err(|e| SensorError::Bus(format!("{:?}", e)))?;
        Ok(value[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|e| SensorError::Bus(format!("{:?}", e)))
    }
}

fn raw_to_sample(bytes: &[u8; 6]) -> Sample {
    let axis = |lo: usize| i16::from_le_bytes([bytes[lo], bytes[lo + 1]]) as f64 * UT_PER_LSB;
    Sample::new(axis(0), axis(2), axis(4))
}

impl<I2C: I2c + Send> SensorSource for Lis2mdl<I2C> {
    fn read(&mut self) -> Result<Sample, SensorError> {
        let mut bytes = [0u8; 6];
        self.i2c
            .write_read(self.address, &[OUTX_L_REG], &mut bytes)
            .map_err(|e| SensorError::Bus(format!("{:?}", e)))?;
        Ok(raw_to_sample(&bytes))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
