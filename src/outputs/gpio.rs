use embedded_hal::digital::{OutputPin, PinState};
use linux_embedded_hal::SysfsPin;

use super::{OutputError, OutputSink};

/// Output line on a sysfs-exported GPIO pin, driven low at startup.
pub struct GpioOutput {
    pin: SysfsPin,
    number: u64,
}

impl GpioOutput {
    pub fn open(number: u64) -> Result<Self, OutputError> {
        let pin = SysfsPin::new(number);
        pin.export()
            .map_err(|e| OutputError::Open(format!("gpio{}: {}", number, e)))?;
        let pin = pin
            .into_output_pin(PinState::Low)
            .map_err(|e| OutputError::Open(format!("gpio{}: {:?}", number, e)))?;

        tracing::info!(pin = number, "GPIO output ready, line LOW");
        Ok(Self { pin, number })
    }
}

impl OutputSink for GpioOutput {
    fn assert(&mut self) -> Result<(), OutputError> {
        self.pin
            .set_high()
            .map_err(|e| OutputError::Pin(format!("gpio{}: {:?}", self.number, e)))
    }

    fn deassert(&mut self) -> Result<(), OutputError> {
        self.pin
            .set_low()
            .map_err(|e| OutputError::Pin(format!("gpio{}: {:?}", self.number, e)))
    }
}
